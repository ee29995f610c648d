//! Client side of the event tracker: the HTTP repository, table presentation
//! and the dashboard state machine that ties them together.

pub mod dashboard;
pub mod error;
pub mod repository;
pub mod table;

pub use dashboard::{Clock, Confirm, Dashboard, DeleteOutcome, SubmitOutcome, SystemClock, ViewState};
pub use error::TransportError;
pub use repository::{EventRepository, HttpEventRepository, DEFAULT_EVENTS_URL};
pub use table::{EventTable, TableRow};
