use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    Dashboard, DeleteOutcome, EventRepository, HttpEventRepository, SubmitOutcome,
    DEFAULT_EVENTS_URL,
};
use shared::{
    catalog::Category,
    domain::{Event, EventForm, EventId},
    validation::ValidationErrors,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Manage events from the terminal")]
struct Args {
    /// Events collection endpoint.
    #[arg(long, env = "EVENTS_API_URL", default_value = DEFAULT_EVENTS_URL)]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the active and archived tables.
    List {
        #[arg(long)]
        active_query: Option<String>,
        #[arg(long)]
        archived_query: Option<String>,
    },
    Show {
        id: EventId,
    },
    Create(EventFields),
    /// Replace an event; flags left out keep their current value.
    Update {
        id: EventId,
        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        id: EventId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Form inputs as raw text; the form validator decides what is acceptable.
#[derive(ClapArgs, Debug, Default)]
struct EventFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// e.g. 2025-12-01T09:00
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    min: Option<String>,
    #[arg(long)]
    max: Option<String>,
    #[arg(long)]
    location_notes: Option<String>,
    #[arg(long)]
    preparation_notes: Option<String>,
}

impl EventFields {
    fn apply_to(self, mut form: EventForm) -> EventForm {
        let slots = [
            (self.name, &mut form.name),
            (self.description, &mut form.description),
            (self.start, &mut form.start_date),
            (self.end, &mut form.end_date),
            (self.location, &mut form.location),
            (self.min, &mut form.min_attendees),
            (self.max, &mut form.max_attendees),
            (self.location_notes, &mut form.location_notes),
            (self.preparation_notes, &mut form.preparation_notes),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let repository = HttpEventRepository::new(&args.base_url)?;
    let mut dashboard = Dashboard::new(repository);
    dashboard.load().await;
    if let Some(message) = dashboard.error_message() {
        bail!("{message}");
    }

    match args.command {
        Command::List {
            active_query,
            archived_query,
        } => {
            if let Some(query) = active_query {
                dashboard.set_query(Category::Active, query);
            }
            if let Some(query) = archived_query {
                dashboard.set_query(Category::Archived, query);
            }
            print_table(&dashboard, Category::Active);
            println!();
            print_table(&dashboard, Category::Archived);
        }
        Command::Show { id } => {
            let event = dashboard
                .repository()
                .get_event(id)
                .await
                .with_context(|| format!("could not load event {id}"))?;
            print_event(&event);
        }
        Command::Create(fields) => {
            dashboard.open_create_form();
            let form = fields.apply_to(dashboard.form_seed());
            let outcome = dashboard.submit(form).await;
            report_submit(&dashboard, outcome)?;
        }
        Command::Update { id, fields } => {
            let event = dashboard
                .repository()
                .get_event(id)
                .await
                .with_context(|| format!("could not load event {id}"))?;
            dashboard.open_edit_form(event);
            let form = fields.apply_to(dashboard.form_seed());
            let outcome = dashboard.submit(form).await;
            report_submit(&dashboard, outcome)?;
        }
        Command::Delete { id, yes } => {
            let confirm = |prompt: &str| yes || ask(prompt);
            match dashboard.delete(id, &confirm).await {
                DeleteOutcome::Deleted => print_success(&dashboard),
                DeleteOutcome::Aborted => println!("Nothing deleted."),
                DeleteOutcome::Failed => bail!("{}", error_or_default(&dashboard)),
            }
        }
    }

    Ok(())
}

fn report_submit<R: EventRepository>(
    dashboard: &Dashboard<R>,
    outcome: std::result::Result<SubmitOutcome, ValidationErrors>,
) -> Result<()> {
    match outcome {
        Ok(SubmitOutcome::Saved) => {
            print_success(dashboard);
            Ok(())
        }
        Ok(SubmitOutcome::Failed | SubmitOutcome::NotEditing) => {
            bail!("{}", error_or_default(dashboard))
        }
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("event has {} invalid field(s)", errors.len())
        }
    }
}

fn error_or_default<R: EventRepository>(dashboard: &Dashboard<R>) -> String {
    dashboard
        .error_message()
        .unwrap_or("request failed")
        .to_string()
}

fn print_success<R: EventRepository>(dashboard: &Dashboard<R>) {
    if let Some(message) = dashboard.success_message() {
        println!("{message}");
    }
}

fn print_table<R: EventRepository>(dashboard: &Dashboard<R>, category: Category) {
    let table = dashboard.table(category);
    println!("{} events", capitalize(category.label()));
    if !table.query().is_empty() {
        println!("(search: {})", table.query());
    }

    let rows = dashboard.rows(category);
    if rows.is_empty() {
        println!("  {}", table.empty_message());
        return;
    }
    for row in rows {
        let actions = if row.actions { "  [edit | delete]" } else { "" };
        println!(
            "  {} | {} | {} | {} -> {} | {} | {}{actions}",
            row.id, row.name, row.description, row.start, row.end, row.location, row.attendees
        );
    }
}

fn print_event(event: &Event) {
    let form = EventForm::from(event);
    println!("id:          {}", event.id);
    println!("name:        {}", form.name);
    println!("description: {}", form.description);
    println!("start:       {}", form.start_date);
    println!("end:         {}", form.end_date);
    println!("location:    {}", form.location);
    println!(
        "attendees:   {}",
        client_core::table::format_attendees(event.draft.min_attendees, event.draft.max_attendees)
    );
    if !form.location_notes.is_empty() {
        println!("location notes:    {}", form.location_notes);
    }
    if !form.preparation_notes.is_empty() {
        println!("preparation notes: {}", form.preparation_notes);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
