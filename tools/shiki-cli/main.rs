use clap::{Parser, Subcommand};
use shiki::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect, fill in and validate saved forms
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the form store file
    #[arg(short, long, env = "SHIKI_STORE", default_value = "forms.json")]
    store: PathBuf,

    /// Log recomputation and store activity
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved forms, most recently updated first
    List {
        /// Only show forms whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a saved form's fields
    Show { id: String },
    /// Delete a saved form
    Delete { id: String },
    /// Add or replace a form from a schema JSON file
    Import { schema_path: PathBuf },
    /// Fill a form with values from a JSON file and validate it
    Submit { id: String, values_path: PathBuf },
    /// Show how each derived field is computed for the given values
    Explain { id: String, values_path: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut store = JsonFileStore::builder(&cli.store).pretty(true).build();
    info!(store = %cli.store.display(), "using form store");

    match cli.command {
        Command::List { search } => {
            let forms = match search {
                Some(term) => store.search(&term)?,
                None => store.list_sorted_by_updated()?,
            };
            if forms.is_empty() {
                println!("No saved forms.");
            }
            for form in forms {
                let summary = form.summary();
                println!(
                    "{}  {}  ({} fields, {} required, {} derived)  updated {}",
                    form.id,
                    display_name(&form),
                    summary.fields,
                    summary.required,
                    summary.derived,
                    form.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Show { id } => {
            let form = find_form(&store, &id)?;
            println!("{} [{}]", display_name(&form), form.id);
            for field in form.sorted_fields() {
                let mut flags = Vec::new();
                if field.required {
                    flags.push("required".to_string());
                }
                if let Some(config) = field.derivation() {
                    flags.push(format!("= {}", config.formula));
                }
                println!(
                    "  {:<3} {:<24} {:<9} {:<20} {}",
                    field.order,
                    field.id,
                    field.field_type.as_str(),
                    field.label,
                    flags.join(", ")
                );
            }
        }
        Command::Delete { id } => {
            if store.delete_by_id(&id)? {
                println!("Deleted form {}", id);
            } else {
                return Err(StoreError::NotFound(id).into());
            }
        }
        Command::Import { schema_path } => {
            let form: FormSchema = serde_json::from_str(&read_file(&schema_path)?)?;
            form.check()?;
            store.upsert(&form)?;
            println!("Imported form {} ({} fields)", form.id, form.fields.len());
        }
        Command::Submit { id, values_path } => {
            let mut session = open_session(&store, &id, &values_path)?;
            let outcome = session.submit();
            print_values(&session);
            if outcome.is_valid() {
                println!("\nForm is valid.");
            } else {
                println!("\n{} validation error(s):", outcome.errors.len());
                for error in &outcome.errors {
                    println!("  {}: {}", error.field_id, error.message);
                }
                std::process::exit(2);
            }
        }
        Command::Explain { id, values_path } => {
            let session = open_session(&store, &id, &values_path)?;
            let explained = session.explain();
            if explained.is_empty() {
                println!("Form has no derived fields.");
            }
            for (field_id, outcome) in explained {
                println!("{} = {}", field_id, outcome.value);
                println!("  -> {}", outcome.reason);
            }
        }
    }
    Ok(())
}

fn open_session(store: &JsonFileStore, id: &str, values_path: &Path) -> Result<FormSession> {
    let input: FormValues = serde_json::from_str(&read_file(values_path)?)?;
    let mut session = FormSession::new();
    session.load(store, id)?;
    session.enter_preview();

    let mut values = session.values().clone();
    values.extend(input);
    session.set_values(values);
    Ok(session)
}

fn find_form(store: &JsonFileStore, id: &str) -> Result<FormSchema> {
    Ok(store
        .get_by_id(id)?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?)
}

fn print_values(session: &FormSession) {
    for field in session.form().sorted_fields() {
        let value = session.value(&field.id).cloned().unwrap_or_default();
        println!("  {:<20} {}", field.label, value);
    }
}

fn display_name(form: &FormSchema) -> &str {
    if form.name.is_empty() { "Untitled Form" } else { &form.name }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
