use brokerdesk::{
    config::{self, settings::AppConfig},
    core::{
        client, doer,
        export::{self, ExportFile},
        finance::{self, PaymentPlatform, ProfitInput},
        import::{self, ImportReport},
        outreach::{self, Channel, Contact},
        project,
        record::{EntityKind, FieldValue, Record},
        report::{self, NameLookup, ProjectMetrics},
        search::{self, ClientFilter, DoerFilter, ProjectFilter},
        store::{self, DeleteReport, RecordStore},
    },
    entities::project as project_entity,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Operator console for a freelance brokerage
#[derive(Parser, Debug)]
#[command(name = "brokerdesk", version)]
struct Args {
    /// Settings file [default: brokerdesk.toml]
    #[arg(short, long, env = "BROKERDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the export directory from the settings file
    #[arg(long, env = "BROKERDESK_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every record of an entity (clients, doers, projects)
    Export { entity: EntityKind },
    /// Export the records with the given ids
    ExportSelected {
        entity: EntityKind,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Write an import template with one example row
    Template { entity: EntityKind },
    /// Create one record per row of a CSV file
    Import { entity: EntityKind, file: PathBuf },
    /// Export the projects log, optionally filtered
    ProjectsLog {
        #[arg(long, default_value = "")]
        search: String,
        /// First project date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last project date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Print project metrics
    Summary,
    /// Create a record from field=value pairs
    Create {
        entity: EntityKind,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Change the given fields of a record
    Update {
        entity: EntityKind,
        id: i64,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Delete one record
    Delete { entity: EntityKind, id: i64 },
    /// Delete the records with the given ids
    DeleteSelected {
        entity: EntityKind,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Print one record; clients and doers also list their projects
    Show { entity: EntityKind, id: i64 },
    /// Search clients or doers
    Search {
        entity: EntityKind,
        #[arg(default_value = "")]
        text: String,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
        /// Only records carrying this exact tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Work out a project's profit without saving anything
    Quote {
        #[arg(long, default_value = "")]
        deal: String,
        #[arg(long, default_value = "")]
        tip: String,
        #[arg(long, default_value = "")]
        doer_cost: String,
        #[arg(long, default_value = "")]
        deduction: String,
        #[arg(long, default_value = "PayPal")]
        platform: String,
    },
    /// Compose a project offer for a client or doer and print its send link
    Message {
        entity: EntityKind,
        id: i64,
        /// whatsapp, telegram or email
        #[arg(long)]
        via: Channel,
        /// Project link to include
        #[arg(long)]
        link: Option<String>,
        /// Deadline to include (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let args = Args::parse();

    // 3. Load settings
    let mut settings = match &args.config {
        Some(path) => config::settings::load_config(path),
        None => config::settings::load_default_config(),
    }
    .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    if let Some(dir) = args.export_dir {
        settings.export.directory = dir;
    }

    // 4. Connect and make sure the tables exist
    let database_url = config::database::get_database_url();
    let db = config::database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Ctrl+C stops a running import between rows
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_ctrl_c.cancel();
        }
    });

    run(args.command, &db, &settings, &cancel).await
}

async fn run(
    command: Command,
    db: &DatabaseConnection,
    settings: &AppConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Export { entity } => {
            let file = export::export_entities(db, entity).await?;
            save(file, settings, &format!("No {} to export", entity.plural()))
        }
        Command::ExportSelected { entity, ids } => {
            let file = export::export_selected(db, entity, &ids).await?;
            save(file, settings, &format!("No {} matched the given ids", entity.plural()))
        }
        Command::Template { entity } => save(Some(export::template(entity)), settings, ""),
        Command::Import { entity, file } => {
            let text = std::fs::read_to_string(&file)?;
            let report =
                import::import_records(db, entity, &text, settings.import.on_error, cancel).await;
            print_import_report(&report);
            Ok(())
        }
        Command::ProjectsLog { search, from, to } => {
            let projects = project::list_projects(db).await?;
            let names = NameLookup::load(db).await?;
            let filter = ProjectFilter {
                search,
                start_date: from,
                end_date: to,
            };
            let selected = filter.apply(&projects, &names);
            save(
                export::projects_log(&selected, &names, today),
                settings,
                "No projects match the filter",
            )
        }
        Command::Summary => {
            let projects = project::list_projects(db).await?;
            let metrics = ProjectMetrics::from_projects(&projects, today);
            println!("{}", report::format_metrics(&metrics));
            Ok(())
        }
        Command::Create { entity, fields } => {
            let created = db.create(entity, &to_record(fields)).await?;
            print_record(&created);
            Ok(())
        }
        Command::Update { entity, id, fields } => {
            let updated = db.update(entity, id, &to_record(fields)).await?;
            print_record(&updated);
            Ok(())
        }
        Command::Delete { entity, id } => {
            db.delete(entity, id).await?;
            println!("Deleted {entity} {id}");
            Ok(())
        }
        Command::DeleteSelected { entity, ids } => {
            let report = store::delete_records(db, entity, &ids, settings.import.on_error).await;
            print_delete_report(&report);
            Ok(())
        }
        Command::Show { entity, id } => show(db, entity, id).await,
        Command::Search {
            entity,
            text,
            favorites,
            tag,
        } => search_contacts(db, entity, text, favorites, tag).await,
        Command::Quote {
            deal,
            tip,
            doer_cost,
            deduction,
            platform,
        } => {
            let input = ProfitInput::from_form(&deal, &tip, &doer_cost, &deduction, &platform);
            print_breakdown(&input);
            Ok(())
        }
        Command::Message {
            entity,
            id,
            via,
            link,
            deadline,
        } => {
            let contact = load_contact(db, entity, id).await?;
            let message = outreach::compose_message(&contact.full_name, link.as_deref(), deadline);
            println!("{message}\n");
            println!("{}", outreach::send_link(via, &contact, &message)?);
            Ok(())
        }
    }
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))
}

fn to_record(fields: Vec<(String, String)>) -> Record {
    fields
        .into_iter()
        .map(|(key, value)| (key, FieldValue::Text(value)))
        .collect()
}

fn not_found(entity: EntityKind, id: i64) -> Error {
    Error::RecordNotFound {
        entity: entity.label(),
        id,
    }
}

async fn show(db: &DatabaseConnection, entity: EntityKind, id: i64) -> Result<()> {
    let linked = match entity {
        EntityKind::Client => {
            let found = client::get_client_by_id(db, id)
                .await?
                .ok_or_else(|| not_found(entity, id))?;
            print_record(&client::to_record(&found));
            project::get_projects_for_client(db, id).await?
        }
        EntityKind::Doer => {
            let found = doer::get_doer_by_id(db, id)
                .await?
                .ok_or_else(|| not_found(entity, id))?;
            print_record(&doer::to_record(&found));
            project::get_projects_for_doer(db, id).await?
        }
        EntityKind::Project => {
            let found = project::get_project_by_id(db, id)
                .await?
                .ok_or_else(|| not_found(entity, id))?;
            print_record(&project::to_record(&found));
            println!();
            print_breakdown(&project::profit_input(&found));
            return Ok(());
        }
    };

    println!("\nProjects ({}):", linked.len());
    for p in &linked {
        print_project_line(p);
    }
    Ok(())
}

async fn search_contacts(
    db: &DatabaseConnection,
    entity: EntityKind,
    text: String,
    favorites_only: bool,
    tag: Option<String>,
) -> Result<()> {
    match entity {
        EntityKind::Client => {
            let filter = ClientFilter {
                search: text,
                favorites_only,
                tag,
            };
            let clients = client::list_clients(db).await?;
            for c in clients.iter().filter(|c| filter.matches(c)) {
                println!("{:>5}  {}", c.id, c.full_name);
            }
            print_tags(&search::collect_tags(clients.iter().map(|c| &c.tags)));
        }
        EntityKind::Doer => {
            let filter = DoerFilter {
                search: text,
                favorites_only,
                tag,
            };
            let doers = doer::list_doers(db).await?;
            for d in doers.iter().filter(|d| filter.matches(d)) {
                println!("{:>5}  {} ({})", d.id, d.full_name, d.primary_expertise);
            }
            print_tags(&search::collect_tags(doers.iter().map(|d| &d.tags)));
        }
        EntityKind::Project => println!("Use projects-log to search projects"),
    }
    Ok(())
}

async fn load_contact(db: &DatabaseConnection, entity: EntityKind, id: i64) -> Result<Contact> {
    match entity {
        EntityKind::Client => client::get_client_by_id(db, id)
            .await?
            .map(|c| Contact::from(&c))
            .ok_or_else(|| not_found(entity, id)),
        EntityKind::Doer => doer::get_doer_by_id(db, id)
            .await?
            .map(|d| Contact::from(&d))
            .ok_or_else(|| not_found(entity, id)),
        EntityKind::Project => Err(Error::UnknownEntity {
            name: "project (messages go to clients or doers)".to_string(),
        }),
    }
}

fn print_record(record: &Record) {
    for (key, value) in record.iter() {
        let text = match value {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.normalize().to_string(),
            FieldValue::List(items) => items.join(", "),
        };
        println!("{key:>20}: {text}");
    }
}

fn print_project_line(p: &project_entity::Model) {
    println!(
        "{:>5}  {}  {}  {}  {}",
        p.id,
        p.project_date,
        p.title,
        p.status,
        report::format_currency(project::profit(p))
    );
}

fn print_tags(tags: &[String]) {
    if !tags.is_empty() {
        println!("\nTags: {}", tags.join(", "));
    }
}

fn print_breakdown(input: &ProfitInput) {
    let breakdown = finance::compute_breakdown(input);
    let platform = PaymentPlatform::from_label(&input.payment_platform).map_or_else(
        || format!("{} (no commission)", input.payment_platform),
        |platform| platform.to_string(),
    );
    println!("Platform:   {platform}");
    println!("Gross:      {}", report::format_currency(breakdown.gross));
    println!("Commission: {}", report::format_currency(breakdown.commission));
    println!("Doer cost:  {}", report::format_currency(breakdown.doer_cost));
    println!("Deductions: {}", report::format_currency(breakdown.deduction));
    println!("Profit:     {}", report::format_currency(breakdown.profit));
}

fn print_delete_report(report: &DeleteReport) {
    println!(
        "Deleted {} ({} failed, {} skipped)",
        report.deleted.len(),
        report.failures.len(),
        report.skipped.len()
    );
    for failure in &report.failures {
        println!("  id {}: {}", failure.id, failure.error);
    }
}

fn save(file: Option<ExportFile>, settings: &AppConfig, empty_message: &str) -> Result<()> {
    match file {
        Some(file) => {
            let path = file.write_to(&settings.export.directory)?;
            println!("{}", path.display());
        }
        None => println!("{empty_message}"),
    }
    Ok(())
}

fn print_import_report(report: &ImportReport) {
    println!(
        "Imported {} of {} rows ({} failed, {} skipped)",
        report.created.len(),
        report.total_rows,
        report.failures.len(),
        report.skipped()
    );
    for failure in &report.failures {
        println!("  row {}: {}", failure.row, failure.error);
    }
    if report.cancelled {
        println!("Import was cancelled; rows before the interruption were kept.");
    }
}
