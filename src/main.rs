use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use bto_portal::config::AppConfig;
use bto_portal::error::AppError;
use bto_portal::telemetry;
use bto_portal::workflows::bto::projects::ProjectStore;
use bto_portal::workflows::bto::staffing::InMemoryStaffingRepository;
use bto_portal::workflows::bto::{
    application_router, ApplicationService, InMemoryApplicationRepository, InMemoryProjectStore,
    Project, UserDirectory,
};
use bto_portal::workflows::roster::RosterImporter;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "BTO Portal",
    about = "Run the Build-To-Order housing portal or inspect roster exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with the flat-file roster exports
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Summarize a project roster export
    Summary(RosterSummaryArgs),
}

#[derive(Args, Debug)]
struct RosterSummaryArgs {
    /// Project roster CSV to load
    #[arg(long)]
    projects_csv: PathBuf,
    /// Optional account roster CSV to include a population count
    #[arg(long)]
    accounts_csv: Option<PathBuf>,
    /// Evaluation date for window status (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Roster {
            command: RosterCommand::Summary(args),
        } => run_roster_summary(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let projects = Arc::new(InMemoryProjectStore::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let staffing = Arc::new(InMemoryStaffingRepository::default());
    let directory = UserDirectory::default();

    seed_registries(&config, &projects, &directory)?;

    let application_service = Arc::new(ApplicationService::new(
        projects.clone(),
        applications.clone(),
        staffing.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(application_router(application_service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "housing portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_registries(
    config: &AppConfig,
    projects: &Arc<InMemoryProjectStore>,
    directory: &UserDirectory,
) -> Result<(), AppError> {
    if let Some(path) = &config.roster.projects_csv {
        let imported = RosterImporter::projects_from_path(path)?;
        let total = imported.len();
        for project in imported {
            if projects.insert(project.clone()).is_err() {
                warn!(project = %project.name, "duplicate project row skipped");
            }
        }
        info!(count = total, path = %path.display(), "seeded project registry");
    }

    if let Some(path) = &config.roster.accounts_csv {
        let imported = RosterImporter::accounts_from_path(path)?;
        let total = imported.len();
        for account in imported {
            if directory.register(account.clone()).is_err() {
                warn!(nric = %account.nric, "duplicate account row skipped");
            }
        }
        info!(count = total, path = %path.display(), "seeded user directory");
    }

    Ok(())
}

fn run_roster_summary(args: RosterSummaryArgs) -> Result<(), AppError> {
    let RosterSummaryArgs {
        projects_csv,
        accounts_csv,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let projects = RosterImporter::projects_from_path(projects_csv)?;

    println!("Project roster summary (evaluated {today})");
    if projects.is_empty() {
        println!("No projects in export");
    }
    for project in &projects {
        render_project(project, today);
    }

    if let Some(path) = accounts_csv {
        let accounts = RosterImporter::accounts_from_path(path)?;
        let applicants = accounts.iter().filter(|a| a.role.can_apply()).count();
        let officers = accounts.iter().filter(|a| a.role.can_staff()).count();
        let managers = accounts.iter().filter(|a| a.role.can_manage()).count();
        println!("\nAccounts: {} total", accounts.len());
        println!("- {applicants} may apply, {officers} may staff, {managers} may manage");
    }

    Ok(())
}

fn render_project(project: &Project, today: NaiveDate) {
    let window = if project.window_open(today) {
        "open"
    } else {
        "closed"
    };
    let visibility = if project.visible { "visible" } else { "hidden" };

    println!(
        "\n{} ({}) | window {} -> {} ({window}, {visibility})",
        project.name, project.neighborhood, project.open_date, project.close_date
    );
    println!(
        "Officer slots: {} filled of {}",
        project.assigned_officers.len(),
        project.officer_slots
    );
    for (flat_type, inventory) in &project.flats {
        println!(
            "- {}: {}/{} units available at ${}",
            flat_type.label(),
            inventory.available_units,
            inventory.total_units,
            inventory.price
        );
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
