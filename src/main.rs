//! Exposure Engine
//!
//! Queries one AWS account for exposed surface: EC2 instances with their
//! inbound security-group rules plus a multi-region RDS scan. The result is
//! written to a text report and served as a web page.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use exposure_engine::identity;
use exposure_engine::inventory::InventoryBuilder;
use exposure_engine::report::{self, ExposureReport};
use exposure_engine::scan::{AwsClientFactory, ScanCoordinator, DEFAULT_REGIONS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Regions to scan for RDS instances (comma-separated)
    #[arg(long, value_delimiter = ',')]
    regions: Option<Vec<String>>,

    /// Only list instance ids and names in the report
    #[arg(long)]
    just_instances: bool,

    /// Path the text report is written to
    #[arg(long, default_value = "output.txt")]
    output: PathBuf,

    /// Port the report server listens on
    #[arg(long, default_value_t = 3000, env = "EXPOSURE_PORT")]
    port: u16,

    /// Write the report and exit without serving it
    #[arg(long)]
    no_serve: bool,
}

#[derive(Clone)]
struct AppState {
    report_html: Arc<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    let cli = Cli::parse();

    info!("Starting Exposure Engine");

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let account_id = identity::caller_account(&config).await?;

    info!(account = %account_id, "Analyzing EC2 instances");
    let instances = InventoryBuilder::new(&config).build().await?;

    let regions = cli
        .regions
        .unwrap_or_else(|| DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect());

    info!(account = %account_id, "Analyzing RDS databases across regions");
    let coordinator = ScanCoordinator::new(Arc::new(AwsClientFactory), regions);
    let databases = coordinator.scan_all_regions().await;

    let report = ExposureReport::new(account_id, instances, databases);
    let text = report.render_text(cli.just_instances);

    report::persist(&cli.output, &text).await?;
    info!(path = %cli.output.display(), "Report written");

    if cli.no_serve {
        return Ok(());
    }

    let state = AppState {
        report_html: Arc::new(report::render_html(&text)),
    };

    let app = Router::new()
        .route("/", get(serve_report))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!("Report server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_report(State(state): State<AppState>) -> Html<String> {
    Html(state.report_html.as_ref().clone())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "exposure-engine",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
