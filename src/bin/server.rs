use std::{
    error::Error, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    DEFAULT_SEED_URL, PaginationConfig, SeedSource, build_router, graceful_shutdown,
    logging_middleware, stores::sqlite::create_app_state,
};

/// The JSON API server for the monthly sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// File path to the application SQLite database. Uses an in-memory
    /// database if not given.
    #[arg(long, env = "DB_PATH")]
    db_path: Option<PathBuf>,

    /// The URL of the JSON document that `/api/init` loads transactions from.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// How many seconds to wait for the seed data before giving up.
    #[arg(long, env = "SEED_TIMEOUT_SECS", default_value_t = 30)]
    seed_timeout_secs: u64,

    /// The number of transactions per page when a request does not say.
    #[arg(long, env = "PAGE_SIZE", default_value_t = 10)]
    page_size: u64,

    /// File path to append debug logs to.
    #[arg(long, env = "LOG_PATH")]
    log_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_path.as_ref())?;

    let connection = match &args.db_path {
        Some(db_path) => Connection::open(db_path)?,
        None => {
            tracing::warn!("No database path given, data will be lost on shutdown.");
            Connection::open_in_memory()?
        }
    };

    let pagination_config = PaginationConfig {
        default_page_size: args.page_size.max(1),
        ..Default::default()
    };
    let seed_source = SeedSource::new(
        &args.seed_url,
        Duration::from_secs(args.seed_timeout_secs),
    )?;
    let state = create_app_state(connection, pagination_config, seed_source)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    let addr = SocketAddr::new(args.host, args.port);
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_path: Option<&PathBuf>) -> Result<(), std::io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let debug_log = match log_path {
        Some(log_path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
