use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use storefront_rs::{
    AppState, DbConnector, PaginationConfig, build_router, graceful_shutdown, logging_middleware,
};

/// The JSON API server for the storefront and its admin console.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    ///
    /// Without a database the category listing serves demo data and all
    /// writes are rejected.
    #[arg(long)]
    db_path: Option<String>,

    /// The IP address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr: SocketAddr = format!("{}:{}", args.address, args.port)
        .parse()
        .expect("Could not parse the address and port");

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let db = match &args.db_path {
        Some(db_path) => match DbConnector::open(db_path) {
            Ok(db) => {
                tracing::info!("Opened database at {db_path:?}");
                db
            }
            Err(error) => {
                tracing::error!(
                    "Could not open database at {db_path:?}: {error}. Serving demo data only."
                );
                DbConnector::disconnected()
            }
        },
        None => {
            tracing::warn!("No database path given. Serving demo data only.");
            DbConnector::disconnected()
        }
    };

    let state = AppState::new(db, &secret, PaginationConfig::default());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
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
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
