use std::{env, fs::OpenOptions, net::SocketAddr, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use donidam::{
    AppState, DEFAULT_TIMEZONE, MainCardThresholds, PaginationConfig, build_router,
    get_local_offset, graceful_shutdown, logging_middleware,
};

/// The REST API server for the donidam household budget.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical timezone name that months and "today" are resolved in.
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// The number of transactions per page when a request does not set `limit`.
    #[arg(long, default_value_t = 20)]
    page_size: u64,

    /// The largest page of transactions a request may ask for.
    #[arg(long, default_value_t = 100)]
    max_page_size: u64,

    /// Spending at or above this percentage of the budget is over budget.
    #[arg(long, default_value_t = 100)]
    over_budget_percent: i64,

    /// Spending at or above this percentage of the budget is always a warning.
    #[arg(long, default_value_t = 90)]
    strong_warning_percent: i64,

    /// Spending at or above this percentage of the budget is a warning unless cruising.
    #[arg(long, default_value_t = 80)]
    mild_warning_percent: i64,

    /// How many percentage points the month must be ahead of spending to count as cruising.
    #[arg(long, default_value_t = 10)]
    cruising_gap: i64,

    /// Log the headers and bodies of every request and response.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("Invalid timezone {}", args.timezone);
        exit(1);
    }

    if args.page_size == 0 || args.page_size > args.max_page_size {
        tracing::error!(
            "The page size must be between 1 and the max page size ({}), got {}",
            args.max_page_size,
            args.page_size
        );
        exit(1);
    }

    let thresholds = MainCardThresholds {
        over_budget: args.over_budget_percent,
        strong_warning: args.strong_warning_percent,
        mild_warning: args.mild_warning_percent,
        cruising_gap: args.cruising_gap,
    };

    if !thresholds.is_valid() {
        tracing::error!(
            "The thresholds must satisfy 0 <= mild warning <= strong warning <= over budget \
            and the cruising gap must not be negative, got {thresholds:?}"
        );
        exit(1);
    }

    let jwt_secret =
        env::var("JWT_SECRET").expect("The environment variable 'JWT_SECRET' must be set");

    let connection = Connection::open(&args.db_path).expect("Could not open database");
    let state = AppState::new(
        connection,
        &jwt_secret,
        &args.timezone,
        PaginationConfig {
            default_page_size: args.page_size,
            max_page_size: args.max_page_size,
        },
    )
    .expect("Could not initialize database")
    .with_main_card_thresholds(thresholds);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);
    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
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
        // Errors are logged when they are converted into problem details.
        .on_failure(());

    router.layer(tracing_layer)
}
