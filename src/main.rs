use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hirewire::{api, config, errors::AppError, jobs, mailer, notify, store, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "hirewire=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let port = match args.command {
        Some(cli::Commands::Serve { port }) => port.unwrap_or(cfg.port),
        None => cfg.port,
    };

    run_server(cfg, port).await
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    let db = store::PgStore::connect(&cfg.database_url).await?;
    db.migrate().await?;

    // The SMTP pool is built once here and injected; it lives as long as the
    // process and closes with it.
    let transport = Arc::new(mailer::SmtpMailer::new(&cfg.smtp)?);
    let mail = mailer::Mailer::new(transport, cfg.email_retry);
    let notifier = notify::NotificationService::new(db.clone(), mail);

    let retention_days = cfg.retention_days;
    let state = Arc::new(AppState {
        db: db.clone(),
        notifier,
        config: cfg,
    });

    let app = axum::Router::new()
        .route("/healthz", axum::routing::get(liveness_check))
        .route("/readyz", axum::routing::get(readiness_check))
        .nest("/api/v1", api::api_router(state.clone()))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_layer());

    jobs::retention::spawn(db, retention_days);
    tracing::info!(
        "retention sweep started (hourly, {} day window)",
        retention_days
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("hirewire notification service listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restrict CORS to the portal frontend (PORTAL_ORIGIN env var, defaults to
/// localhost for dev).
fn cors_layer() -> tower_http::cors::CorsLayer {
    use axum::http::{HeaderName, Method};
    use tower_http::cors::{AllowOrigin, CorsLayer};

    let portal_origin =
        std::env::var("PORTAL_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or("");
            origin_str == portal_origin
                || origin_str.starts_with("http://localhost:")
                || origin_str.starts_with("http://127.0.0.1:")
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-admin-key"),
        ])
}

async fn liveness_check() -> &'static str {
    "ok"
}

async fn readiness_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<&'static str, AppError> {
    sqlx::query("SELECT 1").execute(state.db.pool()).await?;
    Ok("ok")
}
