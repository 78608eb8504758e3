use std::sync::Arc;

use sqlx::PgPool;
use tower_http::{
    services::{ServeDir, ServeFile},
    cors::{CorsLayer, Any},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dispatch_be::{
    repository::PgReservationRepository,
    routes::api_router,
    AppContext, AppResult, Config,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dispatch_be=debug,info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = Config::load()?;

    // Connect to PostgreSQL
    let pool = PgPool::connect(&config.database_url).await?;
    let repo = PgReservationRepository::new(pool);
    repo.init_schema().await?;

    let index = format!("{}/index.html", config.static_dir);
    let serve_dir = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));

    let addr = config.bind_addr.clone();
    let ctx = AppContext::new(Arc::new(repo), config);

    let app = api_router(ctx)
        // Frontend build handles every other path
        .fallback_service(serve_dir)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| dispatch_be::AppError::Config(format!("cannot bind {}: {}", addr, e)))?;
    info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| dispatch_be::AppError::Config(format!("server error: {}", e)))?;

    Ok(())
}
