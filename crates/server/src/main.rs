//! Photogram server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use photogram_api::{middleware::AppState, router as api_router};
use photogram_common::Config;
use photogram_core::{CommentService, FollowingService, LikeService, PostService, TagService, UserService};
use photogram_db::repositories::{
    CommentRepository, FollowingRepository, LikeRepository, PostRepository, TagRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photogram=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting photogram server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = photogram_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    photogram_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let tag_repo = TagRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let following_repo = FollowingRepository::new(Arc::clone(&db));

    // Initialize services
    let tag_service = TagService::new(tag_repo);
    let user_service = UserService::new(
        user_repo.clone(),
        post_repo.clone(),
        following_repo.clone(),
    );
    let post_service = PostService::new(
        post_repo.clone(),
        user_repo.clone(),
        following_repo.clone(),
        tag_service,
    );
    let comment_service = CommentService::new(comment_repo, post_repo.clone());
    let like_service = LikeService::new(like_repo, post_repo);
    let following_service = FollowingService::new(following_repo, user_repo);

    let state = AppState {
        user_service,
        post_service,
        comment_service,
        like_service,
        following_service,
    };

    // Build the application router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            photogram_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
