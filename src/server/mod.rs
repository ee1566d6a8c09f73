//! JSON API server

mod error;
mod handlers;

pub use error::ApiError;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::MarkdownRenderer;
use crate::Blog;

/// Server state, read-only for the life of the process
pub(crate) struct AppState {
    blog: Blog,
    renderer: MarkdownRenderer,
}

/// Build the API router for a blog
pub fn router(blog: Blog) -> Router {
    let renderer = MarkdownRenderer::with_config(blog.config.markdown.clone());
    let state = Arc::new(AppState { blog, renderer });

    Router::new()
        .route("/posts", get(handlers::list_posts))
        .route("/posts/tag", get(handlers::posts_by_tag))
        .route("/posts/:slug", get(handlers::get_post))
        .route("/posts/:slug/render", get(handlers::render_post))
        .route("/search", get(handlers::search_posts))
        .route("/tags", get(handlers::list_tags))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until Ctrl+C
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Serving {:?} from {:?}", blog.config.title, blog.content_dir);
    let app = router(blog.clone());

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
