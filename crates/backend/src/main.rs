mod assets;
mod config;
mod graphql;

use std::path::Path;
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use graphql::Schema;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(schema: Schema, assets_dir: &Path) -> Router {
    let static_files = Router::new()
        .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
        .nest(
            "/dist",
            cached_static_router(Path::new("dist"), CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(Path::new("dist/assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(serve_index))
        .route("/contracts/{address}/tokens/{id}", get(serve_index))
        .with_state(schema)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = config::Config::from_env()?;
    let loaded_assets = Arc::new(assets::Assets::load(&config.assets_dir)?);

    let schema = graphql::build_schema(loaded_assets, Arc::new(config.contracts.clone()));
    let app = build_app(schema, &config.assets_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(port = config.port, "Server running at http://localhost:{}", config.port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

async fn serve_index() -> Html<String> {
    // Serve the built frontend if present
    match tokio::fs::read_to_string("dist/index.html").await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Land Atlas</title></head>
<body>
<h1>Land Atlas</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the API.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}
