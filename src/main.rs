use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metropole_crm_api::config::Config;
use metropole_crm_api::handlers::{self, AppState};
use metropole_crm_api::metropole_client::MetropoleClient;
use metropole_crm_api::product_registry::ProductRegistry;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The remote Metropole lead-service client.
/// - The file-backed product registry.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metropole_crm_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the remote lead-service client
    let client = MetropoleClient::new(config.metropole_base_url.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize Metropole client: {}", e))?;
    tracing::info!("Metropole client initialized: {}", config.metropole_base_url);

    // Load the product registry, seeding the default entry if the
    // backing file is absent or corrupt
    let registry = ProductRegistry::open(&config.products_path).await;

    // Build application state
    let app_state = Arc::new(AppState::new(config.clone(), client, registry));

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        // Lead list, intake and detail
        .route(
            "/api/v1/leads",
            get(handlers::list_leads).post(handlers::create_lead),
        )
        .route("/api/v1/leads/:id", get(handlers::get_lead))
        .route("/api/v1/leads/:id/status", put(handlers::update_lead_status))
        // Sibling statistics view
        .route("/api/v1/stats", get(handlers::get_stats))
        // Product registry
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::add_product),
        )
        .route(
            "/api/v1/products/:id",
            put(handlers::update_product).delete(handlers::remove_product),
        )
        // Session boundary
        .route("/api/v1/session/sign-out", post(handlers::sign_out))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
