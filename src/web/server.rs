//! Web server assembly
//!
//! Builds the application state and the axum router for the menu API.

use super::handlers;
use crate::auth::TokenValidator;
use crate::config::Config;
use crate::storage::DrinkStore;
use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrinkStore>,
    pub validator: Arc<TokenValidator>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn DrinkStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<TokenValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.validator.clone()
    }
}

/// HTTP server for the drinks menu API
pub struct ApiServer {
    bind: String,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: Config, store: Arc<dyn DrinkStore>, validator: TokenValidator) -> Self {
        let bind = config.server.bind.clone();
        let state = AppState {
            store,
            validator: Arc::new(validator),
            config,
        };

        Self { bind, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route(
                "/drinks",
                get(handlers::list_drinks).post(handlers::create_drink),
            )
            .route("/drinks-detail", get(handlers::drink_details))
            .route(
                "/drinks/{id}",
                axum::routing::patch(handlers::update_drink).delete(handlers::delete_drink),
            )
            .route("/health", get(handlers::health))
            // The menu is read by browsers from anywhere
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(&self.bind).await?;

        tracing::info!(bind = %self.bind, "Starting Barkeep menu API");

        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Get the bind address
    pub fn bind_address(&self) -> &str {
        &self.bind
    }
}
