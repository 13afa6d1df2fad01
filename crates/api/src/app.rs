use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    routing::{get, post},
    Router,
};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::routes::{bookings, grounds, schedule, session};
use crate::state::AppState;

/// Build the Axum router for the booking API and the session proxy.
///
/// Rate limiting keys on the peer address, so serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: AppState, config: &AppConfig) -> anyhow::Result<Router> {
    // Rate limiting: 10 requests per minute per IP on session creation
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(6) // 1 token every 6 seconds = ~10/min
        .burst_size(10)
        .finish()
        .context("invalid rate limit configuration")?;

    let rate_limited_routes = Router::new()
        .route("/sessions", post(session::create_session))
        .layer(GovernorLayer::new(Arc::new(governor_conf)));

    let cors = if config.allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else if config.allowed_origins.iter().any(|o| o == "*") {
        anyhow::bail!("wildcard origin cannot be combined with credentialed CORS");
    } else {
        AllowOrigin::list(config.allowed_origins.clone())
    };

    Ok(Router::new()
        .route("/health", get(health))
        // Ground catalog and priced slots
        .route("/grounds", get(grounds::list_grounds))
        .route("/grounds/{id}", get(grounds::get_ground))
        .route("/grounds/{id}/slots", get(grounds::list_slots))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/quote", post(bookings::quote_booking))
        .route("/bookings/{id}", get(bookings::get_booking))
        .route("/bookings/{id}/cancel", post(bookings::cancel_booking))
        // Schedule views
        .route("/schedule", get(schedule::get_schedule))
        .route("/schedule/week", get(schedule::get_week))
        // Upstream identity service proxy
        .route("/oauth/google/redirect_url", get(session::google_redirect_url))
        .route("/users/me", get(session::current_user))
        .route("/logout", post(session::logout))
        .merge(rate_limited_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(cors)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true),
        ))
}

async fn health() -> &'static str {
    "ok"
}
