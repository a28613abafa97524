pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::middleware::{guard, Access, ADMIN, STAFF};

pub use crate::state::AppState;

/// Build the full router. Each route states its own gates.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(user_routes(&state))
        .merge(donation_routes(&state))
        .merge(funding_routes(&state))
        .merge(blog_routes(&state))
        .merge(admin_routes(&state))
        // Last added runs first: requests are traced before CORS handling.
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::permissive().allow_origin(origins)
    }
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use handlers::{elevated, protected, public};

    // `:user` is an email on GET/PUT and a store id on PATCH.
    Router::new()
        .route("/users", guard(get(elevated::users_list), state, Access::Roles(ADMIN)))
        .route("/users", guard(post(public::user_create), state, Access::Public))
        .route("/users/:user", guard(get(protected::user_show), state, Access::Authenticated))
        .route("/users/:user", guard(put(public::user_update), state, Access::Public))
        .route("/users/:user/role", guard(get(public::user_role), state, Access::Public))
        .route("/users/:user/role", guard(patch(protected::user_set_role), state, Access::Authenticated))
        .route("/users/:user/status", guard(patch(protected::user_set_status), state, Access::Authenticated))
}

fn donation_routes(state: &AppState) -> Router<AppState> {
    use handlers::{elevated, protected, public};

    Router::new()
        .route("/donations", guard(get(protected::donations_list), state, Access::Authenticated))
        .route("/donations", guard(post(public::donation_create), state, Access::Public))
        .route("/donations/pending", guard(get(public::donations_pending), state, Access::Public))
        .route("/donations/search", guard(get(public::donations_search), state, Access::Public))
        .route(
            "/donations/:id",
            guard(
                get(protected::donation_show)
                    .patch(protected::donation_assign)
                    .put(protected::donation_update)
                    .delete(protected::donation_delete),
                state,
                Access::Authenticated,
            ),
        )
        .route(
            "/donations/:id/status",
            guard(patch(elevated::donation_set_status), state, Access::Roles(STAFF)),
        )
}

fn funding_routes(state: &AppState) -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route("/fundings", guard(get(protected::fundings_list), state, Access::Authenticated))
        .route("/fundings", guard(post(public::funding_create), state, Access::Public))
        .route(
            "/fundings/create-payment-intent",
            guard(post(public::funding_payment_intent), state, Access::Public),
        )
}

fn blog_routes(state: &AppState) -> Router<AppState> {
    use handlers::{elevated, public};

    Router::new()
        .route(
            "/blogs",
            guard(get(elevated::blogs_list).post(elevated::blog_create), state, Access::Roles(STAFF)),
        )
        .route("/blogs/published", guard(get(public::blogs_published), state, Access::Public))
        .route("/blogs/:id", guard(delete(elevated::blog_delete), state, Access::Roles(ADMIN)))
        .route(
            "/blogs/:id/status",
            guard(patch(elevated::blog_set_status), state, Access::Roles(ADMIN)),
        )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::elevated;

    Router::new().route(
        "/admin/dashboard-stats",
        guard(get(elevated::dashboard_stats), state, Access::Roles(STAFF)),
    )
}
