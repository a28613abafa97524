pub mod auth;
pub mod path_id;
pub mod require_role;

pub use auth::authenticate;
pub use path_id::require_valid_id;
pub use require_role::{require_roles, RoleGate};

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::MethodRouter,
};

use crate::database::models::Role;
use crate::state::AppState;

pub const ADMIN: &[Role] = &[Role::Admin];
pub const STAFF: &[Role] = &[Role::Admin, Role::Volunteer];

/// Gates a single route declares for itself.
#[derive(Debug, Clone, Copy)]
pub enum Access {
    Public,
    /// Gate A only.
    Authenticated,
    /// Gate A, then Gate B with the given role set.
    Roles(&'static [Role]),
}

/// Wrap one method route in the gates `access` asks for. The last
/// `route_layer` added runs first, so role-gated routes run Gate A, then the
/// `:id` check, then Gate B.
pub fn guard(route: MethodRouter<AppState>, state: &AppState, access: Access) -> MethodRouter<AppState> {
    match access {
        Access::Public => route,
        Access::Authenticated => route.route_layer(from_fn_with_state(state.clone(), authenticate)),
        Access::Roles(allowed) => route
            .route_layer(from_fn_with_state(
                RoleGate {
                    state: state.clone(),
                    allowed,
                },
                require_roles,
            ))
            .route_layer(from_fn(require_valid_id))
            .route_layer(from_fn_with_state(state.clone(), authenticate)),
    }
}
