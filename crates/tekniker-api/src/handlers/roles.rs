//! Device role listing.

use axum::Json;
use axum::extract::State;
use tracing::debug;

use tekniker_clearpass::{DeviceRole, filter_roles};
use tekniker_core::error::AppError;

use crate::extractors::AuthSession;
use crate::state::AppState;

/// GET /GetDeviceRoles
///
/// Lists the guest roles from ClearPass, restricted to the roles granted to
/// the caller by the allow-list. A caller whose entry grants no roles sees
/// all of them.
pub async fn get_device_roles(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<DeviceRole>>, AppError> {
    let roles = state.clearpass.list_roles().await?;
    let allowlist = state.allowlist.load().await?;
    let allowed = allowlist.allowed_role_ids(session.email());

    let total = roles.len();
    let roles = filter_roles(roles, &allowed);
    debug!(total, visible = roles.len(), "Device roles filtered");

    Ok(Json(roles))
}
