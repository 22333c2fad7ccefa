//! Device lookup, creation and update.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::{info, warn};

use tekniker_clearpass::validate_mac;
use tekniker_core::error::AppError;
use tekniker_core::messages;
use tekniker_core::result::AppResult;

use crate::dto::request::DeviceQuery;
use crate::extractors::{AuthSession, JsonBody};
use crate::state::AppState;

/// Fields forwarded to ClearPass on update.
const UPDATE_FIELDS: &[&str] = &[
    "role_id",
    "enabled",
    "visitor_name",
    "expire_time",
    "sponsor_name",
    "sponsor_profile",
];

/// GET /get_device_info?macaddr=...
pub async fn get_device_info(
    State(state): State<AppState>,
    _session: AuthSession,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Value>, AppError> {
    let mac = validate_mac(query.macaddr.as_deref().unwrap_or_default())?;
    let device = state.clearpass.get_device(&mac).await?;
    Ok(Json(device))
}

/// POST /create_device
///
/// The payload must carry `mac` and `role_id`; it is forwarded as given,
/// with `sponsor_name` defaulting to the caller.
pub async fn create_device(
    State(state): State<AppState>,
    session: AuthSession,
    JsonBody(payload): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const REQUIRED: &[&str] = &["mac", "role_id"];

    let mut fields = require_fields(payload, REQUIRED)?;
    let mac = validate_mac(fields.get("mac").and_then(Value::as_str).unwrap_or_default())?;
    fields.insert("mac".to_string(), Value::String(mac.clone()));

    let role_id = requested_role(&fields)?;
    ensure_role_allowed(&state, session.email(), role_id.as_deref()).await?;
    default_sponsor(&mut fields, session.email());

    let created = state.clearpass.create_device(&Value::Object(fields)).await?;
    info!(mac = %mac, sponsor = session.email(), "Device created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /update_device (POST accepted)
///
/// Only `mac` is required; the known device fields present in the payload
/// are sent to ClearPass.
pub async fn update_device(
    State(state): State<AppState>,
    session: AuthSession,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let fields = require_fields(payload, &["mac"])?;
    let mac = validate_mac(fields.get("mac").and_then(Value::as_str).unwrap_or_default())?;

    let mut changes = Map::new();
    changes.insert("mac".to_string(), Value::String(mac.clone()));
    for key in UPDATE_FIELDS {
        if let Some(value) = fields.get(*key) {
            changes.insert((*key).to_string(), value.clone());
        }
    }

    let role_id = requested_role(&changes)?;
    ensure_role_allowed(&state, session.email(), role_id.as_deref()).await?;
    default_sponsor(&mut changes, session.email());

    let updated = state
        .clearpass
        .update_device(&mac, &Value::Object(changes))
        .await?;
    info!(mac = %mac, sponsor = session.email(), "Device updated");
    Ok(Json(updated))
}

/// The payload as an object holding every `required` field.
fn require_fields(payload: Value, required: &[&str]) -> AppResult<Map<String, Value>> {
    let missing = || AppError::validation(messages::missing_fields(required));

    let Value::Object(fields) = payload else {
        return Err(missing());
    };

    let complete = required
        .iter()
        .all(|f| fields.get(*f).is_some_and(|v| !v.is_null()));
    if !complete {
        return Err(missing());
    }

    Ok(fields)
}

/// The `role_id` a payload asks for; anything but a string or number is a
/// validation error.
fn requested_role(fields: &Map<String, Value>) -> AppResult<Option<String>> {
    match fields.get("role_id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(AppError::validation(messages::ROLE_ID_INVALID)),
    }
}

/// Reject a role outside the caller's allow-listed roles. Callers whose
/// entry lists no roles may assign any role.
async fn ensure_role_allowed(
    state: &AppState,
    email: &str,
    role_id: Option<&str>,
) -> AppResult<()> {
    let Some(role_id) = role_id else {
        return Ok(());
    };

    let allowed = state.allowlist.load().await?.allowed_role_ids(email);
    if allowed.is_empty() || allowed.contains(role_id) {
        return Ok(());
    }

    warn!(email, role_id, "Role not allowed for caller");
    Err(AppError::authorization(messages::ROLE_NOT_ALLOWED))
}

fn default_sponsor(fields: &mut Map<String, Value>, email: &str) {
    let missing = fields
        .get("sponsor_name")
        .and_then(Value::as_str)
        .is_none_or(|s| s.trim().is_empty());
    if missing {
        fields.insert("sponsor_name".to_string(), Value::String(email.to_string()));
    }
}
