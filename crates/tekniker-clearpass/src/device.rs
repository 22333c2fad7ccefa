//! Device lookup, creation and update.

use reqwest::Method;
use serde_json::Value;

use tekniker_core::messages;
use tekniker_core::result::AppResult;

use crate::client::ClearPassClient;

impl ClearPassClient {
    /// `GET /api/device/mac/{mac}`.
    pub async fn get_device(&self, mac: &str) -> AppResult<Value> {
        let url = self.endpoint(&["api", "device", "mac", mac])?;
        self.send_json(Method::GET, url, None, messages::DEVICE_FETCH_FAILED)
            .await
    }

    /// `POST /api/device` with the payload as given.
    pub async fn create_device(&self, payload: &Value) -> AppResult<Value> {
        let url = self.endpoint(&["api", "device"])?;
        self.send_json(
            Method::POST,
            url,
            Some(payload),
            messages::DEVICE_CREATE_FAILED,
        )
        .await
    }

    /// `PATCH /api/device/mac/{mac}` with the changed fields.
    pub async fn update_device(&self, mac: &str, payload: &Value) -> AppResult<Value> {
        let url = self.endpoint(&["api", "device", "mac", mac])?;
        self.send_json(
            Method::PATCH,
            url,
            Some(payload),
            messages::DEVICE_UPDATE_FAILED,
        )
        .await
    }
}
