//! Best-effort signature persistence
//!
//! Each submit is a detached task on a runtime owned by the client. Failures
//! are logged and dropped; nothing here reports back to the UI.

use std::env;
use std::time::Duration;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::config::{PersistencePreferences, SessionPreferences};
use crate::error::PersistenceError;
use crate::style::StyleState;

/// Environment variable the login flow uses to pass the user id
pub const USER_ID_ENV: &str = "INKNAME_USER_ID";

const SIGNATURES_PATH: &str = "/api/signatures/";

/// Backend id of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Supplies the id of the current user
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Identity read from the environment, then from the config file
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    user_id: Option<UserId>,
}

impl SessionIdentity {
    pub fn from_session(session: &SessionPreferences) -> Self {
        let from_env = env::var(USER_ID_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok());
        Self {
            user_id: from_env.or(session.user_id).map(UserId),
        }
    }

    pub fn fixed(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Request body for the signature creation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureRecord {
    pub user_id: UserId,
    pub font_style: String,
    pub color: String,
}

impl SignatureRecord {
    pub fn new(user_id: UserId, style: &StyleState) -> Self {
        Self {
            user_id,
            font_style: style.font().to_string(),
            color: style.color().to_string(),
        }
    }
}

/// A signature as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedSignature {
    pub id: i64,
    pub user_id: i64,
    pub font_style: String,
    pub color: String,
    pub created_at: String,
}

/// Fire-and-forget destination for generated styles
pub trait SignatureSink: Send + Sync {
    fn submit(&self, record: SignatureRecord);
}

/// Sink used when persistence is switched off
pub struct DisabledSink;

impl SignatureSink for DisabledSink {
    fn submit(&self, record: SignatureRecord) {
        info!("Persistence disabled; not saving {:?}", record);
    }
}

/// HTTP client for the signature backend
pub struct PersistenceClient {
    runtime: Runtime,
    http: reqwest::Client,
    base_url: String,
}

impl PersistenceClient {
    pub fn new(prefs: &PersistencePreferences) -> Result<Self, PersistenceError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("persistence")
            .enable_all()
            .build()
            .map_err(|e| PersistenceError::Client(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(prefs.timeout_secs.max(1)))
            .build()
            .map_err(|e| PersistenceError::Client(e.to_string()))?;

        Ok(Self {
            runtime,
            http,
            base_url: prefs.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_url(&self) -> String {
        format!("{}{}", self.base_url, SIGNATURES_PATH)
    }

    fn history_url(&self, user_id: UserId) -> String {
        format!("{}{}{}", self.base_url, SIGNATURES_PATH, user_id.0)
    }

    /// Spawn the save as a detached task; the outcome only reaches the log
    pub fn spawn_save(&self, record: SignatureRecord) -> JoinHandle<()> {
        let http = self.http.clone();
        let url = self.create_url();
        self.runtime.spawn(async move {
            match save(&http, &url, &record).await {
                Ok(saved) => info!("Signature saved: {:?}", saved),
                Err(e) => error!("Error saving signature: {}", e),
            }
        })
    }

    /// Save and wait for the result
    pub fn save_now(&self, record: &SignatureRecord) -> Result<SavedSignature, PersistenceError> {
        self.runtime
            .block_on(save(&self.http, &self.create_url(), record))
    }

    /// All signatures saved for a user
    pub fn fetch_history(&self, user_id: UserId) -> Result<Vec<SavedSignature>, PersistenceError> {
        let url = self.history_url(user_id);
        self.runtime.block_on(async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(PersistenceError::Transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(PersistenceError::Rejected(status));
            }
            response
                .json::<Vec<SavedSignature>>()
                .await
                .map_err(PersistenceError::Decode)
        })
    }

    /// Give a detached task up to `grace` to finish
    pub fn wait(&self, handle: JoinHandle<()>, grace: Duration) {
        if self
            .runtime
            .block_on(tokio::time::timeout(grace, handle))
            .is_err()
        {
            warn!("Signature save still pending after {:?}", grace);
        }
    }

    /// Stop the runtime, letting in-flight saves run for up to `grace`
    pub fn shutdown(self, grace: Duration) {
        self.runtime.shutdown_timeout(grace);
    }
}

impl SignatureSink for PersistenceClient {
    fn submit(&self, record: SignatureRecord) {
        drop(self.spawn_save(record));
    }
}

async fn save(
    http: &reqwest::Client,
    url: &str,
    record: &SignatureRecord,
) -> Result<SavedSignature, PersistenceError> {
    let response = http
        .post(url)
        .json(record)
        .send()
        .await
        .map_err(PersistenceError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PersistenceError::Rejected(status));
    }

    response
        .json::<SavedSignature>()
        .await
        .map_err(PersistenceError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let style = StyleState::new("Brush Script MT, cursive", "#ff0000");
        let record = SignatureRecord::new(UserId(1), &style);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r##"{"user_id":1,"font_style":"Brush Script MT, cursive","color":"#ff0000"}"##
        );
    }

    #[test]
    fn test_urls() {
        let prefs = PersistencePreferences {
            base_url: "http://example.test/".to_string(),
            ..Default::default()
        };
        let client = PersistenceClient::new(&prefs).unwrap();
        assert_eq!(client.create_url(), "http://example.test/api/signatures/");
        assert_eq!(
            client.history_url(UserId(3)),
            "http://example.test/api/signatures/3"
        );
        client.shutdown(Duration::from_millis(10));
    }

    #[test]
    fn test_identity_sources() {
        assert_eq!(SessionIdentity::anonymous().current_user_id(), None);
        assert_eq!(
            SessionIdentity::fixed(UserId(9)).current_user_id(),
            Some(UserId(9))
        );
    }

    #[test]
    fn test_saved_signature_parses_backend_shape() {
        let body = r##"{"id":5,"user_id":1,"font_style":"Pacifico, cursive","color":"#000000","created_at":"2024-05-01T10:00:00"}"##;
        let saved: SavedSignature = serde_json::from_str(body).unwrap();
        assert_eq!(saved.id, 5);
        assert_eq!(saved.font_style, "Pacifico, cursive");
    }
}
