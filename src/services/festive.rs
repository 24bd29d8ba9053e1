//! Optional remote festive-phrase service
//!
//! A purely decorative request/response call: mode in, short blessing out.
//! Every failure path (disabled, missing key, network, quota, malformed
//! response, empty text) resolves to the mode's static fallback phrase; the
//! particle core never sees this call or its errors.

use tracing::{debug, warn};

use crate::configuration::config::FestiveConfig;
use crate::shape::mode::Mode;

#[derive(Debug, Clone)]
pub struct FestiveClient {
    endpoint: Option<String>,
    model: String,
    api_key: Option<String>,
}

impl FestiveClient {
    /// Client from config; the API key is read from the configured
    /// environment variable at build time.
    pub fn from_config(cfg: &FestiveConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: std::env::var(&cfg.api_key_env).ok(),
        }
    }

    /// Disabled client that always answers with the fallback phrase.
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            model: String::new(),
            api_key: None,
        }
    }

    /// Blocking; call from a worker thread, not the frame loop. Always
    /// returns a displayable string.
    pub fn line(&self, mode: Mode) -> String {
        if mode == Mode::Idle {
            return mode.fallback_phrase().to_string();
        }
        match self.request(mode) {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                debug!(?mode, "festive service unavailable, using fallback phrase");
                mode.fallback_phrase().to_string()
            }
        }
    }

    /// generateContent-style REST call. `None` on any failure.
    fn request(&self, mode: Mode) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;
        let key = self.api_key.as_deref()?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            endpoint.trim_end_matches('/'),
            self.model,
            key
        );
        let prompt = format!(
            "User selected theme: {}. Provide a very short (10 words max), extremely \
             festive, and poetic Chinese New Year blessing specifically mentioning the \
             \"Year of the Horse\" (2026) and this theme. Output ONLY the Chinese text.",
            mode.label()
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.9, "topP": 0.95 }
        });

        let response = reqwest::blocking::Client::new()
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| warn!(error = %e, "festive request failed"))
            .ok()?;
        let value: serde_json::Value = response
            .json()
            .map_err(|e| warn!(error = %e, "festive response was not JSON"))
            .ok()?;

        value
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(str::to_string)
    }
}
