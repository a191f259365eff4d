//! Submission seam.
//!
//! The synthesized form hands its final value map to a [`SubmitPort`]. The
//! bundled [`LoggingSubmitHandler`] accepts and logs; real deployments plug in
//! a network-backed implementation.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

use super::FormState;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, String>),

    #[error("Submit handler failed: {0}")]
    Handler(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReceipt {
    pub message: String,
}

#[async_trait]
pub trait SubmitPort: Send + Sync {
    async fn submit(&self, payload: &Value) -> Result<SubmitReceipt, SubmitError>;
}

/// Accepts every payload and logs it.
pub struct LoggingSubmitHandler;

impl LoggingSubmitHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingSubmitHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmitPort for LoggingSubmitHandler {
    async fn submit(&self, payload: &Value) -> Result<SubmitReceipt, SubmitError> {
        info!(payload = %payload, "Form submitted");
        Ok(SubmitReceipt {
            message: "Form submitted".to_string(),
        })
    }
}

/// Submit the state's values if they pass validation.
///
/// Callers normally apply [`FormEvent::SubmitAttempt`](super::FormEvent) first
/// so the returned errors are also visible on the state.
pub async fn submit(state: &FormState, port: &dyn SubmitPort) -> Result<SubmitReceipt, SubmitError> {
    if !state.is_valid() {
        return Err(SubmitError::Invalid(state.errors().clone()));
    }
    port.submit(&state.payload()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormEvent;
    use crate::schema::Schema;
    use crate::synth::{synthesize, FormArtifact};
    use crate::value::FieldValue;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPort {
        received: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl SubmitPort for RecordingPort {
        async fn submit(&self, payload: &Value) -> Result<SubmitReceipt, SubmitError> {
            self.received.lock().unwrap().push(payload.clone());
            Ok(SubmitReceipt { message: "stored".into() })
        }
    }

    struct FailingPort;

    #[async_trait]
    impl SubmitPort for FailingPort {
        async fn submit(&self, _payload: &Value) -> Result<SubmitReceipt, SubmitError> {
            Err(SubmitError::Handler("upstream unavailable".into()))
        }
    }

    fn artifact() -> FormArtifact {
        let schema: Schema = serde_json::from_value(json!({
            "title": "Contact",
            "sections": [{
                "name": "Main",
                "fields": [{ "name": "email", "type": "email", "label": "Email", "required": true }]
            }]
        }))
        .unwrap();
        synthesize(&schema)
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let artifact = artifact();
        let port = RecordingPort::default();
        let state = FormState::new(&artifact).apply(&artifact, FormEvent::SubmitAttempt);

        let result = submit(&state, &port).await;
        match result {
            Err(SubmitError::Invalid(errors)) => assert_eq!(errors["email"], "Email is required"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(port.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_form_reaches_port() {
        let artifact = artifact();
        let port = RecordingPort::default();
        let state = FormState::new(&artifact).apply(
            &artifact,
            FormEvent::Change {
                field: "email".into(),
                value: FieldValue::text("hr@example.com"),
            },
        );

        let receipt = submit(&state, &port).await.unwrap();
        assert_eq!(receipt.message, "stored");
        assert_eq!(port.received.lock().unwrap()[0], json!({ "email": "hr@example.com" }));
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() {
        let artifact = artifact();
        let state = FormState::new(&artifact).apply(
            &artifact,
            FormEvent::Change {
                field: "email".into(),
                value: FieldValue::text("hr@example.com"),
            },
        );

        let result = submit(&state, &FailingPort).await;
        assert!(matches!(result, Err(SubmitError::Handler(_))));
    }

    #[tokio::test]
    async fn test_logging_handler_accepts() {
        let receipt = LoggingSubmitHandler::new().submit(&json!({ "a": 1 })).await.unwrap();
        assert_eq!(receipt.message, "Form submitted");
    }
}
