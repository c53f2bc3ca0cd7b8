//! The provider's multi-step callback form.
//!
//! Each authentication round-trip returns a JSON document with an ordered
//! `callbacks` array; every callback carries an `input` array of named value
//! slots. The client fills slots and posts the whole document back. Unknown
//! fields (`authId`, `header`, prompts, ...) are preserved verbatim because
//! the provider validates the echoed document.
//!
//! A form is a value: [`CallbackForm::with_slot`] consumes the form and
//! returns the filled one, so each stage maps `PriorForm -> NextForm`.

use serde_json::Value;

use super::extract::ProtocolShapeError;

/// Stage name the provider returns when username/password were rejected.
pub const RETRY_CREDENTIALS_STAGE: &str = "retryCredentialsPage";

/// A callback form returned by the authenticate endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackForm(Value);

impl CallbackForm {
    /// Wrap a response document, requiring a `callbacks` array.
    pub fn parse(document: Value) -> Result<Self, ProtocolShapeError> {
        if document.get("callbacks").and_then(Value::as_array).is_none() {
            return Err(ProtocolShapeError::field("callbacks"));
        }
        Ok(Self(document))
    }

    /// Number of callbacks in the form.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks().map_or(0, Vec::len)
    }

    /// Whether the form has no callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the first input slot of callback `index` and return the new form.
    pub fn with_slot(
        mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<Self, ProtocolShapeError> {
        let slot = self
            .0
            .get_mut("callbacks")
            .and_then(|c| c.get_mut(index))
            .and_then(|c| c.get_mut("input"))
            .and_then(|i| i.get_mut(0))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ProtocolShapeError::field(&format!("callbacks[{index}].input[0]")))?;
        slot.insert("value".to_string(), Value::String(value.into()));
        Ok(self)
    }

    /// Current value of the first input slot of callback `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&str> {
        self.callbacks()?
            .get(index)?
            .get("input")?
            .get(0)?
            .get("value")?
            .as_str()
    }

    /// The JSON document to post back.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    fn callbacks(&self) -> Option<&Vec<Value>> {
        self.0.get("callbacks").and_then(Value::as_array)
    }
}

/// The `stage` field of any authenticate response.
#[must_use]
pub fn stage_of(document: &Value) -> Option<&str> {
    document.get("stage").and_then(Value::as_str)
}

/// Whether a response reports rejected credentials.
#[must_use]
pub fn is_credentials_retry(document: &Value) -> bool {
    stage_of(document) == Some(RETRY_CREDENTIALS_STAGE)
}

/// The session `tokenId` emitted once the tree completes.
pub fn token_id_of(document: &Value) -> Result<&str, ProtocolShapeError> {
    document
        .get("tokenId")
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolShapeError::field("tokenId"))
}
