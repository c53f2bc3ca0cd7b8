//! Marker-delimited substring extraction.
//!
//! The login page and the app bootstrap page embed the values we need inside
//! inline scripts. There is no structured API for them, so we cut them out
//! between a literal start marker and the next end marker.

use thiserror::Error;

/// An expected marker or field was absent from a provider response.
///
/// This almost always means the provider changed its markup or JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider response is missing expected {0}")]
pub struct ProtocolShapeError(pub String);

impl ProtocolShapeError {
    /// Missing literal marker in an HTML/JS payload.
    #[must_use]
    pub fn marker(marker: &str) -> Self {
        Self(format!("marker `{marker}`"))
    }

    /// Missing field in a JSON document.
    #[must_use]
    pub fn field(field: &str) -> Self {
        Self(format!("field `{field}`"))
    }
}

/// Return the text between the first `start` marker and the following `end`.
///
/// The search for `end` begins right after `start`, so an empty value between
/// adjacent markers is returned as `""`.
pub fn extract_between<'a>(
    haystack: &'a str,
    start: &str,
    end: &str,
) -> Result<&'a str, ProtocolShapeError> {
    let from = haystack
        .find(start)
        .map(|i| i + start.len())
        .ok_or_else(|| ProtocolShapeError::marker(start))?;
    let len = haystack[from..]
        .find(end)
        .ok_or_else(|| ProtocolShapeError::marker(end))?;
    Ok(&haystack[from..from + len])
}
