//! Context/reference ids for OpenAPI subscription requests.

use super::identity::random_digits;

/// Length of the random context id.
const CONTEXT_ID_LEN: usize = 10;

/// A subscription context: one random `ContextId` per run and a
/// `ReferenceId` that starts at 1 and increases with every subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionContext {
    context_id: String,
    next_reference: u32,
}

impl SubscriptionContext {
    /// Create a context with a random ten-digit id.
    #[must_use]
    pub fn generate() -> Self {
        Self::with_context_id(random_digits(CONTEXT_ID_LEN))
    }

    /// Create a context with a known id.
    #[must_use]
    pub fn with_context_id(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            next_reference: 1,
        }
    }

    /// The `ContextId`.
    #[must_use]
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Take the next `ReferenceId`.
    pub fn next_reference_id(&mut self) -> String {
        let id = self.next_reference;
        self.next_reference += 1;
        id.to_string()
    }
}
