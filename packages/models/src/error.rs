/// Errors raised by hosting-service collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Credentials were rejected or the listing endpoint was unreachable.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Details from the service.
        message: String,
    },

    /// Repository does not exist or is not visible to the user.
    #[error("Repository not found: {owner}/{name}")]
    NotFound {
        /// Repository owner.
        owner: String,
        /// Repository slug.
        name: String,
    },

    /// Response body could not be decoded.
    #[error("Malformed response: {message}")]
    Parse {
        /// Decoder error.
        message: String,
    },

    /// Transport failure or unexpected status.
    #[error("Network error: {message}")]
    Network {
        /// Transport error or status description.
        message: String,
    },

    /// Request did not complete in time.
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout.
        seconds: u64,
    },

    /// Work was interrupted before completion.
    #[error("Cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Whether the same request may succeed if simply retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Timeout { .. })
    }

    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }
}
