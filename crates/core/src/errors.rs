use thiserror::Error;

/// Unified error type for the entire savings-ledger-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The `Display` output is the message shown to the user. Read and parse
/// failures on stored records never reach this type's callers: they are
/// swallowed by `storage::record::read_record` and replaced with defaults.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Please sign in to sync your data")]
    NotAuthenticated,

    #[error("Failed to save: {0}")]
    WriteFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Authentication ──────────────────────────────────────────────
    #[error("Sign-in failed: {0}")]
    SignIn(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider available for rate: {0}")]
    NoProvider(String),

    #[error("Rate not available for {kind} in {currency} on {date}")]
    RateNotAvailable {
        kind: String,
        currency: String,
        date: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("History entry not found: {0}")]
    EntryNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, and metals.dev puts the API key
        // in the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
