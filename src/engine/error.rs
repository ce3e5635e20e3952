use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Caller error: `start >= end`, or a non-positive limit. Never reaches the store.
    InvalidRange(String),
    UnitNotFound(Ulid),
    /// Transient: the conflict store or catalogue could not answer.
    StoreUnavailable(String),
    /// The batch deadline passed before this unit's computation finished.
    Timeout,
    LimitExceeded(&'static str),
    /// The per-unit task aborted (e.g. panicked) before producing a result.
    Aborted(String),
}

impl EngineError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidRange(_) => "invalid_range",
            EngineError::UnitNotFound(_) => "unit_not_found",
            EngineError::StoreUnavailable(_) => "store_unavailable",
            EngineError::Timeout => "timeout",
            EngineError::LimitExceeded(_) => "limit_exceeded",
            EngineError::Aborted(_) => "aborted",
        }
    }

    /// Infrastructure errors that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EngineError::StoreUnavailable(_) | EngineError::Timeout | EngineError::Aborted(_)
        )
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRange(msg) => write!(f, "invalid range: {msg}"),
            EngineError::UnitNotFound(id) => write!(f, "unit not found: {id}"),
            EngineError::StoreUnavailable(e) => write!(f, "store unavailable: {e}"),
            EngineError::Timeout => write!(f, "timed out"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Aborted(e) => write!(f, "computation aborted: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
