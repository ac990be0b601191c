use std::time::Duration;

use rotunda_types::SourceKey;
use thiserror::Error;

/// Unified error type for the rotunda workspace.
///
/// The taxonomy separates transient upstream conditions (retryable inside a
/// connector's retry layer) from fatal ones (surfaced immediately), and adds
/// the aggregate the orchestrator returns when every source failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RotundaError {
    /// Network-level failure: timeout, connection reset, DNS. Retryable.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The upstream signalled rate limiting (HTTP 429). Retryable after the
    /// hinted delay, or the policy's backoff when no hint was sent.
    #[error("upstream rate limited")]
    RateLimited {
        /// Upstream-provided wait hint (`Retry-After`), when present.
        retry_after: Option<Duration>,
    },

    /// Upstream server-side failure (5xx). Retryable.
    #[error("upstream server error: status {status}")]
    UpstreamServer {
        /// HTTP status code.
        status: u16,
    },

    /// Upstream rejected the request (4xx other than 429). Fatal: the query
    /// or contract is wrong, retrying cannot help.
    #[error("upstream client error: status {status}")]
    UpstreamClient {
        /// HTTP status code.
        status: u16,
    },

    /// A 200-class response whose payload violated the expected shape. Fatal
    /// for the attempt: the response is wrong, not transient.
    #[error("payload parse failure: {0}")]
    Parse(String),

    /// The local daily call budget is spent. Fatal for the current window;
    /// the caller decides whether to wait for rollover.
    #[error("quota exhausted, resets in {reset_in:?}")]
    QuotaExhausted {
        /// Time until the budget rolls over.
        reset_in: Duration,
    },

    /// The source is sitting out a cooldown after exhausting its quota.
    #[error("source cooling down, available in {reset_in:?}")]
    CoolingDown {
        /// Time until the source accepts calls again.
        reset_in: Duration,
    },

    /// The retry ceiling was reached; carries the last underlying error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Attempts performed, including the first.
        attempts: u32,
        /// The final classified failure.
        last: Box<RotundaError>,
    },

    /// The availability probe reported the source down; no call was made.
    #[error("source reported unavailable")]
    Unavailable,

    /// The requested capability is not implemented by the target source.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label, e.g. `"trades"`.
        capability: &'static str,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A failure tagged with the source it came from.
    #[error("{source} failed: {error}")]
    Source {
        /// Source that failed.
        source: SourceKey,
        /// The underlying failure, classification preserved.
        error: Box<RotundaError>,
    },

    /// An individual source attempt exceeded the configured timeout.
    #[error("source timed out: {capability} via {source}")]
    SourceTimeout {
        /// Source that timed out.
        source: SourceKey,
        /// Capability label for the attempted call.
        capability: &'static str,
    },

    /// Every attempted source failed; one tagged reason per attempt, in
    /// priority order.
    #[error("all sources failed: {0:?}")]
    AllSourcesFailed(Vec<RotundaError>),
}

impl RotundaError {
    /// Helper: build a `Transport` error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Helper: build a `Parse` error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Helper: build an `Unsupported` error for a capability label.
    #[must_use]
    pub const fn unsupported(capability: &'static str) -> Self {
        Self::Unsupported { capability }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Classify an HTTP status into the taxonomy. Success statuses must be
    /// handled before calling this.
    #[must_use]
    pub const fn from_status(status: u16, retry_after: Option<Duration>) -> Self {
        if status == 429 {
            Self::RateLimited { retry_after }
        } else if status >= 500 {
            Self::UpstreamServer { status }
        } else {
            Self::UpstreamClient { status }
        }
    }

    /// Tag an error with the source it came from, unless it already carries
    /// source identity.
    #[must_use]
    pub fn tagged(source: SourceKey, error: Self) -> Self {
        match error {
            e @ (Self::Source { .. } | Self::SourceTimeout { .. } | Self::AllSourcesFailed(_)) => {
                e
            }
            other => Self::Source {
                source,
                error: Box::new(other),
            },
        }
    }

    /// Whether a retry layer may re-attempt after this failure.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited { .. } | Self::UpstreamServer { .. } => true,
            Self::Source { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    /// Upstream-provided wait hint, when this failure carries one.
    #[must_use]
    pub fn retry_after_hint(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            Self::Source { error, .. } => error.retry_after_hint(),
            _ => None,
        }
    }

    /// Flatten nested `AllSourcesFailed` aggregates into a plain vector,
    /// preserving other variants as-is.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSourcesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
