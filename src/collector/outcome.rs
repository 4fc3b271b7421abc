// Per-source result of one aggregation pass

use tracing::warn;

use crate::error::CollectError;

/// What one upstream contributed to a pass. Only `Fatal` aborts the pass.
#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),
    /// The upstream failed; `T` is the documented placeholder.
    Degraded(T),
    Fatal(CollectError),
}

impl<T> Outcome<T> {
    /// Load-bearing source: failure aborts the pass.
    pub fn required(result: Result<T, CollectError>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Fatal(e),
        }
    }

    /// Enrichment source: failure is replaced by `sentinel()`.
    pub fn optional(result: Result<T, CollectError>, sentinel: impl FnOnce() -> T) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => {
                warn!(
                    upstream = %e.upstream(),
                    error = %e,
                    "upstream unavailable; using placeholder"
                );
                Outcome::Degraded(sentinel())
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    pub fn into_result(self) -> Result<T, CollectError> {
        match self {
            Outcome::Ok(v) | Outcome::Degraded(v) => Ok(v),
            Outcome::Fatal(e) => Err(e),
        }
    }
}
