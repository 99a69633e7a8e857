//! Concurrent fan-out/fan-in over a pair of data sources.

use futures::future;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::types::Record;

/// A fetch cycle failed.
///
/// Either source rejecting collapses into this single undifferentiated error:
/// no partial data is exposed, and callers cannot distinguish which source
/// failed. The underlying cause is retained for diagnostics only.
#[derive(Debug, Error)]
#[error("error fetching data")]
pub struct FetchError(#[from] anyhow::Error);

/// Fetch the primary and secondary collections concurrently.
///
/// Both sources are dispatched before either is awaited, so wall time is
/// bounded by the slower source. Aggregation input is ready only once both
/// settle; if either fails the whole cycle fails with a [`FetchError`] and
/// neither result is used. A missing secondary source resolves to an empty
/// collection.
pub async fn fetch_pair<P, S>(
    primary: P,
    secondary: Option<S>,
) -> Result<(Vec<Record>, Vec<Record>), FetchError>
where
    P: Future<Output = anyhow::Result<Vec<Record>>>,
    S: Future<Output = anyhow::Result<Vec<Record>>>,
{
    let secondary = async move {
        match secondary {
            Some(source) => source.await,
            None => Ok(Vec::new()),
        }
    };

    let (primary, secondary) = future::try_join(primary, secondary).await?;
    Ok((primary, secondary))
}

/// Monotonic ticket counter guarding against stale fetch responses.
///
/// Each refresh draws a ticket before dispatching its requests; when the
/// response arrives, it may only be applied if its ticket is still the latest
/// one issued. Responses from superseded cycles are dropped, so selector
/// changes during an in-flight fetch can never be overwritten by the older
/// result.
#[derive(Debug, Default)]
pub struct FetchGeneration(AtomicU64);

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch cycle, invalidating all previously issued tickets.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` still belongs to the latest fetch cycle.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}
