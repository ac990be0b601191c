//! Pagination driver: turns a page-at-a-time upstream into a complete or
//! lazily streamed record sequence, hiding continuation-token and
//! offset/limit mechanics from callers.

use futures::{Stream, TryStreamExt, stream};
use rotunda_types::{PageRequest, PageToken, PagingConfig};

use crate::RotundaError;

/// Drives repeated page fetches against one provider.
///
/// Every call to [`Paginator::drain`] or [`Paginator::stream`] restarts from
/// the first page with fresh upstream requests; there is no implicit resume
/// from a prior exhausted iteration. Each page call is independently subject
/// to whatever limiter/retry layers wrap the owning connector.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    cfg: PagingConfig,
}

impl Paginator {
    /// Build a driver with the given bounds.
    #[must_use]
    pub const fn new(cfg: PagingConfig) -> Self {
        Self { cfg }
    }

    /// Fetch every page eagerly and return the records in upstream order.
    ///
    /// The boolean is the `partial` flag: `true` when the safety cap on total
    /// records cut the sequence short while the upstream still had data.
    ///
    /// # Errors
    /// Returns the first page fetch failure unchanged.
    pub async fn drain<R, F, Fut>(&self, mut fetch: F) -> Result<(Vec<R>, bool), RotundaError>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<(Vec<R>, Option<PageToken>), RotundaError>>,
    {
        let mut out: Vec<R> = Vec::new();
        let mut token: Option<PageToken> = None;
        loop {
            let limit = self
                .cfg
                .page_size
                .min(self.cfg.max_records - out.len())
                .max(1);
            let (mut records, next) = fetch(PageRequest {
                token: token.take(),
                limit,
            })
            .await?;
            let got = records.len();
            out.append(&mut records);

            if out.len() >= self.cfg.max_records {
                let overflow = out.len() > self.cfg.max_records;
                out.truncate(self.cfg.max_records);
                return Ok((out, overflow || next.is_some()));
            }
            // An empty page with a continuation token would loop forever;
            // treat it as end-of-data.
            match next {
                Some(t) if got > 0 => token = Some(t),
                _ => return Ok((out, false)),
            }
        }
    }

    /// Lazily stream records, stopping at end-of-data or the safety cap.
    ///
    /// Pages are fetched on demand as the stream is polled.
    pub fn stream<R, F, Fut>(
        &self,
        fetch: F,
    ) -> impl Stream<Item = Result<R, RotundaError>>
    where
        R: Send,
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<(Vec<R>, Option<PageToken>), RotundaError>>,
    {
        struct State<F> {
            fetch: F,
            token: Option<PageToken>,
            yielded: usize,
            done: bool,
        }

        let cfg = self.cfg;
        stream::try_unfold(
            State {
                fetch,
                token: None,
                yielded: 0,
                done: false,
            },
            move |mut st| async move {
                if st.done || st.yielded >= cfg.max_records {
                    return Ok(None);
                }
                let limit = cfg.page_size.min(cfg.max_records - st.yielded).max(1);
                let (mut records, next) = (st.fetch)(PageRequest {
                    token: st.token.take(),
                    limit,
                })
                .await?;
                if records.is_empty() {
                    return Ok(None);
                }
                let room = cfg.max_records - st.yielded;
                if records.len() > room {
                    records.truncate(room);
                }
                st.yielded += records.len();
                st.done = next.is_none();
                st.token = next;
                Ok(Some((records, st)))
            },
        )
        .map_ok(|batch| stream::iter(batch.into_iter().map(Ok::<R, RotundaError>)))
        .try_flatten()
    }
}
