use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use harvest_logging::{harvest_error, harvest_info};
use harvester_core::{update_harvest, HarvestEffect, HarvestMsg, HarvestPhase, HarvestState};
use thiserror::Error;

use crate::fetch::{FetchSettings, PageFetcher, ReqwestPageFetcher};
use crate::persist::{PersistError, RecordSink};
use crate::{FetchError, Record};

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("invalid fetch settings: {0}")]
    Setup(FetchError),
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("page at offset {offset} failed, {discarded} fetched records dropped: {source}")]
    Fetch {
        offset: usize,
        discarded: usize,
        source: FetchError,
    },
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

impl HarvestError {
    /// Offset of the page request that aborted the run.
    pub fn offset(&self) -> Option<usize> {
        match self {
            HarvestError::Fetch { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub pages: usize,
    pub record_count: usize,
    pub output: Option<PathBuf>,
}

/// Drives the harvest state machine against a page fetcher, one request at a time.
pub struct Harvester<F> {
    fetcher: F,
}

impl<F: PageFetcher> Harvester<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn page_length(&self) -> NonZeroUsize {
        self.fetcher.page_length()
    }

    /// Fetches pages until an empty or short page, then hands every record to `sink`.
    ///
    /// A failed request aborts the run and nothing reaches the sink.
    pub async fn run(&self, sink: &dyn RecordSink) -> Result<HarvestSummary, HarvestError> {
        let (mut state, mut effects) =
            update_harvest(HarvestState::<Record>::new(self.page_length()), HarvestMsg::Start);
        let mut output = None;

        while !effects.is_empty() {
            let mut follow_up = Vec::new();
            for effect in effects {
                match effect {
                    HarvestEffect::FetchPage {
                        offset,
                        page_length,
                    } => {
                        harvest_info!(
                            "Fetching records {}–{}...",
                            offset,
                            offset.saturating_add(page_length.get())
                        );
                        let records = match self.fetcher.fetch_page(offset, page_length).await {
                            Ok(records) => records,
                            Err(source) => {
                                let reason = source.to_string();
                                let (failed, _) =
                                    update_harvest(state, HarvestMsg::PageFailed { offset, reason });
                                return Err(aborted(&failed, offset, source));
                            }
                        };
                        let (next, more) =
                            update_harvest(state, HarvestMsg::PageLoaded { offset, records });
                        state = next;
                        follow_up.extend(more);
                    }
                    HarvestEffect::Persist { records } => {
                        harvest_info!("Fetched total {} records", records.len());
                        output = sink.persist(records)?;
                    }
                }
            }
            effects = follow_up;
        }

        Ok(HarvestSummary {
            pages: state.pages_appended(),
            record_count: state.record_count(),
            output,
        })
    }
}

fn aborted(state: &HarvestState<Record>, requested: usize, source: FetchError) -> HarvestError {
    let offset = match state.phase() {
        HarvestPhase::Failed { offset } => offset,
        _ => requested,
    };
    harvest_error!(
        "Harvest aborted at offset {}, dropping {} records: {}",
        offset,
        state.record_count(),
        state.failure_reason().unwrap_or("unknown failure")
    );
    HarvestError::Fetch {
        offset,
        discarded: state.record_count(),
        source,
    }
}

/// Runs a full harvest with the reqwest fetcher on a single-threaded runtime.
pub fn run_harvest_blocking(
    settings: FetchSettings,
    sink: &dyn RecordSink,
) -> Result<HarvestSummary, HarvestError> {
    let fetcher = ReqwestPageFetcher::new(settings).map_err(HarvestError::Setup)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let harvester = Harvester::new(fetcher);
    runtime.block_on(harvester.run(sink))
}
