use std::num::NonZeroUsize;

use crate::view_model::ExtractorViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestPhase {
    Idle,
    /// Waiting for the page at `offset`.
    Fetching { offset: usize },
    /// Terminated on an empty or short page at `offset`.
    Done { offset: usize },
    /// Aborted by a failed request at `offset`.
    Failed { offset: usize },
}

/// Accumulator for one harvest run. Records are opaque to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestState<R> {
    page_length: NonZeroUsize,
    phase: HarvestPhase,
    records: Vec<R>,
    record_count: usize,
    pages_appended: usize,
    failure: Option<String>,
}

impl<R> HarvestState<R> {
    pub fn new(page_length: NonZeroUsize) -> Self {
        Self {
            page_length,
            phase: HarvestPhase::Idle,
            records: Vec::new(),
            record_count: 0,
            pages_appended: 0,
            failure: None,
        }
    }

    pub fn page_length(&self) -> NonZeroUsize {
        self.page_length
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }

    /// Records appended so far, including any already handed to the persist effect.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn pages_appended(&self) -> usize {
        self.pages_appended
    }

    /// Why the run aborted, once the phase is [`HarvestPhase::Failed`].
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.phase,
            HarvestPhase::Done { .. } | HarvestPhase::Failed { .. }
        )
    }

    pub(crate) fn pending_offset(&self) -> Option<usize> {
        match self.phase {
            HarvestPhase::Fetching { offset } => Some(offset),
            _ => None,
        }
    }

    pub(crate) fn set_phase(&mut self, phase: HarvestPhase) {
        self.phase = phase;
    }

    pub(crate) fn append(&mut self, batch: Vec<R>) {
        self.record_count += batch.len();
        self.pages_appended += 1;
        self.records.extend(batch);
    }

    pub(crate) fn take_records(&mut self) -> Vec<R> {
        std::mem::take(&mut self.records)
    }

    pub(crate) fn fail(&mut self, offset: usize, reason: String) {
        self.records.clear();
        self.failure = Some(reason);
        self.phase = HarvestPhase::Failed { offset };
    }
}

/// Interactive extractor session: one HTML input, at most one JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractorState {
    input: String,
    output: Option<String>,
    link_count: usize,
    error: Option<String>,
    notice: Option<String>,
    dirty: bool,
}

impl ExtractorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ExtractorViewModel {
        ExtractorViewModel {
            input: self.input.clone(),
            output: self.output.clone(),
            link_count: self.link_count,
            error: self.error.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
        self.dirty = true;
    }

    pub(crate) fn clear_status(&mut self) {
        self.error = None;
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn set_output(&mut self, json: String, count: usize) {
        self.output = Some(json);
        self.link_count = count;
        self.dirty = true;
    }

    pub(crate) fn clear_output(&mut self) {
        self.output = None;
        self.link_count = 0;
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            dirty: true,
            ..Self::default()
        };
    }
}
