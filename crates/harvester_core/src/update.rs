use crate::{
    ExtractorEffect, ExtractorMsg, ExtractorState, HarvestEffect, HarvestMsg, HarvestPhase,
    HarvestState,
};

pub const EMPTY_INPUT_MESSAGE: &str = "Please paste some HTML content";
pub const CSV_ERROR_MESSAGE: &str = "Error creating CSV file";

/// Pure harvest transition: applies a message to state and returns the effects to run.
///
/// A page shorter than the page length used for its request ends the run after it is
/// appended; an empty page ends it without appending. Messages for any offset other
/// than the pending one are ignored.
pub fn update_harvest<R>(
    mut state: HarvestState<R>,
    msg: HarvestMsg<R>,
) -> (HarvestState<R>, Vec<HarvestEffect<R>>) {
    let effects = match msg {
        HarvestMsg::Start => {
            if state.phase() != HarvestPhase::Idle {
                return (state, Vec::new());
            }
            state.set_phase(HarvestPhase::Fetching { offset: 0 });
            vec![HarvestEffect::FetchPage {
                offset: 0,
                page_length: state.page_length(),
            }]
        }
        HarvestMsg::PageLoaded { offset, records } => {
            if state.pending_offset() != Some(offset) {
                return (state, Vec::new());
            }
            let page_length = state.page_length();
            let count = records.len();
            if count == 0 {
                return finish(state, offset);
            }

            state.append(records);
            if count < page_length.get() {
                return finish(state, offset);
            }
            match offset.checked_add(page_length.get()) {
                Some(next) => {
                    state.set_phase(HarvestPhase::Fetching { offset: next });
                    vec![HarvestEffect::FetchPage {
                        offset: next,
                        page_length,
                    }]
                }
                None => return finish(state, offset),
            }
        }
        HarvestMsg::PageFailed { offset, reason } => {
            if state.pending_offset() != Some(offset) {
                return (state, Vec::new());
            }
            state.fail(offset, reason);
            Vec::new()
        }
    };

    (state, effects)
}

fn finish<R>(mut state: HarvestState<R>, offset: usize) -> (HarvestState<R>, Vec<HarvestEffect<R>>) {
    state.set_phase(HarvestPhase::Done { offset });
    let records = state.take_records();
    (state, vec![HarvestEffect::Persist { records }])
}

/// Pure extractor-session transition. Errors never end the session.
pub fn update_extractor(
    mut state: ExtractorState,
    msg: ExtractorMsg,
) -> (ExtractorState, Vec<ExtractorEffect>) {
    let effects = match msg {
        ExtractorMsg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        ExtractorMsg::ExtractRequested => {
            state.clear_status();
            if state.input().trim().is_empty() {
                state.set_error(EMPTY_INPUT_MESSAGE);
                Vec::new()
            } else {
                vec![ExtractorEffect::ExtractLinks {
                    html: state.input().to_string(),
                }]
            }
        }
        ExtractorMsg::LinksExtracted { json, count } => {
            state.set_output(json, count);
            let plural = if count == 1 { "" } else { "s" };
            state.set_notice(format!("Found {count} PDF link{plural}!"));
            Vec::new()
        }
        ExtractorMsg::ExtractionFailed { message } => {
            state.clear_output();
            state.set_error(message);
            Vec::new()
        }
        ExtractorMsg::ExportRequested => {
            state.clear_status();
            match state.output() {
                Some(json) => vec![ExtractorEffect::ExportCsv {
                    json: json.to_string(),
                }],
                None => {
                    state.set_error(CSV_ERROR_MESSAGE);
                    Vec::new()
                }
            }
        }
        ExtractorMsg::CsvExported { path } => {
            state.set_notice(format!("CSV file saved to {path}"));
            Vec::new()
        }
        ExtractorMsg::CsvExportFailed { message } => {
            state.set_error(format!("{CSV_ERROR_MESSAGE}: {message}"));
            Vec::new()
        }
        ExtractorMsg::ClearRequested => {
            state.reset();
            Vec::new()
        }
        ExtractorMsg::NoOp => Vec::new(),
    };

    (state, effects)
}
