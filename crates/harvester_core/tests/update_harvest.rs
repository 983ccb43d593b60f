use std::num::NonZeroUsize;
use std::sync::Once;

use harvester_core::{update_harvest, HarvestEffect, HarvestMsg, HarvestPhase, HarvestState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(harvest_logging::initialize_for_tests);
}

fn page_length(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

struct Run {
    state: HarvestState<u32>,
    requested_offsets: Vec<usize>,
    persisted: Vec<Vec<u32>>,
}

/// Drives the state machine against an endpoint that serves `total` sequential records.
fn run_against(total: u32, length: usize) -> Run {
    let server = |offset: usize, limit: usize| -> Vec<u32> {
        (0..total)
            .skip(offset)
            .take(limit)
            .collect()
    };
    drive(HarvestState::new(page_length(length)), server)
}

fn drive(state: HarvestState<u32>, mut server: impl FnMut(usize, usize) -> Vec<u32>) -> Run {
    let mut requested_offsets = Vec::new();
    let mut persisted = Vec::new();
    let (mut state, mut pending) = update_harvest(state, HarvestMsg::Start);

    while let Some(effect) = pending.pop() {
        match effect {
            HarvestEffect::FetchPage {
                offset,
                page_length,
            } => {
                requested_offsets.push(offset);
                let records = server(offset, page_length.get());
                let (next, effects) =
                    update_harvest(state, HarvestMsg::PageLoaded { offset, records });
                state = next;
                pending.extend(effects);
            }
            HarvestEffect::Persist { records } => persisted.push(records),
        }
    }

    Run {
        state,
        requested_offsets,
        persisted,
    }
}

#[test]
fn start_requests_first_page_at_offset_zero() {
    init_logging();
    let state: HarvestState<u32> = HarvestState::new(page_length(100));
    let (state, effects) = update_harvest(state, HarvestMsg::Start);

    assert_eq!(state.phase(), HarvestPhase::Fetching { offset: 0 });
    assert_eq!(
        effects,
        vec![HarvestEffect::FetchPage {
            offset: 0,
            page_length: page_length(100),
        }]
    );

    let (state, effects) = update_harvest(state, HarvestMsg::Start);
    assert_eq!(state.phase(), HarvestPhase::Fetching { offset: 0 });
    assert!(effects.is_empty());
}

#[test]
fn short_page_is_appended_and_ends_the_run() {
    init_logging();
    let run = run_against(5, 3);

    assert_eq!(run.requested_offsets, vec![0, 3]);
    assert_eq!(run.persisted, vec![vec![0, 1, 2, 3, 4]]);
    assert_eq!(run.state.phase(), HarvestPhase::Done { offset: 3 });
    assert_eq!(run.state.pages_appended(), 2);
}

#[test]
fn empty_page_ends_the_run_at_its_offset() {
    init_logging();
    let run = run_against(4, 2);

    assert_eq!(run.requested_offsets, vec![0, 2, 4]);
    assert_eq!(run.persisted, vec![vec![0, 1, 2, 3]]);
    assert_eq!(run.state.phase(), HarvestPhase::Done { offset: 4 });
    assert_eq!(run.state.pages_appended(), 2);
}

#[test]
fn empty_first_page_persists_empty_result() {
    init_logging();
    let run = run_against(0, 100);

    assert_eq!(run.requested_offsets, vec![0]);
    assert_eq!(run.persisted, vec![Vec::<u32>::new()]);
    assert_eq!(run.state.phase(), HarvestPhase::Done { offset: 0 });
    assert_eq!(run.state.record_count(), 0);
}

#[test]
fn result_is_offset_ordered_concatenation_for_any_page_length() {
    init_logging();
    for length in 1..=6 {
        for total in 0..=13u32 {
            let run = run_against(total, length);
            let expected_requests = total as usize / length + 1;

            assert_eq!(
                run.requested_offsets,
                (0..expected_requests).map(|i| i * length).collect::<Vec<_>>(),
                "length={length} total={total}"
            );
            assert_eq!(run.persisted.len(), 1, "persist exactly once");
            assert_eq!(run.persisted[0], (0..total).collect::<Vec<_>>());
            assert_eq!(run.state.record_count(), total as usize);
        }
    }
}

#[test]
fn oversized_page_counts_as_full_page() {
    init_logging();
    let mut calls = 0;
    let run = drive(HarvestState::new(page_length(2)), |_, _| {
        calls += 1;
        match calls {
            1 => vec![1, 2, 3],
            _ => Vec::new(),
        }
    });

    assert_eq!(run.requested_offsets, vec![0, 2]);
    assert_eq!(run.persisted, vec![vec![1, 2, 3]]);
}

#[test]
fn failed_page_aborts_without_persisting() {
    init_logging();
    let state: HarvestState<u32> = HarvestState::new(page_length(2));
    let (state, _) = update_harvest(state, HarvestMsg::Start);
    let (state, effects) = update_harvest(
        state,
        HarvestMsg::PageLoaded {
            offset: 0,
            records: vec![1, 2],
        },
    );
    assert_eq!(
        effects,
        vec![HarvestEffect::FetchPage {
            offset: 2,
            page_length: page_length(2),
        }]
    );

    let (state, effects) = update_harvest(
        state,
        HarvestMsg::PageFailed {
            offset: 2,
            reason: "http status 500".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), HarvestPhase::Failed { offset: 2 });
    assert_eq!(state.failure_reason(), Some("http status 500"));
    assert_eq!(state.record_count(), 2);
    assert!(state.is_finished());

    let (state, effects) = update_harvest(
        state,
        HarvestMsg::PageLoaded {
            offset: 2,
            records: vec![3],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), HarvestPhase::Failed { offset: 2 });
}

#[test]
fn responses_for_other_offsets_are_ignored() {
    init_logging();
    let state: HarvestState<u32> = HarvestState::new(page_length(2));
    let (state, _) = update_harvest(state, HarvestMsg::Start);
    let before = state.clone();

    let (state, effects) = update_harvest(
        state,
        HarvestMsg::PageLoaded {
            offset: 4,
            records: vec![9],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn no_messages_are_accepted_after_done() {
    init_logging();
    let run = run_against(1, 5);
    let (state, effects) = update_harvest(
        run.state,
        HarvestMsg::PageLoaded {
            offset: 0,
            records: vec![7],
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.record_count(), 1);
    assert_eq!(state.phase(), HarvestPhase::Done { offset: 0 });
}
