//! Harvester core: pure state machines for the pagination harvest loop and
//! the interactive link-extractor session.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{ExtractorEffect, HarvestEffect};
pub use msg::{ExtractorMsg, HarvestMsg};
pub use state::{ExtractorState, HarvestPhase, HarvestState};
pub use update::{update_extractor, update_harvest, CSV_ERROR_MESSAGE, EMPTY_INPUT_MESSAGE};
pub use view_model::ExtractorViewModel;
