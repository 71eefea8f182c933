//! Domain model (card priority, termination kinds, run state, ids).

pub mod card_priority;
pub mod ids;
pub mod state;
pub mod termination;

pub use card_priority::{
    CardAffinity, CardPriority, CardPriorityListItem, CardScore, CardScoreError, CardType,
};
pub use ids::RunId;
pub use state::RunState;
pub use termination::{ScriptAbort, ScriptError, ScriptExit, ScriptOutcome, non_blank};
