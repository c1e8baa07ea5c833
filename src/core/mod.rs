// Core algorithm exports
pub mod generators;
pub mod matcher;
pub mod participant;
pub mod pool;
pub mod preference;

pub use generators::{
    set_custom_lists, set_many_stable_matchings_lists, set_randomized_lists, set_worst_case_lists,
    CustomLists, PreferenceStrategy,
};
pub use matcher::{run_matching, GaleShapley, MatchOutcome, RejectionPolicy};
pub use participant::Participant;
pub use pool::Pool;
pub use preference::PreferenceList;
