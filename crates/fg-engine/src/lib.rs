//! The Fool's Gambit reducer: action application, legal-action
//! enumeration, the Majors effect interpreter, and replay/save
//! plumbing on top of `fg-types`' data model.

pub mod api;
pub mod legal_actions;
mod majors;
pub mod reducer;
pub mod replay;
mod rules;
mod setup;

pub use api::{Engine, SaveBlob, SaveBlobHeader, CURRENT_SAVE_VERSION};
pub use legal_actions::legal_actions;
pub use reducer::apply_action;
pub use replay::{replay_log, ActionLog, ActionLogHeader, Checkpoint};
pub use setup::create_run;
