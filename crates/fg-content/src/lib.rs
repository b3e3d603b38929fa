//! Content bundle loading and validation for the Fool's Gambit rules
//! engine, plus a hand-authored default bundle used by tests and the
//! replay tool.

pub mod default_bundle;
pub mod loader;

pub use default_bundle::default_bundle;
pub use loader::load_content;
