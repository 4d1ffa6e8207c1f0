//! CLI command implementations for healthmap.
//!
//! Available commands:
//! - **evaluate**: Evaluate a selection against a snapshot and render the result
//! - **sources**: List metric sources and the annotation keys they read
//! - **init**: Initialize a new healthmap configuration file

pub mod evaluate;
pub mod init;
pub mod sources;

pub use evaluate::handle_evaluate;
pub use init::init_config;
pub use sources::list_sources;
