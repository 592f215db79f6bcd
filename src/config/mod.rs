//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::{Cli, KeySet};
pub use settings::{KeyTableSource, Settings};
