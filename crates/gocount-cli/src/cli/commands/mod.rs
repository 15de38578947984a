//! CLI command handlers.

mod count;

pub use count::run_count;
