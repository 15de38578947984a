pub mod config;
pub mod logging;

pub mod counter;
pub mod fetch;
pub mod job;
pub mod locator;
pub mod scheduler;
