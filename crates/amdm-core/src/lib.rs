pub mod config;
pub mod logging;

pub mod bridge;
pub mod classify;
pub mod queue;
pub mod settings;
pub mod setup;
