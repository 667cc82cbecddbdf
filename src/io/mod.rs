pub mod cli;
pub mod collection;
pub mod compositor;
pub mod configuration;
pub mod error;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod schema;
