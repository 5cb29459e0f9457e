pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod projection;
pub mod store;
pub mod suggestions;
pub mod task_id;
pub mod workspace;
