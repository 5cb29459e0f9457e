pub mod lock;
pub mod migration;
pub mod persistence;
pub mod slot;
pub mod tasks;
