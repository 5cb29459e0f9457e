pub mod add;
pub mod delete;
pub mod list;
pub mod suggest;
pub mod toggle;
