pub mod autosave;
pub mod handlers;
pub mod image;
pub mod merge;
pub mod mutations;
pub mod store;
