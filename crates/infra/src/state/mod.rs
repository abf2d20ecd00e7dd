//! Local persistence of the reconciled order state

pub mod store;

pub use store::JsonFileStateStore;
