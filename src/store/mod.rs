pub mod json_store;
pub mod migrate;
pub mod models;
pub mod terms;

pub use json_store::{JsonStore, LoadOutcome, StoreError};
pub use terms::TermStore;
