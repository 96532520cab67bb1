// datasmith-core/src/infrastructure/config/mod.rs

pub mod contract;

pub use contract::{discover_contracts, load_contract};
