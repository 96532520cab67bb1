// datasmith-core/src/infrastructure/adapters/mod.rs

pub mod cortex;

pub use cortex::{CortexCompletion, DisabledCompletion};
