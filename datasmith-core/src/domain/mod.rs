pub mod contract;
pub mod error;

// Convenient re-exports to simplify imports elsewhere
pub use error::DomainError;
