//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → sections cloned into server state at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Upstream endpoints flow from here into constructors; nothing reads
//!   ambient process state, so tests can inject their own endpoints

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ObservabilityConfig;
pub use schema::QuoteConfig;
pub use schema::RateLimitConfig;
pub use schema::RelayConfig;
pub use schema::UpstreamConfig;
