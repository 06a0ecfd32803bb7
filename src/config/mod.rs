//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! raindrop.toml
//!     → loader.rs (parse & deserialize)
//!     → HYDRO_* environment overrides
//!     → CLI flag overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → RaindropConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Secrets can stay out of the file entirely (environment only)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AccountConfig, ApiConfig, ConfirmationConfig, ContractConfig, LogFormat, LoggingConfig,
    NodeConfig, RaindropConfig, SignerMode,
};
pub use validation::{validate_config, ValidationError};
