//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → Application::from_config (registry + route table)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and rebuilds the Application
//!     → sent to the server, which swaps its ArcSwap
//!     → failures are logged; the old Application keeps serving
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full rebuild
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_application, load_config, ConfigError};
pub use schema::{AdminConfig, AppConfig, ObservabilityConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
