//! HTTP inspection surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → strip context path, parse verb
//!     → Application::dispatch (current ArcSwap snapshot)
//!     → 200 JSON DispatchPlan, or 404 JSON
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
