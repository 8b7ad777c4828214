//! # ChoreWheel Core
//!
//! Shared foundation for the ChoreWheel service: entity types, the
//! rotation engine, notification-cycle state derivation, the error
//! taxonomy, environment configuration, and the `Notify` trait the
//! scheduler drives.
//!
//! ## Architecture
//! ```text
//! Gateway (axum)          Scheduler (tokio interval)
//!    │                        │
//!    └──► ChoreStore ◄────────┤  fetch_due / mark_notified
//!            │                │
//!       rotation::compute_handoff
//!                             │
//!                        Notify trait ──► Dispatcher (email → SMS)
//! ```

pub mod config;
pub mod error;
pub mod rotation;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::{ChoreError, Result};
pub use traits::Notify;
pub use types::{Assignment, Chore, ChoreView, CompletionResult, CycleState, Participant};
