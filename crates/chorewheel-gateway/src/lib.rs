//! # ChoreWheel Gateway
//!
//! Thin HTTP adapter over the store and rotation engine: chore list with
//! urgency flags, chore completion, health, and the inline dashboard.

pub mod dashboard;
pub mod routes;
pub mod server;

pub use server::{AppState, build_router, serve};
