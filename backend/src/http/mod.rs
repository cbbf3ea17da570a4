//! HTTP server module for the analytics backend.
//!
//! This module provides an axum-based HTTP server that exposes the analysis
//! pipeline as a REST API. It reuses the service layer and DTOs from the core
//! library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::task_analysis)                  │
//! │  - Duration derivation, filtering, histograms             │
//! │  - Hypotheses, normalization, regression                  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
