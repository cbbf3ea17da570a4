//! # Task Analytics Backend
//!
//! Time analytics for factory task executions.
//!
//! This crate turns raw task executions recorded at production stations into
//! completion records, filters outliers against expected durations, and
//! summarizes them as histograms, hypothesis comparisons and per-area or
//! per-length normalized views with a least-squares regression. The backend
//! exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Duration Derivation**: Per-task active minutes, or per-panel wall-clock
//!   minutes with overlapping work counted once
//! - **Outlier Filtering**: Inclusive band on the actual/expected ratio
//! - **Histograms**: Fixed-width bins tagged with hypothesis matches
//! - **Hypotheses**: Worker and completion-date predicates
//! - **Normalization & Regression**: Minutes per m² or per m, OLS fit with a 95% confidence band
//! - **HTTP API**: RESTful endpoint for frontend integration
//!
//! ## Architecture
//!
//! - [`models`]: Raw executions, pauses, completion records and the panel catalog
//! - [`algorithms`]: Interval arithmetic, duration derivation, statistics, regression
//! - [`services`]: Band filter, histograms, hypotheses, normalization and the full pipeline
//! - [`api`]: Data Transfer Objects (DTOs) for requests and responses
//! - [`config`]: TOML configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod algorithms;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
