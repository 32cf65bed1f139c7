//! # QVAL Rust Backend
//!
//! Backend for the questionnaire/validation data-entry application.
//!
//! This crate provides a Rust-based backend for collecting validation
//! answers against questionnaires: feature preconditions are created and
//! updated as the user types, answers are saved per grid row, and the
//! read-only validation reference tables drive the grid columns. The
//! backend exposes a REST API via Axum for the web frontend.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and re-exported domain entities
//! - [`models`]: Domain entities (preconditions, questionnaires, answers)
//! - [`db`]: Repository pattern, service layer, and persistence backends
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
