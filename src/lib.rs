//! Sourcing Data Import Server library.
//!
//! This library provides the core functionality for the sourcing data
//! import server, including database operations, the import pipeline,
//! and API services.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
