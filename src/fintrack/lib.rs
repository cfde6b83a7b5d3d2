//! # Fintrack Architecture
//!
//! Fintrack is a **UI-agnostic personal finance record library**. The CLI is
//! one client of it; the same core could sit behind a web page, a desktop
//! app or a test harness.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Validates input, assigns ids and timestamps              │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (records.rs)        Query Engine (query.rs)   │
//! │  - Owns records and settings      - filter → sort → search  │
//! │  - Writes through on mutation     - Pure, no state          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Storage gateway over a StorageBackend trait              │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! - **Validation failures** are the only errors meant to block a user action.
//!   They arrive as a [`validation::ValidationReport`] listing every failed rule.
//! - **Storage faults** are caught in the storage layer, logged through
//!   `tracing`, and degraded to safe defaults (empty collection, default
//!   settings).
//! - **Bad search patterns** match nothing.
//! - **Unknown ids** on update/delete are no-ops.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Logging goes through `tracing`; the binary decides where it
//! ends up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for presentation code
//! - [`records`]: The record store and its lifecycle
//! - [`query`]: Filtering, sorting, search and highlighting
//! - [`validation`]: Field rules and the structural import check
//! - [`store`]: Storage gateway and backends
//! - [`seed`]: First-run seed document sources
//! - [`summary`]: Dashboard figures
//! - [`model`]: Core data types (`Record`, `Settings`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod records;
pub mod seed;
pub mod store;
pub mod summary;
pub mod validation;

#[cfg(test)]
pub mod test_utils;
