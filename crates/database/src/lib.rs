//! # Database Crate
//!
//! This crate is the persistence gateway of the school records service: the
//! only place that knows SQL or holds a connection.
//!
//! ## Architectural Principles
//!
//! - **Two layers:** [`Repository`] is the strict per-record interface and
//!   reports every outcome as a `Result`. [`Gateway`] sits on top of it and
//!   turns every failure into `false`, an empty list or `None` after logging
//!   it, which is the contract remote callers rely on.
//! - **Single statements:** every operation is one parameterized statement.
//!   Nothing spans tables and no transactions are opened.
//! - **Asynchronous & Pooled:** all operations are asynchronous and share one
//!   `SqlitePool`.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: build the connection pool.
//! - `run_migrations`: create the four tables if they are absent.
//! - `DbRepository`: holds the pool and implements `Repository` per record type.
//! - `Gateway`: the lenient façade used by the web server.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod gateway;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use gateway::Gateway;
pub use repository::{DbRepository, Repository};
