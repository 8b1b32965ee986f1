//! Shared helpers for the Diesel integration suites.
//!
//! Each file under `backend/tests/` compiles as its own crate; suites that
//! need PostgreSQL pull these in with `mod support;`.

pub mod cluster;
pub mod embedded_postgres;

pub use embedded_postgres::{DieselContext, diesel_context};
