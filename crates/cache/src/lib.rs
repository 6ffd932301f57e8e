//! SQLite-backed compound store.
//!
//! This crate provides the local persistent store that the gibbs resolver
//! works against. The store is a plain SQLite file materialized from a
//! versioned data package; once present it is assumed valid and is never
//! refreshed implicitly.
//!
//! # Architecture
//! - [`Database`]: connection pool, pragmas, and embedded migrations.
//! - [`Repository`]: read-side queries against committed data.
//! - [`Session`]: transactional write side. Staging a compound inserts it
//!   inside an open transaction — visible to later queries *through the
//!   session*, but not durable until [`Session::commit`].

mod db;
pub mod error;
mod models;
mod repo;
mod session;

pub use crate::db::Database;
pub use crate::repo::Repository;
pub use crate::session::Session;
