//! Common library for the scheduly backend
//!
//! This crate provides the infrastructure shared by the scheduly services:
//! the PostgreSQL connection pool, the Redis cache used for token
//! revocation, and the error types both of them surface.

pub mod cache;
pub mod database;
pub mod error;
