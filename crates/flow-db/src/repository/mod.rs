//! # Repository Module
//!
//! Database repository implementations for IPTV Flow.
//!
//! ## Available Repositories
//!
//! - [`kv::KeyValueRepository`] - Named JSON slots (backs the sales store)

pub mod kv;
