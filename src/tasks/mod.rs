//! Background Tasks Module
//!
//! Contains work the worker spawns without awaiting it.
//!
//! # Tasks
//! - Cache write: stores a network response after it has been returned

mod cache_write;

pub use cache_write::spawn_cache_write;
