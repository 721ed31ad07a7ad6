//! # reco-core
//!
//! Core types and text-key utilities for the reco resolution engine.
//!
//! This crate provides the validated domain types shared by the resolution
//! pipeline (`reco-resolve`) and the constants and logging schema that keep
//! both crates consistent.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod textkey;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use textkey::{composite_key, keys_match, normalize_text_key};
