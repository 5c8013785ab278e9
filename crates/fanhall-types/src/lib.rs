//! Fanhall Types - Shared domain types
//!
//! This crate contains domain types used across Fanhall services:
//! - Entity identifiers
//! - Moderation permission flags
//! - Scope kinds for grants and bans

pub mod id;
pub mod moderation;

pub use id::*;
pub use moderation::*;
