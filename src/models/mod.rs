//! Data models.

pub mod config;
pub mod node;
pub mod plan;
pub mod rollback;
