//! Session-gated admin API.

pub mod error;
pub mod images;
pub mod middleware;
pub mod models;
pub mod posts;
pub mod session;
