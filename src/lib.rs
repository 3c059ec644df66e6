//! `akamai-get` - query Akamai diagnostic and property APIs
//!
//! Looks up a URL, an error reference code or a property hostname against
//! the matching Akamai API and reduces the heterogeneous JSON answers to a
//! stable, flat record for display.

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod normalize;
pub mod observability;
pub mod render;
