//! Server-side models that are not backend payloads.

pub mod config;
