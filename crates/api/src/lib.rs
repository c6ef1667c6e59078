//! Cinelog HTTP API service binary support crate.

pub mod server;
