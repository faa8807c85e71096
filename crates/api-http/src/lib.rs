//! HTTP API Layer
//!
//! Implements the HTTP gateway for the AdoptML prediction service.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{HttpServer, HttpServerConfig};
