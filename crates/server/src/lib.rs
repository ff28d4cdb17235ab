//! Server infrastructure for Ballots
//!
//! This crate provides the HTTP server with lifecycle management and graceful
//! shutdown.
//!
//! # Architecture
//!
//! Servers implement the [`Server`] trait. The [`ServerExt`] trait adds
//! `spawn()` and `run_until_signalled()`. Shutdown is driven by a
//! `CancellationToken` from `tokio_util`.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = HttpServer::new(ServerConfig::default(), router);
//!     server.run_until_signalled().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod shutdown;
pub mod traits;

pub use config::{ports, ServerConfig};
pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
