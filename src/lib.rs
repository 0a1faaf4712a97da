//! pin-studio: desktop utilities for publishing image galleries and pin
//! scheduling CSVs.
//!
//! The library holds everything the two window binaries share: the pin
//! parser, board loader, image discovery, row building, gallery and git glue
//! for the publisher, plus the loopback server and tunnel for the image
//! server.

pub mod boards;
pub mod error;
pub mod gallery;
pub mod git;
pub mod images;
pub mod pins;
pub mod pipeline;
pub mod rows;
pub mod server;

pub use error::{Error, Result};

/// Install the tracing subscriber shared by both binaries. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
