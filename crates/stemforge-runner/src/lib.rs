//! Invocation of the external image-building tool.
//!
//! [`PackerRunner`] stages a configuration document into a temp file,
//! launches the tool, and streams its line-oriented output into a
//! [`LineSink`] as it arrives. Values the tool only reports as output text
//! (such as a captured disk URL) are pulled out of the stream by an
//! [`OutputExtractor`] behind a [`Capture`] sink; the process exit status
//! alone decides whether the run itself succeeded.

pub mod error;
pub mod executor;
pub mod extract;
pub mod runner;

pub use error::{PackerError, Result};
pub use executor::{PackerCli, PackerExecutor};
pub use extract::{Capture, Echo, LineSink, MarkerExtractor, OutputExtractor};
pub use runner::PackerRunner;
