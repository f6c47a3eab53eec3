//! Handing a destination to an external viewer.
//!
//! Opening is fire-and-forget: the session clock never depends on it, and a
//! failure is only logged.

use std::io;

/// External viewer collaborator.
pub trait DestinationOpener: Send + Sync {
    fn open(&self, destination: &str) -> io::Result<()>;
}

/// Opens destinations with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl DestinationOpener for SystemOpener {
    fn open(&self, destination: &str) -> io::Result<()> {
        open::that_detached(destination)
    }
}

/// Does nothing. For headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOpener;

impl DestinationOpener for NoopOpener {
    fn open(&self, _destination: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Invoke the opener, logging and swallowing any failure.
pub(crate) fn open_quietly(opener: &dyn DestinationOpener, destination: &str) {
    if let Err(err) = opener.open(destination) {
        tracing::warn!("could not open {destination} in external viewer: {err}");
    }
}
