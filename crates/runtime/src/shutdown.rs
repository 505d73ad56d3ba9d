//! Process shutdown signals.

use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::signal::unix::{Signal, SignalKind};
use tracing::info;

/// Resolves once the process receives SIGINT or SIGTERM.
pub struct ShutdownSignal {
    ctrl_c: Pin<Box<dyn Future<Output = io::Result<()>> + Send>>,
    term_signal: Signal,
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal").finish_non_exhaustive()
    }
}

impl ShutdownSignal {
    /// Install the signal handlers. Must be called within a tokio runtime.
    pub fn new() -> io::Result<Self> {
        let ctrl_c = Box::pin(tokio::signal::ctrl_c());
        let term_signal = tokio::signal::unix::signal(SignalKind::terminate())?;
        Ok(Self { ctrl_c, term_signal })
    }
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.ctrl_c.poll_unpin(cx).is_ready() {
            info!("Received SIGINT, shutting down");
            return Poll::Ready(());
        }

        if this.term_signal.poll_recv(cx).is_ready() {
            info!("Received SIGTERM, shutting down");
            return Poll::Ready(());
        }

        Poll::Pending
    }
}
