use std::cell::Cell;
use std::fmt;

/// One-shot completion token handed to response handlers
///
/// Calling [`Done::done`] asks the read loop to stop before its next read.
/// Only the first call has an effect.
pub struct Done {
    tx: Cell<Option<oneshot::Sender<()>>>,
}

impl Done {
    /// Create a token together with the receiver the read loop polls
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Cell::new(Some(tx)),
            },
            rx,
        )
    }

    /// A token that nothing listens to, used when the loop never starts
    pub(crate) fn noop() -> Self {
        Self { tx: Cell::new(None) }
    }

    /// Signal that no further reads are wanted
    pub fn done(&self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done").finish_non_exhaustive()
    }
}

/// Whether the paired [`Done`] has been signalled
///
/// A dropped token counts as signalled; nothing can stop the loop otherwise.
pub(crate) fn signalled(rx: &oneshot::Receiver<()>) -> bool {
    match rx.try_recv() {
        Ok(()) => true,
        Err(oneshot::TryRecvError::Empty) => false,
        Err(oneshot::TryRecvError::Disconnected) => true,
    }
}
