//! Cooperative cancellation signals.
//!
//! A long solve polls its signal once per iteration, never blocking. Anything
//! that can answer "has this been triggered?" without waiting can serve as a
//! signal: atomic flags, [`CancelToken`], or the receiving half of a channel.
//! Channel receivers fire either when a message arrives or when every sender
//! is dropped, so closing the channel is enough to stop a solve.

use futures::channel::oneshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

pub trait CancelSignal {
    /// Non-blocking poll. Once this returns `true` the solve stops.
    fn is_cancelled(&mut self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&mut self) -> bool {
        false
    }
}

/// A clonable cancellation flag shared between the solving thread and
/// whoever wants to stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl CancelSignal for CancelToken {
    fn is_cancelled(&mut self) -> bool {
        self.is_triggered()
    }
}

impl CancelSignal for &AtomicBool {
    fn is_cancelled(&mut self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl CancelSignal for Arc<AtomicBool> {
    fn is_cancelled(&mut self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<S: CancelSignal + ?Sized> CancelSignal for &mut S {
    fn is_cancelled(&mut self) -> bool {
        (**self).is_cancelled()
    }
}

/// `None` never fires.
impl<S: CancelSignal> CancelSignal for Option<S> {
    fn is_cancelled(&mut self) -> bool {
        self.as_mut().is_some_and(|signal| signal.is_cancelled())
    }
}

impl CancelSignal for oneshot::Receiver<()> {
    fn is_cancelled(&mut self) -> bool {
        match self.try_recv() {
            Ok(Some(())) => true,
            Ok(None) => false,
            // Sender dropped.
            Err(oneshot::Canceled) => true,
        }
    }
}

impl CancelSignal for mpsc::Receiver<()> {
    fn is_cancelled(&mut self) -> bool {
        match self.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => true,
            Err(mpsc::TryRecvError::Empty) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_never_cancel() {
        let mut signal = NeverCancel;
        assert!(!signal.is_cancelled());
        let mut absent: Option<NeverCancel> = None;
        assert!(!absent.is_cancelled());
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancelToken::new();
        let mut observer = token.clone();
        assert!(!observer.is_cancelled());

        let handle = thread::spawn(move || token.cancel());
        handle.join().unwrap();

        assert!(observer.is_cancelled());
        assert!(observer.is_triggered());
    }

    #[test]
    fn test_atomic_flags() {
        let flag = AtomicBool::new(false);
        let mut signal = &flag;
        assert!(!signal.is_cancelled());
        flag.store(true, Ordering::Release);
        assert!(signal.is_cancelled());

        let mut shared = Arc::new(AtomicBool::new(true));
        assert!(shared.is_cancelled());
    }

    #[test]
    fn test_oneshot_fires_on_send_or_drop() {
        let (tx, mut rx) = oneshot::channel::<()>();
        assert!(!rx.is_cancelled());
        tx.send(()).unwrap();
        assert!(rx.is_cancelled());

        let (tx, mut rx) = oneshot::channel::<()>();
        drop(tx);
        assert!(rx.is_cancelled());
    }

    #[test]
    fn test_mpsc_fires_on_send_or_disconnect() {
        let (tx, mut rx) = mpsc::channel::<()>();
        assert!(!rx.is_cancelled());
        tx.send(()).unwrap();
        assert!(rx.is_cancelled());

        drop(tx);
        assert!(rx.is_cancelled());
    }

    #[test]
    fn test_signal_through_mut_ref_and_option() {
        let token = CancelToken::new();
        let mut some = Some(token.clone());
        let mut by_ref = &mut some;
        assert!(!by_ref.is_cancelled());
        token.cancel();
        assert!(by_ref.is_cancelled());
    }
}
