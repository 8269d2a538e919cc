//! Host visibility signal.
//!
//! The host decides whether the countdown is on screen. It reports changes
//! through [`VisibilityObserver`], either by calling it directly or by
//! feeding events into [`forward_visibility`].

use tokio::sync::mpsc;
use tracing::debug;

/// Whether the consuming surface is currently visible to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// A change in host visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    BecameVisible,
    BecameHidden,
}

impl From<VisibilityEvent> for Visibility {
    fn from(event: VisibilityEvent) -> Self {
        match event {
            VisibilityEvent::BecameVisible => Self::Visible,
            VisibilityEvent::BecameHidden => Self::Hidden,
        }
    }
}

/// Receiver of visibility changes.
pub trait VisibilityObserver {
    fn on_visible(&self);
    fn on_hidden(&self);

    /// Dispatch an event to the matching callback.
    fn on_event(&self, event: VisibilityEvent) {
        match event {
            VisibilityEvent::BecameVisible => self.on_visible(),
            VisibilityEvent::BecameHidden => self.on_hidden(),
        }
    }
}

/// Deliver every event from `events` to `observer` until the sender closes.
pub async fn forward_visibility<O>(mut events: mpsc::UnboundedReceiver<VisibilityEvent>, observer: O)
where
    O: VisibilityObserver,
{
    while let Some(event) = events.recv().await {
        debug!(?event, "Visibility changed");
        observer.on_event(event);
    }
    debug!("Visibility source closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Visibility>>,
    }

    impl VisibilityObserver for &Recorder {
        fn on_visible(&self) {
            self.seen.lock().unwrap().push(Visibility::Visible);
        }

        fn on_hidden(&self) {
            self.seen.lock().unwrap().push(Visibility::Hidden);
        }
    }

    #[test]
    fn test_event_to_visibility() {
        assert_eq!(Visibility::from(VisibilityEvent::BecameHidden), Visibility::Hidden);
        assert!(Visibility::from(VisibilityEvent::BecameVisible).is_visible());
        assert!(Visibility::default().is_visible());
    }

    #[tokio::test]
    async fn test_forward_visibility_delivers_in_order() {
        let recorder = Recorder::default();
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(VisibilityEvent::BecameHidden).unwrap();
        tx.send(VisibilityEvent::BecameVisible).unwrap();
        drop(tx);

        forward_visibility(rx, &recorder).await;

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![Visibility::Hidden, Visibility::Visible]
        );
    }
}
