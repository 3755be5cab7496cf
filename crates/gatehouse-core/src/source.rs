//! Observable source cells.
//!
//! Each external source (auth, organization, section access, role) is backed
//! by one `SourceCell`. The cell has exactly one writer (the store that owns
//! it) and any number of readers. Values are published whole, as a
//! [`Loadable`], so the loaded transition and its payload arrive together.

use tokio::sync::watch;
use tracing::trace;

use crate::errors::SourceClosed;
use crate::loadable::Loadable;

/// Single-writer, multi-reader cell holding the latest state of a source.
#[derive(Debug)]
pub struct SourceCell<T> {
    name: &'static str,
    tx: watch::Sender<Loadable<T>>,
}

impl<T> SourceCell<T>
where
    T: Clone + PartialEq,
{
    /// Create a cell in the `NotLoaded` state.
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(Loadable::NotLoaded);
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Replace the current value. Readers are notified only if it changed.
    pub fn publish(&self, value: Loadable<T>) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
        if changed {
            trace!(source = self.name, loaded = self.tx.borrow().is_loaded(), "source published");
        }
        changed
    }

    /// Mutate the current value in place. `f` returns whether it changed anything.
    pub fn update(&self, f: impl FnOnce(&mut Loadable<T>) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Return to `NotLoaded` (e.g. after sign-out).
    pub fn reset(&self) -> bool {
        self.publish(Loadable::NotLoaded)
    }

    /// Clone of the current value.
    pub fn snapshot(&self) -> Loadable<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SourceReceiver<T> {
        SourceReceiver {
            name: self.name,
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of a [`SourceCell`].
#[derive(Debug, Clone)]
pub struct SourceReceiver<T> {
    name: &'static str,
    rx: watch::Receiver<Loadable<T>>,
}

impl<T> SourceReceiver<T>
where
    T: Clone,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wait until the writer publishes a new value.
    pub async fn changed(&mut self) -> Result<(), SourceClosed> {
        self.rx.changed().await.map_err(|_| SourceClosed {
            source_name: self.name,
        })
    }

    /// Current value, marking it as seen.
    pub fn current(&mut self) -> Loadable<T> {
        self.rx.borrow_and_update().clone()
    }

    /// Current value without marking it as seen.
    pub fn peek(&self) -> Loadable<T> {
        self.rx.borrow().clone()
    }
}
