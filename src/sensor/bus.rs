use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use super::TiltReading;
use crate::constants::SENSOR_QUEUE_CAPACITY;

type ListenerId = u64;

#[derive(Default)]
struct BusInner {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Sender<TiltReading>)>,
}

/// Host-owned orientation event stream
///
/// The platform side calls `publish` for every sensor event (from any
/// thread); each live subscription receives its own copy on a bounded
/// queue. Clones share the same listener set.
#[derive(Clone, Default)]
pub struct SensorBus {
    inner: Arc<Mutex<BusInner>>,
}

impl SensorBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attach a new listener
    pub fn subscribe(&self) -> SensorSubscription {
        let (tx, rx) = bounded(SENSOR_QUEUE_CAPACITY);
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, tx));
        log::trace!("Sensor listener {} attached", id);

        SensorSubscription {
            id,
            rx,
            bus: self.clone(),
        }
    }

    /// Deliver a reading to every listener
    ///
    /// Returns the number of listeners that accepted it. A listener whose
    /// queue is full misses this reading; disconnected listeners are pruned.
    pub fn publish(&self, reading: TiltReading) -> usize {
        let mut inner = self.lock();
        let mut delivered = 0;

        inner.listeners.retain(|(id, tx)| match tx.try_send(reading) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                log::warn!("Sensor listener {} queue full, reading dropped", id);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.lock().listeners.retain(|(listener, _)| *listener != id);
        log::trace!("Sensor listener {} detached", id);
    }
}

/// Live attachment to a `SensorBus`; detaches on drop
pub struct SensorSubscription {
    id: ListenerId,
    rx: Receiver<TiltReading>,
    bus: SensorBus,
}

impl SensorSubscription {
    /// Take every reading queued so far, oldest first, without blocking
    pub fn drain(&self) -> Vec<TiltReading> {
        self.rx.try_iter().collect()
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
