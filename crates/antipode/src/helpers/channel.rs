use crossbeam_channel::{unbounded, Receiver as CbReceiver, Sender as CbSender, TryRecvError};

#[derive(Clone, Debug)]
pub struct Sender<T> {
    inner: CbSender<T>,
}

#[derive(Clone, Debug)]
pub struct Receiver<T> {
    inner: CbReceiver<T>,
}

/// Unbounded; the visualizer must never block its frame loop on a slow UI.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = unbounded();
    (Sender { inner: tx }, Receiver { inner: rx })
}

impl<T> Sender<T> {
    /// Returns false once every receiver is gone.
    pub fn send(&self, item: T) -> bool {
        self.inner.send(item).is_ok()
    }
}

impl<T> Receiver<T> {
    pub fn try_recv(&self) -> Option<T> {
        match self.inner.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Everything queued right now, in send order.
    pub fn drain(&self) -> Vec<T> {
        self.inner.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
