//! Channel carrying effect completions from runtime workers back to the
//! thread that owns the store.

use crate::kernel::Action;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum KernelMessage {
    /// Answer to one effect, tagged with the effect kind for logging.
    Completion {
        effect: &'static str,
        action: Action,
        sent_at: Instant,
    },
}

impl KernelMessage {
    pub fn into_action(self) -> Action {
        match self {
            KernelMessage::Completion { action, .. } => action,
        }
    }
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    /// Fails only when the receiving side is gone.
    pub fn send_completion(&self, effect: &'static str, action: Action) -> Result<(), Action> {
        self.tx
            .send(KernelMessage::Completion {
                effect,
                action,
                sent_at: Instant::now(),
            })
            .map_err(|mpsc::SendError(msg)| msg.into_action())
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
