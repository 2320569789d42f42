//! The cross-context message channel.
//!
//! [`channel`] wires two [`Port`]s together, one per context (editor and
//! preview). Posting is addressed to an explicit target origin, never a
//! wildcard: when the peer's origin does not match, the message is dropped
//! at the sending side, exactly like the platform primitive this models.
//! Delivery is FIFO per sender and handling is synchronous per message, so
//! no two updates are ever processed concurrently.

use crate::{Envelope, Message, Origin};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One endpoint of a two-context message channel.
pub struct Port {
    origin: Origin,
    peer_origin: Origin,
    tx: UnboundedSender<Envelope>,
    rx: UnboundedReceiver<Envelope>,
}

/// Creates a connected pair of ports with the given origins.
pub fn channel(a: Origin, b: Origin) -> (Port, Port) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        Port { origin: a.clone(), peer_origin: b.clone(), tx: a_tx, rx: a_rx },
        Port { origin: b, peer_origin: a, tx: b_tx, rx: b_rx },
    )
}

impl Port {
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Posts a message addressed to `target_origin`.
    ///
    /// Returns `false` (and delivers nothing) when the peer's origin does not
    /// match the target, or when the peer is gone. The channel stamps the
    /// envelope with this port's own origin.
    pub fn post(&self, message: Message, target_origin: &Origin) -> bool {
        if *target_origin != self.peer_origin {
            tracing::trace!(
                target = target_origin.as_str(),
                peer = self.peer_origin.as_str(),
                "dropping message addressed to a different origin"
            );
            return false;
        }
        self.tx.send(Envelope { origin: self.origin.clone(), message }).is_ok()
    }

    /// Receives the next envelope, `None` once the peer is gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Non-blocking receive for cooperative polling loops.
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.rx.try_recv().ok()
    }
}
