//! In-process stand-in for a network link
//!
//! Two [`Endpoint`]s joined by a pair of `flume` channels. Only serialized
//! public keys and envelopes can be sent, so nothing else a party owns can
//! leak across.

/// What may cross between the two parties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    PublicKey(Vec<u8>),
    Envelope(Vec<u8>),
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::PublicKey(_) => "public key",
            Frame::Envelope(_) => "envelope",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("counterparty hung up")]
    Closed,
    #[error("unexpected frame: wanted {expected}, got {got}")]
    Unexpected {
        expected: &'static str,
        got: &'static str,
    },
}

/// One end of the link
#[derive(Debug)]
pub struct Endpoint {
    tx: flume::Sender<Frame>,
    rx: flume::Receiver<Frame>,
}

/// Create a connected pair of endpoints
pub fn pair() -> (Endpoint, Endpoint) {
    let (a_tx, b_rx) = flume::unbounded();
    let (b_tx, a_rx) = flume::unbounded();
    (
        Endpoint { tx: a_tx, rx: a_rx },
        Endpoint { tx: b_tx, rx: b_rx },
    )
}

impl Endpoint {
    pub async fn send(&self, frame: Frame) -> Result<(), WireError> {
        tracing::trace!(kind = frame.kind(), "sending frame");
        self.tx.send_async(frame).await.map_err(|_| WireError::Closed)
    }

    async fn recv(&self) -> Result<Frame, WireError> {
        self.rx.recv_async().await.map_err(|_| WireError::Closed)
    }

    /// Wait for the counterparty's serialized public key
    pub async fn recv_public_key(&self) -> Result<Vec<u8>, WireError> {
        match self.recv().await? {
            Frame::PublicKey(bytes) => Ok(bytes),
            other => Err(WireError::Unexpected {
                expected: "public key",
                got: other.kind(),
            }),
        }
    }

    /// Wait for an envelope
    pub async fn recv_envelope(&self) -> Result<Vec<u8>, WireError> {
        match self.recv().await? {
            Frame::Envelope(bytes) => Ok(bytes),
            other => Err(WireError::Unexpected {
                expected: "envelope",
                got: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_frames_cross_in_order() {
        let (a, b) = pair();

        a.send(Frame::PublicKey(vec![1, 2, 3])).await.unwrap();
        a.send(Frame::Envelope(vec![4, 5])).await.unwrap();

        assert_eq!(b.recv_public_key().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(b.recv_envelope().await.unwrap(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_unexpected_frame() {
        let (a, b) = pair();
        a.send(Frame::Envelope(vec![0])).await.unwrap();

        assert!(matches!(
            b.recv_public_key().await,
            Err(WireError::Unexpected {
                expected: "public key",
                got: "envelope"
            })
        ));
    }

    #[tokio::test]
    async fn test_hang_up() {
        let (a, b) = pair();
        drop(a);
        assert!(matches!(b.recv_envelope().await, Err(WireError::Closed)));
    }
}
