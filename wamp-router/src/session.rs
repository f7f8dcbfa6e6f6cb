/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Peer session capability and the weak handle the router keeps for it.

use crate::message::PeerMessage;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Weak};

pub type SessionId = u64;

/// Failure to hand a message to a peer or a bridged realm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeliveryError {
    PeerGone,
    Rejected(String),
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::PeerGone => write!(f, "peer is no longer connected"),
            DeliveryError::Rejected(reason) => write!(f, "peer rejected delivery: {reason}"),
        }
    }
}

impl Error for DeliveryError {}

///
/// A [`Session`] is one connected peer as seen by the routing core.
///
/// The transport layer owns the session; the router only ever holds a [`SessionHandle`],
/// so a disconnected peer is detected lazily when a delivery is attempted.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use wamp_router::{DeliveryError, PeerMessage, Session, SessionHandle, SessionId};
///
/// struct NullSession;
///
/// #[async_trait]
/// impl Session for NullSession {
///     fn id(&self) -> SessionId {
///         7
///     }
///
///     fn realm(&self) -> &str {
///         "realm1"
///     }
///
///     async fn send(&self, _message: PeerMessage) -> Result<(), DeliveryError> {
///         Ok(())
///     }
/// }
///
/// let session: Arc<dyn Session> = Arc::new(NullSession);
/// let handle = SessionHandle::new(&session);
/// assert!(handle.is_alive());
/// drop(session);
/// assert!(!handle.is_alive());
/// ```
#[async_trait]
pub trait Session: Send + Sync {
    fn id(&self) -> SessionId;

    fn realm(&self) -> &str;

    /// Hands a message to the peer. Must not wait on the remote end.
    async fn send(&self, message: PeerMessage) -> Result<(), DeliveryError>;
}

/// Non-owning reference to a [`Session`], keyed by session id.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    peer: Weak<dyn Session>,
}

impl SessionHandle {
    pub fn new(session: &Arc<dyn Session>) -> Self {
        Self {
            id: session.id(),
            peer: Arc::downgrade(session),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.peer.strong_count() > 0
    }

    /// Delivers one message if the peer is still around.
    pub async fn deliver(&self, message: PeerMessage) -> Result<(), DeliveryError> {
        let Some(peer) = self.peer.upgrade() else {
            return Err(DeliveryError::PeerGone);
        };
        peer.send(message).await
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionHandle {}

impl Debug for SessionHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryError, Session, SessionHandle, SessionId};
    use crate::message::{PeerMessage, WampArgs};
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::Arc;

    struct RejectingSession;

    #[async_trait]
    impl Session for RejectingSession {
        fn id(&self) -> SessionId {
            42
        }

        fn realm(&self) -> &str {
            "realm1"
        }

        async fn send(&self, _message: PeerMessage) -> Result<(), DeliveryError> {
            Err(DeliveryError::Rejected("queue full".to_string()))
        }
    }

    fn event() -> PeerMessage {
        PeerMessage::Event {
            uri: "topic".to_string(),
            details: Map::new(),
            args: WampArgs::default(),
        }
    }

    #[tokio::test]
    async fn deliver_reports_peer_gone_after_session_dropped() {
        let session: Arc<dyn Session> = Arc::new(RejectingSession);
        let handle = SessionHandle::new(&session);
        drop(session);

        assert_eq!(handle.deliver(event()).await, Err(DeliveryError::PeerGone));
    }

    #[tokio::test]
    async fn deliver_passes_through_peer_rejection() {
        let session: Arc<dyn Session> = Arc::new(RejectingSession);
        let handle = SessionHandle::new(&session);

        let err = handle.deliver(event()).await.expect_err("send should fail");
        assert_eq!(err.to_string(), "peer rejected delivery: queue full");
    }

    #[test]
    fn handles_compare_by_session_id() {
        let first: Arc<dyn Session> = Arc::new(RejectingSession);
        let second: Arc<dyn Session> = Arc::new(RejectingSession);

        assert_eq!(SessionHandle::new(&first), SessionHandle::new(&second));
        assert_eq!(SessionHandle::new(&first).id(), 42);
    }
}
