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

//! # wamp-router
//!
//! `wamp-router` is the routing core of a WAMP-style message router: realm-scoped
//! publish/subscribe, RPC dealing with the `invoke: replace` policy, and versioned data
//! models replicated to subscribers and bridged realms.
//!
//! Connection I/O and wire encoding live outside this crate. The session layer implements
//! [`Session`] for each connected peer and dispatches inbound requests to a [`Router`].
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use serde_json::{json, Map};
//! use tokio::sync::Mutex;
//! use wamp_router::{DeliveryError, PeerMessage, Router, Session, SessionId, WampArgs};
//!
//! struct Peer {
//!     id: SessionId,
//!     inbox: Mutex<Vec<PeerMessage>>,
//! }
//!
//! #[async_trait]
//! impl Session for Peer {
//!     fn id(&self) -> SessionId {
//!         self.id
//!     }
//!
//!     fn realm(&self) -> &str {
//!         "realm1"
//!     }
//!
//!     async fn send(&self, message: PeerMessage) -> Result<(), DeliveryError> {
//!         self.inbox.lock().await.push(message);
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let router = Router::new("quick-start");
//! let callee = Arc::new(Peer { id: 1, inbox: Mutex::new(Vec::new()) });
//! let caller = Arc::new(Peer { id: 2, inbox: Mutex::new(Vec::new()) });
//! let callee_session: Arc<dyn Session> = callee.clone();
//! let caller_session: Arc<dyn Session> = caller.clone();
//!
//! let registration_id = router
//!     .provide(&callee_session, 1, "com.example.add", &Map::new())
//!     .await
//!     .unwrap();
//! assert!(router
//!     .provide(&caller_session, 1, "com.example.add", &Map::new())
//!     .await
//!     .is_err());
//!
//! router
//!     .call(&caller_session, 7, "com.example.add", &Map::new(), WampArgs::from_list(vec![json!(2), json!(3)]))
//!     .await
//!     .unwrap();
//! let invocation_id = match &callee.inbox.lock().await[0] {
//!     PeerMessage::Invocation { request_id, registration_id: id, .. } => {
//!         assert_eq!(*id, registration_id);
//!         *request_id
//!     }
//!     other => panic!("unexpected {other:?}"),
//! };
//!
//! router
//!     .yield_result(&callee_session, invocation_id, WampArgs::from_list(vec![json!(5)]))
//!     .await
//!     .unwrap();
//! assert!(matches!(
//!     &caller.inbox.lock().await[0],
//!     PeerMessage::CallResult { request_id: 7, args, .. } if args.args_list == vec![json!(5)]
//! ));
//!
//! router.session_closed(1).await;
//! assert!(router.active_registration("realm1", "com.example.add").await.is_none());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API façade: [`Router`]
//! - Publish/subscribe: topic registry, subscription index, delivery plans, realm bridges
//! - Dealer: registration registry, pending calls, invocation routing
//! - Model: versioned documents, structural patches, list and text models, replicas
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization.

mod dealer;
pub use dealer::InvocationPolicy;

mod error;
pub use error::{
    Lookup, RouterError, ERROR_CANCELED, ERROR_INVALID_ARGUMENT, ERROR_INVALID_URI,
    ERROR_NO_AVAILABLE_CALLEE, ERROR_NO_SUCH_PROCEDURE, ERROR_NO_SUCH_REGISTRATION,
    ERROR_NO_SUCH_SUBSCRIPTION, ERROR_NOT_AUTHORIZED, ERROR_PROCEDURE_ALREADY_EXISTS,
    ERROR_PROTOCOL_VIOLATION,
};

mod id_allocator;

mod message;
pub use message::{
    InvocationId, Options, PeerMessage, RegistrationId, RequestId, SubscriptionId, WampArgs,
};

pub mod model;

#[doc(hidden)]
pub mod observability;

mod pubsub;
pub use pubsub::RealmBridge;

mod router;
pub use router::Router;

mod session;
pub use session::{DeliveryError, Session, SessionHandle, SessionId};

mod uri;

#[cfg(test)]
mod test_support;
