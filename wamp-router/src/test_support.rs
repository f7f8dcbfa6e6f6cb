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

//! In-crate test doubles for sessions and bridges.
//!
//! `integration-test-utils` depends on this crate, so unit tests cannot use its doubles
//! without linking a second copy of the router types. This keeps the part unit tests read.

use crate::message::{InvocationId, Options, PeerMessage, RegistrationId, WampArgs};
use crate::pubsub::RealmBridge;
use crate::session::{DeliveryError, Session, SessionId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) struct RecordingSession {
    id: SessionId,
    realm: String,
    fail_sends: AtomicBool,
    messages: Mutex<Vec<PeerMessage>>,
}

impl RecordingSession {
    pub(crate) fn new(id: SessionId, realm: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            realm: realm.to_string(),
            fail_sends: AtomicBool::new(false),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub(crate) async fn messages(&self) -> Vec<PeerMessage> {
        self.messages.lock().await.clone()
    }

    pub(crate) async fn events(&self) -> Vec<PeerMessage> {
        self.messages()
            .await
            .into_iter()
            .filter(|message| matches!(message, PeerMessage::Event { .. }))
            .collect()
    }

    pub(crate) async fn last_invocation(&self) -> Option<(InvocationId, RegistrationId)> {
        self.messages
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|message| match message {
                PeerMessage::Invocation {
                    request_id,
                    registration_id,
                    ..
                } => Some((*request_id, *registration_id)),
                _ => None,
            })
    }
}

#[async_trait]
impl Session for RecordingSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn realm(&self) -> &str {
        &self.realm
    }

    async fn send(&self, message: PeerMessage) -> Result<(), DeliveryError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected("send disabled".to_string()));
        }
        self.messages.lock().await.push(message);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct BridgedPublication {
    pub(crate) realm: String,
    pub(crate) options: Options,
    pub(crate) args: WampArgs,
}

#[derive(Default)]
pub(crate) struct RecordingBridge {
    publications: Mutex<Vec<BridgedPublication>>,
}

impl RecordingBridge {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn publications(&self) -> Vec<BridgedPublication> {
        self.publications.lock().await.clone()
    }
}

#[async_trait]
impl RealmBridge for RecordingBridge {
    async fn publish(
        &self,
        realm: &str,
        _uri: &str,
        options: Options,
        args: WampArgs,
    ) -> Result<(), DeliveryError> {
        self.publications.lock().await.push(BridgedPublication {
            realm: realm.to_string(),
            options,
            args,
        });
        Ok(())
    }
}
