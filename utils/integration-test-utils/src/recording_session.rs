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

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use wamp_router::{
    DeliveryError, InvocationId, PeerMessage, RegistrationId, RequestId, Session, SessionId,
};

/// Session double that keeps every message the router hands it.
pub struct RecordingSession {
    id: SessionId,
    realm: String,
    fail_sends: AtomicBool,
    message_store: Mutex<Vec<PeerMessage>>,
}

impl RecordingSession {
    pub fn new(id: SessionId, realm: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            realm: realm.to_string(),
            fail_sends: AtomicBool::new(false),
            message_store: Mutex::new(Vec::with_capacity(64)),
        })
    }

    /// Makes later sends fail with [`DeliveryError::Rejected`].
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn messages(&self) -> Vec<PeerMessage> {
        self.message_store.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.message_store.lock().await.clear();
    }

    pub async fn events(&self) -> Vec<PeerMessage> {
        self.messages()
            .await
            .into_iter()
            .filter(|message| matches!(message, PeerMessage::Event { .. }))
            .collect()
    }

    /// `(invocation id, registration id)` of the newest invocation received.
    pub async fn last_invocation(&self) -> Option<(InvocationId, RegistrationId)> {
        self.message_store
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

    /// The answer this caller got for `request_id`, if any.
    pub async fn answer_for(&self, request_id: RequestId) -> Option<PeerMessage> {
        self.message_store
            .lock()
            .await
            .iter()
            .find(|message| match message {
                PeerMessage::CallResult { request_id: id, .. }
                | PeerMessage::CallError { request_id: id, .. } => *id == request_id,
                _ => false,
            })
            .cloned()
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
            debug!(session_id = self.id, kind = message.kind(), "send refused");
            return Err(DeliveryError::Rejected("sends disabled".to_string()));
        }
        debug!(session_id = self.id, kind = message.kind(), "recorded message");
        self.message_store.lock().await.push(message);
        Ok(())
    }
}
