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
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::debug;
use wamp_router::{DeliveryError, PeerMessage, Session, SessionId};

/// Session double whose send number `stall_at` (counting from zero) blocks until released.
pub struct StallingSession {
    id: SessionId,
    realm: String,
    stall_at: usize,
    sends: AtomicUsize,
    stalled: Notify,
    release: Notify,
    message_store: Mutex<Vec<PeerMessage>>,
}

impl StallingSession {
    pub fn new(id: SessionId, realm: &str, stall_at: usize) -> Arc<Self> {
        Arc::new(Self {
            id,
            realm: realm.to_string(),
            stall_at,
            sends: AtomicUsize::new(0),
            stalled: Notify::new(),
            release: Notify::new(),
            message_store: Mutex::new(Vec::new()),
        })
    }

    /// Resolves once the stalling send has started.
    pub async fn wait_until_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub async fn events(&self) -> Vec<PeerMessage> {
        self.message_store
            .lock()
            .await
            .iter()
            .filter(|message| matches!(message, PeerMessage::Event { .. }))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Session for StallingSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn realm(&self) -> &str {
        &self.realm
    }

    async fn send(&self, message: PeerMessage) -> Result<(), DeliveryError> {
        if self.sends.fetch_add(1, Ordering::SeqCst) == self.stall_at {
            debug!(session_id = self.id, "stalling send");
            self.stalled.notify_one();
            self.release.notified().await;
        }
        self.message_store.lock().await.push(message);
        Ok(())
    }
}
