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
use std::sync::Arc;
use tokio::sync::Mutex;
use wamp_router::{DeliveryError, Options, RealmBridge, WampArgs};

#[derive(Clone, Debug)]
pub struct BridgedPublication {
    pub realm: String,
    pub uri: String,
    pub options: Options,
    pub args: WampArgs,
}

/// Bridge double that records what a topic replicated through it.
#[derive(Default)]
pub struct RecordingBridge {
    publications: Mutex<Vec<BridgedPublication>>,
}

impl RecordingBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn publications(&self) -> Vec<BridgedPublication> {
        self.publications.lock().await.clone()
    }
}

#[async_trait]
impl RealmBridge for RecordingBridge {
    async fn publish(
        &self,
        realm: &str,
        uri: &str,
        options: Options,
        args: WampArgs,
    ) -> Result<(), DeliveryError> {
        self.publications.lock().await.push(BridgedPublication {
            realm: realm.to_string(),
            uri: uri.to_string(),
            options,
            args,
        });
        Ok(())
    }
}
