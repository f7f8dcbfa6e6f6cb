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

//! Cross-realm publication seam used for topic replication.

use crate::message::{Options, WampArgs};
use crate::pubsub::manager::PubSubManager;
use crate::session::DeliveryError;
use async_trait::async_trait;
use std::sync::Weak;

///
/// Destination for publications replicated out of a topic.
///
/// A topic with targets forwards every publication it fans out, after its local
/// subscribers, to each attached bridge under the target realm's name.
#[async_trait]
pub trait RealmBridge: Send + Sync {
    async fn publish(
        &self,
        realm: &str,
        uri: &str,
        options: Options,
        args: WampArgs,
    ) -> Result<(), DeliveryError>;
}

/// Bridge that republishes into the realms of the router it was taken from.
///
/// Forwarded publications reach the target topic's subscribers only; they are not passed on
/// through that topic's own bridges.
pub(crate) struct RouterBridge {
    pubsub: Weak<PubSubManager>,
}

impl RouterBridge {
    pub(crate) fn new(pubsub: Weak<PubSubManager>) -> Self {
        Self { pubsub }
    }
}

#[async_trait]
impl RealmBridge for RouterBridge {
    async fn publish(
        &self,
        realm: &str,
        uri: &str,
        _options: Options,
        args: WampArgs,
    ) -> Result<(), DeliveryError> {
        let Some(pubsub) = self.pubsub.upgrade() else {
            return Err(DeliveryError::PeerGone);
        };
        pubsub.bridged_publish(realm, uri, args).await;
        Ok(())
    }
}
