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

//! A single `(realm, uri)` topic and its fan-out plan.

use crate::message::{Options, PeerMessage, SubscriptionId, WampArgs};
use crate::model::DataModel;
use crate::observability::{events, fields};
use crate::pubsub::bridge::RealmBridge;
use crate::session::SessionHandle;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "topic";

#[derive(Clone)]
pub(crate) struct Subscriber {
    pub(crate) subscription_id: SubscriptionId,
    pub(crate) session: SessionHandle,
}

#[derive(Clone)]
pub(crate) struct BridgeTarget {
    pub(crate) target_realm: String,
    pub(crate) bridge: Arc<dyn RealmBridge>,
}

/// Options carried on every publication a topic emits.
pub(crate) fn publish_options() -> Options {
    let mut options = Map::new();
    options.insert("_p".to_string(), Value::from(1));
    options
}

pub(crate) struct Topic {
    realm: String,
    uri: String,
    options: Options,
    subscribers: Vec<Subscriber>,
    targets: Vec<BridgeTarget>,
    model: Option<Arc<DataModel>>,
}

impl Topic {
    pub(crate) fn new(realm: &str, uri: &str) -> Self {
        Self {
            realm: realm.to_string(),
            uri: uri.to_string(),
            options: publish_options(),
            subscribers: Vec::new(),
            targets: Vec::new(),
            model: None,
        }
    }

    pub(crate) fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn add_subscriber(&mut self, subscription_id: SubscriptionId, session: SessionHandle) {
        self.subscribers.push(Subscriber {
            subscription_id,
            session,
        });
    }

    /// Removes exactly the entry for `subscription_id`. Returns `true` when it existed.
    pub(crate) fn remove_subscriber(&mut self, subscription_id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|subscriber| subscriber.subscription_id != subscription_id);
        self.subscribers.len() != before
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Attaches a bridge. A second bridge to the same realm replaces the first.
    pub(crate) fn add_target(&mut self, target_realm: &str, bridge: Arc<dyn RealmBridge>) {
        if let Some(existing) = self
            .targets
            .iter_mut()
            .find(|target| target.target_realm == target_realm)
        {
            existing.bridge = bridge;
            return;
        }
        self.targets.push(BridgeTarget {
            target_realm: target_realm.to_string(),
            bridge,
        });
    }

    pub(crate) fn remove_target(&mut self, target_realm: &str) -> bool {
        let before = self.targets.len();
        self.targets
            .retain(|target| target.target_realm != target_realm);
        self.targets.len() != before
    }

    pub(crate) fn model(&self) -> Option<&Arc<DataModel>> {
        self.model.as_ref()
    }

    /// Takes ownership of `model`. Returns `false` if the topic already owns one.
    pub(crate) fn attach_model(&mut self, model: Arc<DataModel>) -> bool {
        if self.model.is_some() {
            return false;
        }
        self.model = Some(model);
        true
    }

    /// Copies the current recipients so delivery can run without the registry lock.
    pub(crate) fn delivery_plan(&self) -> DeliveryPlan {
        DeliveryPlan {
            realm: self.realm.clone(),
            uri: self.uri.clone(),
            options: self.options.clone(),
            subscribers: self.subscribers.clone(),
            targets: self.targets.clone(),
        }
    }

    /// Like [`delivery_plan`](Self::delivery_plan) without the bridge targets.
    pub(crate) fn subscriber_plan(&self) -> DeliveryPlan {
        DeliveryPlan {
            targets: Vec::new(),
            ..self.delivery_plan()
        }
    }
}

/// Recipients of one publication, in subscriber insertion order then bridge order.
pub(crate) struct DeliveryPlan {
    realm: String,
    uri: String,
    options: Options,
    subscribers: Vec<Subscriber>,
    targets: Vec<BridgeTarget>,
}

impl DeliveryPlan {
    pub(crate) fn recipient_count(&self) -> usize {
        self.subscribers.len() + self.targets.len()
    }

    /// Sends `args` to every recipient. Returns how many accepted it.
    pub(crate) async fn deliver(self, args: WampArgs) -> usize {
        let mut delivered = 0;

        for subscriber in &self.subscribers {
            let message = PeerMessage::Event {
                uri: self.uri.clone(),
                details: self.options.clone(),
                args: args.clone(),
            };
            match subscriber.session.deliver(message).await {
                Ok(()) => delivered += 1,
                Err(err) => debug!(
                    event = events::PUBLISH_DELIVERY_SKIPPED,
                    component = COMPONENT,
                    topic = %fields::topic_label(&self.realm, &self.uri),
                    subscription_id = subscriber.subscription_id,
                    session_id = subscriber.session.id(),
                    err = %err,
                    "skipping subscriber"
                ),
            }
        }

        for target in &self.targets {
            match target
                .bridge
                .publish(&target.target_realm, &self.uri, self.options.clone(), args.clone())
                .await
            {
                Ok(()) => delivered += 1,
                Err(err) => warn!(
                    event = events::BRIDGE_DELIVERY_FAILED,
                    component = COMPONENT,
                    topic = %fields::topic_label(&self.realm, &self.uri),
                    target_realm = target.target_realm.as_str(),
                    err = %err,
                    "bridge did not accept publication"
                ),
            }
        }

        delivered
    }
}
