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

//! Publish/subscribe state owner: topics, subscriptions and model fan-out.

use crate::error::{Lookup, RouterError};
use crate::id_allocator::IdAllocator;
use crate::message::{Options, PeerMessage, RequestId, SubscriptionId, WampArgs};
use crate::model::{DataModel, ModelPublisher, Patch, SnapshotSink};
use crate::observability::{events, fields};
use crate::pubsub::bridge::{RealmBridge, RouterBridge};
use crate::pubsub::subscription_index::{SubscriptionIndex, SubscriptionRecord};
use crate::pubsub::topic_registry::TopicRegistry;
use crate::session::{Session, SessionHandle, SessionId};
use crate::uri::is_valid_uri;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "pubsub_manager";

struct PubSubState {
    topics: TopicRegistry,
    subscriptions: SubscriptionIndex,
}

pub(crate) struct PubSubManager {
    state: Mutex<PubSubState>,
    subscription_ids: IdAllocator,
}

/// Republishes every patch applied to a topic-owned model on that topic.
struct TopicPublisher {
    pubsub: Weak<PubSubManager>,
    realm: String,
    uri: String,
}

#[async_trait]
impl ModelPublisher for TopicPublisher {
    async fn publish_update(&self, patch: &Patch, event: &Value) {
        if let Some(pubsub) = self.pubsub.upgrade() {
            pubsub
                .publish_update(&self.realm, &self.uri, patch, event)
                .await;
        }
    }
}

fn snapshot_args(snapshot: &Patch) -> WampArgs {
    WampArgs::from_list(vec![snapshot.to_value(), Value::Array(Vec::new())])
}

/// Adds a subscriber to a model topic at its place in the model's update sequence, then
/// sends it the snapshot taken there.
struct SubscriberJoin {
    pubsub: Weak<PubSubManager>,
    realm: String,
    uri: String,
    subscription_id: SubscriptionId,
    session: SessionHandle,
}

#[async_trait]
impl SnapshotSink for SubscriberJoin {
    async fn deliver_snapshot(&self, snapshot: Patch) {
        let Some(pubsub) = self.pubsub.upgrade() else {
            return;
        };
        let details = {
            let mut state = pubsub.state.lock().await;
            // Unsubscribed or closed before its turn came.
            if state.subscriptions.get(self.subscription_id).is_none() {
                return;
            }
            let topic = state.topics.find_or_create(&self.realm, &self.uri);
            topic.add_subscriber(self.subscription_id, self.session.clone());
            topic.options().clone()
        };

        let message = PeerMessage::Event {
            uri: self.uri.clone(),
            details,
            args: snapshot_args(&snapshot),
        };
        if let Err(err) = self.session.deliver(message).await {
            warn!(
                event = events::SNAPSHOT_DELIVERY_FAILED,
                component = COMPONENT,
                topic = %fields::topic_label(&self.realm, &self.uri),
                subscription_id = self.subscription_id,
                err = %err,
                "initial snapshot not delivered"
            );
        }
    }
}

/// Forwards a model topic's snapshot through a new bridge, then attaches it, at the
/// bridge's place in the model's update sequence.
struct TargetJoin {
    pubsub: Weak<PubSubManager>,
    realm: String,
    uri: String,
    target_realm: String,
    bridge: Arc<dyn RealmBridge>,
}

#[async_trait]
impl SnapshotSink for TargetJoin {
    async fn deliver_snapshot(&self, snapshot: Patch) {
        let Some(pubsub) = self.pubsub.upgrade() else {
            return;
        };
        let options = {
            let mut state = pubsub.state.lock().await;
            state
                .topics
                .find_or_create(&self.realm, &self.uri)
                .options()
                .clone()
        };

        if let Err(err) = self
            .bridge
            .publish(&self.target_realm, &self.uri, options, snapshot_args(&snapshot))
            .await
        {
            warn!(
                event = events::SNAPSHOT_DELIVERY_FAILED,
                component = COMPONENT,
                topic = %fields::topic_label(&self.realm, &self.uri),
                target_realm = self.target_realm.as_str(),
                err = %err,
                "initial snapshot not delivered to bridge"
            );
        }

        let mut state = pubsub.state.lock().await;
        state
            .topics
            .find_or_create(&self.realm, &self.uri)
            .add_target(&self.target_realm, self.bridge.clone());
    }
}

impl PubSubManager {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(PubSubState {
                topics: TopicRegistry::new(),
                subscriptions: SubscriptionIndex::new(),
            }),
            subscription_ids: IdAllocator::new(),
        }
    }

    /// Subscribes `session`. On a model topic the subscriber joins at its place in the
    /// model's update sequence: it receives the snapshot first, then every later update.
    pub(crate) async fn subscribe(
        self: &Arc<Self>,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        _options: &Options,
    ) -> Result<SubscriptionId, RouterError> {
        let realm = session.realm();
        if !is_valid_uri(uri) {
            warn!(
                event = events::SUBSCRIBE_REJECTED,
                component = COMPONENT,
                realm,
                uri,
                session_id = session.id(),
                request_id,
                "invalid topic uri"
            );
            return Err(RouterError::InvalidUri(uri.to_string()));
        }

        let handle = SessionHandle::new(session);
        let (subscription_id, model) = {
            let mut state = self.state.lock().await;
            let subscription_id = self.subscription_ids.next_id();
            state.subscriptions.insert(
                subscription_id,
                SubscriptionRecord {
                    realm: realm.to_string(),
                    uri: uri.to_string(),
                    session_id: handle.id(),
                },
            );
            let topic = state.topics.find_or_create(realm, uri);
            let model = topic.model().cloned();
            if model.is_none() {
                topic.add_subscriber(subscription_id, handle.clone());
            }
            (subscription_id, model)
        };

        info!(
            event = events::SUBSCRIBE_OK,
            component = COMPONENT,
            realm,
            uri,
            session_id = handle.id(),
            request_id,
            subscription_id,
            "subscribed"
        );

        if let Some(model) = model {
            model
                .sync_snapshot(Box::new(SubscriberJoin {
                    pubsub: Arc::downgrade(self),
                    realm: realm.to_string(),
                    uri: uri.to_string(),
                    subscription_id,
                    session: handle,
                }))
                .await;
        }

        Ok(subscription_id)
    }

    pub(crate) async fn unsubscribe(
        &self,
        session_id: SessionId,
        request_id: RequestId,
        subscription_id: SubscriptionId,
    ) -> Result<(), RouterError> {
        let result = {
            let mut state = self.state.lock().await;
            let owner = state
                .subscriptions
                .get(subscription_id)
                .map(|record| record.session_id);
            match owner {
                None => Err(RouterError::NotFound(Lookup::Subscription(subscription_id))),
                Some(owner) if owner != session_id => Err(RouterError::NotOwner),
                Some(_) => {
                    if let Some(record) = state.subscriptions.remove(subscription_id) {
                        if let Some(topic) = state.topics.get_mut(&record.realm, &record.uri) {
                            topic.remove_subscriber(subscription_id);
                        }
                    }
                    Ok(())
                }
            }
        };

        match &result {
            Ok(()) => info!(
                event = events::UNSUBSCRIBE_OK,
                component = COMPONENT,
                session_id,
                request_id,
                subscription_id,
                "unsubscribed"
            ),
            Err(err) => warn!(
                event = events::UNSUBSCRIBE_REJECTED,
                component = COMPONENT,
                session_id,
                request_id,
                subscription_id,
                err = %err,
                "unsubscribe rejected"
            ),
        }
        result
    }

    /// Delivers a publication. Publisher options are not forwarded; each topic applies its own.
    pub(crate) async fn inbound_publish(
        &self,
        realm: &str,
        uri: &str,
        _options: Options,
        args: WampArgs,
    ) {
        if !is_valid_uri(uri) {
            warn!(
                event = events::PUBLISH_DROP_INVALID_URI,
                component = COMPONENT,
                realm,
                uri,
                "dropping publication"
            );
            return;
        }

        let plan = {
            let mut state = self.state.lock().await;
            state.topics.find_or_create(realm, uri).delivery_plan()
        };

        debug!(
            event = events::PUBLISH_RECEIVE,
            component = COMPONENT,
            topic = %fields::topic_label(realm, uri),
            recipients = plan.recipient_count(),
            "fanning out publication"
        );
        plan.deliver(args).await;
    }

    /// Delivers a publication forwarded from another realm to local subscribers only.
    /// The topic's own bridges are not followed, so bridge cycles cannot recurse.
    pub(crate) async fn bridged_publish(&self, realm: &str, uri: &str, args: WampArgs) {
        if !is_valid_uri(uri) {
            warn!(
                event = events::PUBLISH_DROP_INVALID_URI,
                component = COMPONENT,
                realm,
                uri,
                "dropping bridged publication"
            );
            return;
        }

        let plan = {
            let mut state = self.state.lock().await;
            state.topics.find_or_create(realm, uri).subscriber_plan()
        };

        debug!(
            event = events::PUBLISH_RECEIVE,
            component = COMPONENT,
            topic = %fields::topic_label(realm, uri),
            recipients = plan.recipient_count(),
            "fanning out bridged publication"
        );
        plan.deliver(args).await;
    }

    pub(crate) async fn publish_update(&self, realm: &str, uri: &str, patch: &Patch, event: &Value) {
        let plan = {
            let state = self.state.lock().await;
            state.topics.get(realm, uri).map(|topic| topic.delivery_plan())
        };

        let Some(plan) = plan else {
            warn!(
                event = events::MODEL_UPDATE_DROPPED,
                component = COMPONENT,
                topic = %fields::topic_label(realm, uri),
                "no topic for model update"
            );
            return;
        };

        plan.deliver(WampArgs::from_list(vec![patch.to_value(), event.clone()]))
            .await;
    }

    pub(crate) async fn attach_model(
        self: &Arc<Self>,
        realm: &str,
        uri: &str,
        model: Arc<DataModel>,
    ) -> Result<(), RouterError> {
        if !is_valid_uri(uri) {
            return Err(RouterError::InvalidUri(uri.to_string()));
        }

        let attached = {
            let mut state = self.state.lock().await;
            state.topics.find_or_create(realm, uri).attach_model(model.clone())
        };
        if !attached {
            warn!(
                event = events::MODEL_ATTACH_REJECTED,
                component = COMPONENT,
                topic = %fields::topic_label(realm, uri),
                "topic already owns a model"
            );
            return Err(RouterError::ModelAlreadyAttached(uri.to_string()));
        }

        model
            .add_publisher(Arc::new(TopicPublisher {
                pubsub: Arc::downgrade(self),
                realm: realm.to_string(),
                uri: uri.to_string(),
            }))
            .await;

        info!(
            event = events::MODEL_ATTACH_OK,
            component = COMPONENT,
            topic = %fields::topic_label(realm, uri),
            model_type = model.model_type(),
            version = model.version(),
            "model attached"
        );
        Ok(())
    }

    /// Attaches `bridge` to the topic. On a model topic the bridge joins at its place in the
    /// model's update sequence: the snapshot is forwarded first, then every later update.
    pub(crate) async fn add_target(
        self: &Arc<Self>,
        realm: &str,
        uri: &str,
        target_realm: &str,
        bridge: Arc<dyn RealmBridge>,
    ) -> Result<(), RouterError> {
        if !is_valid_uri(uri) {
            return Err(RouterError::InvalidUri(uri.to_string()));
        }

        let model = {
            let mut state = self.state.lock().await;
            let topic = state.topics.find_or_create(realm, uri);
            let model = topic.model().cloned();
            if model.is_none() {
                topic.add_target(target_realm, bridge.clone());
            }
            model
        };

        if let Some(model) = model {
            model
                .sync_snapshot(Box::new(TargetJoin {
                    pubsub: Arc::downgrade(self),
                    realm: realm.to_string(),
                    uri: uri.to_string(),
                    target_realm: target_realm.to_string(),
                    bridge,
                }))
                .await;
        }

        info!(
            event = events::TARGET_ADD,
            component = COMPONENT,
            topic = %fields::topic_label(realm, uri),
            target_realm,
            "bridge attached"
        );
        Ok(())
    }

    pub(crate) async fn remove_target(
        &self,
        realm: &str,
        uri: &str,
        target_realm: &str,
    ) -> Result<(), RouterError> {
        let removed = {
            let mut state = self.state.lock().await;
            state
                .topics
                .get_mut(realm, uri)
                .map(|topic| topic.remove_target(target_realm))
                .unwrap_or(false)
        };

        if !removed {
            warn!(
                event = events::TARGET_REMOVE_REJECTED,
                component = COMPONENT,
                topic = %fields::topic_label(realm, uri),
                target_realm,
                "no such bridge"
            );
            return Err(RouterError::NotFound(Lookup::Bridge {
                uri: uri.to_string(),
                target_realm: target_realm.to_string(),
            }));
        }

        info!(
            event = events::TARGET_REMOVE,
            component = COMPONENT,
            topic = %fields::topic_label(realm, uri),
            target_realm,
            "bridge detached"
        );
        Ok(())
    }

    pub(crate) async fn session_closed(&self, session_id: SessionId) {
        let removed = {
            let mut state = self.state.lock().await;
            let removed = state.subscriptions.remove_session(session_id);
            for (subscription_id, record) in &removed {
                if let Some(topic) = state.topics.get_mut(&record.realm, &record.uri) {
                    topic.remove_subscriber(*subscription_id);
                }
            }
            removed.len()
        };

        if removed > 0 {
            debug!(
                event = events::PUBSUB_SESSION_CLEANUP,
                component = COMPONENT,
                session_id,
                removed,
                "dropped subscriptions of closed session"
            );
        }
    }

    pub(crate) fn bridge(self: &Arc<Self>) -> Arc<dyn RealmBridge> {
        Arc::new(RouterBridge::new(Arc::downgrade(self)))
    }

    pub(crate) async fn subscription_count(&self) -> usize {
        self.state.lock().await.subscriptions.len()
    }

    pub(crate) async fn subscriber_count(&self, realm: &str, uri: &str) -> usize {
        self.state
            .lock()
            .await
            .topics
            .get(realm, uri)
            .map(|topic| topic.subscriber_count())
            .unwrap_or_default()
    }

    pub(crate) async fn topic_count(&self) -> usize {
        self.state.lock().await.topics.topic_count()
    }
}
