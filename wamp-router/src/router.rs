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

//! Router façade dispatched to by the session layer.

use crate::dealer::Dealer;
use crate::error::RouterError;
use crate::message::{
    InvocationId, Options, RegistrationId, RequestId, SubscriptionId, WampArgs,
};
use crate::model::DataModel;
use crate::observability::events;
use crate::pubsub::{PubSubManager, RealmBridge};
use crate::session::{Session, SessionId};
use std::sync::Arc;
use tracing::{debug, info};

const COMPONENT: &str = "router";

///
/// Routing core shared by every session handler.
///
/// Cloning is cheap and every clone routes through the same registries. Each operation
/// takes its registry lock only to update bookkeeping; messages to other peers are sent
/// after the lock is released.
#[derive(Clone)]
pub struct Router {
    name: Arc<str>,
    pubsub: Arc<PubSubManager>,
    dealer: Arc<Dealer>,
}

impl Router {
    pub fn new(name: &str) -> Self {
        info!(
            event = events::ROUTER_START,
            component = COMPONENT,
            router = name,
            "router started"
        );
        Self {
            name: Arc::from(name),
            pubsub: Arc::new(PubSubManager::new()),
            dealer: Arc::new(Dealer::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fans `args` out to the topic's subscribers, then to its bridged realms.
    pub async fn inbound_publish(&self, realm: &str, uri: &str, options: Options, args: WampArgs) {
        self.pubsub.inbound_publish(realm, uri, options, args).await;
    }

    pub async fn subscribe(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        options: &Options,
    ) -> Result<SubscriptionId, RouterError> {
        self.pubsub.subscribe(session, request_id, uri, options).await
    }

    pub async fn unsubscribe(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        subscription_id: SubscriptionId,
    ) -> Result<(), RouterError> {
        self.pubsub
            .unsubscribe(session.id(), request_id, subscription_id)
            .await
    }

    pub async fn provide(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        options: &Options,
    ) -> Result<RegistrationId, RouterError> {
        self.dealer.provide(session, request_id, uri, options).await
    }

    pub async fn unprovide(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        registration_id: RegistrationId,
    ) -> Result<(), RouterError> {
        self.dealer
            .unprovide(session.id(), request_id, registration_id)
            .await
    }

    /// Routes a call. `Ok` means the invocation reached the callee; the caller receives the
    /// outcome later as a [`PeerMessage`](crate::PeerMessage).
    pub async fn call(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        options: &Options,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        self.dealer
            .call(session, request_id, uri, options, args)
            .await
    }

    pub async fn yield_result(
        &self,
        session: &Arc<dyn Session>,
        invocation_id: InvocationId,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        self.dealer
            .yield_result(session.id(), invocation_id, args)
            .await
    }

    pub async fn error(
        &self,
        session: &Arc<dyn Session>,
        invocation_id: InvocationId,
        error_uri: &str,
        details: Options,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        self.dealer
            .error(session.id(), invocation_id, error_uri, details, args)
            .await
    }

    /// Drops everything the session owns. Safe to call more than once.
    pub async fn session_closed(&self, session_id: SessionId) {
        self.pubsub.session_closed(session_id).await;
        self.dealer.session_closed(session_id).await;
        debug!(
            event = events::SESSION_CLOSED,
            component = COMPONENT,
            router = &*self.name,
            session_id,
            "session state released"
        );
    }

    /// Hands `model` to the topic; every patch applied to it is then published there.
    pub async fn attach_model(
        &self,
        realm: &str,
        uri: &str,
        model: Arc<DataModel>,
    ) -> Result<(), RouterError> {
        self.pubsub.attach_model(realm, uri, model).await
    }

    pub async fn add_target(
        &self,
        realm: &str,
        uri: &str,
        target_realm: &str,
        bridge: Arc<dyn RealmBridge>,
    ) -> Result<(), RouterError> {
        self.pubsub
            .add_target(realm, uri, target_realm, bridge)
            .await
    }

    pub async fn remove_target(
        &self,
        realm: &str,
        uri: &str,
        target_realm: &str,
    ) -> Result<(), RouterError> {
        self.pubsub.remove_target(realm, uri, target_realm).await
    }

    /// Bridge republishing into this router's realms. Does not keep the router alive.
    pub fn bridge(&self) -> Arc<dyn RealmBridge> {
        self.pubsub.bridge()
    }

    pub async fn subscription_count(&self) -> usize {
        self.pubsub.subscription_count().await
    }

    pub async fn subscriber_count(&self, realm: &str, uri: &str) -> usize {
        self.pubsub.subscriber_count(realm, uri).await
    }

    pub async fn topic_count(&self) -> usize {
        self.pubsub.topic_count().await
    }

    pub async fn registration_count(&self) -> usize {
        self.dealer.registration_count().await
    }

    pub async fn active_registration(&self, realm: &str, uri: &str) -> Option<RegistrationId> {
        self.dealer.active_registration(realm, uri).await
    }

    pub async fn pending_call_count(&self) -> usize {
        self.dealer.pending_call_count().await
    }
}
