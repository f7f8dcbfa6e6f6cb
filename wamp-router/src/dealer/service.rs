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

//! RPC dealer: registrations, call routing and result delivery.

use crate::dealer::pending_calls::{PendingCall, PendingCallTable};
use crate::dealer::registration_registry::{InvocationPolicy, ProcedureKey, RegistrationRegistry};
use crate::error::{RouterError, ERROR_CANCELED};
use crate::id_allocator::IdAllocator;
use crate::message::{InvocationId, Options, PeerMessage, RegistrationId, RequestId, WampArgs};
use crate::observability::{events, fields};
use crate::session::{Session, SessionHandle, SessionId};
use crate::uri::is_valid_uri;
use serde_json::Map;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "dealer";

struct DealerState {
    registrations: RegistrationRegistry,
    pending: PendingCallTable,
}

pub(crate) struct Dealer {
    state: Mutex<DealerState>,
    registration_ids: IdAllocator,
    invocation_ids: IdAllocator,
}

impl Dealer {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(DealerState {
                registrations: RegistrationRegistry::new(),
                pending: PendingCallTable::new(),
            }),
            registration_ids: IdAllocator::new(),
            invocation_ids: IdAllocator::new(),
        }
    }

    pub(crate) async fn provide(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        options: &Options,
    ) -> Result<RegistrationId, RouterError> {
        let realm = session.realm();
        let policy = InvocationPolicy::from_options(options);

        let provided = if is_valid_uri(uri) {
            let mut state = self.state.lock().await;
            state.registrations.provide(
                ProcedureKey::new(realm, uri),
                SessionHandle::new(session),
                policy,
                &self.registration_ids,
            )
        } else {
            Err(RouterError::InvalidUri(uri.to_string()))
        };

        match provided {
            Ok(provided) => {
                match provided.superseded {
                    Some(superseded) => info!(
                        event = events::PROVIDE_REPLACED,
                        component = COMPONENT,
                        realm,
                        uri,
                        session_id = session.id(),
                        request_id,
                        registration_id = provided.registration_id,
                        superseded,
                        "procedure replaced; previous registration orphaned"
                    ),
                    None => info!(
                        event = events::PROVIDE_OK,
                        component = COMPONENT,
                        realm,
                        uri,
                        session_id = session.id(),
                        request_id,
                        registration_id = provided.registration_id,
                        policy = ?policy,
                        "procedure registered"
                    ),
                }
                Ok(provided.registration_id)
            }
            Err(err) => {
                warn!(
                    event = events::PROVIDE_REJECTED,
                    component = COMPONENT,
                    realm,
                    uri,
                    session_id = session.id(),
                    request_id,
                    err = %err,
                    "provide rejected"
                );
                Err(err)
            }
        }
    }

    pub(crate) async fn unprovide(
        &self,
        session_id: SessionId,
        request_id: RequestId,
        registration_id: RegistrationId,
    ) -> Result<(), RouterError> {
        let removed = {
            let mut state = self.state.lock().await;
            let was_active = state.registrations.is_active(registration_id);
            state
                .registrations
                .remove(registration_id, session_id)
                .map(|registration| (registration, was_active))
        };

        match removed {
            Ok((registration, was_active)) => {
                info!(
                    event = events::UNPROVIDE_OK,
                    component = COMPONENT,
                    realm = registration.key.realm.as_str(),
                    uri = registration.key.uri.as_str(),
                    session_id,
                    request_id,
                    registration_id,
                    policy = ?registration.policy,
                    was_active,
                    "procedure unregistered"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    event = events::UNPROVIDE_REJECTED,
                    component = COMPONENT,
                    session_id,
                    request_id,
                    registration_id,
                    err = %err,
                    "unprovide rejected"
                );
                Err(err)
            }
        }
    }

    /// Routes a call to the active registration. The outcome reaches the caller later as a
    /// `CallResult` or `CallError` message.
    pub(crate) async fn call(
        &self,
        session: &Arc<dyn Session>,
        request_id: RequestId,
        uri: &str,
        _options: &Options,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        let realm = session.realm();
        let caller = SessionHandle::new(session);

        let routed = {
            let mut state = self.state.lock().await;
            self.route_call(&mut state, caller, request_id, realm, uri)
        };
        let call = match routed {
            Ok(call) => call,
            Err(err) => {
                warn!(
                    event = events::CALL_REJECTED,
                    component = COMPONENT,
                    realm,
                    uri,
                    session_id = session.id(),
                    request_id,
                    err = %err,
                    "call rejected"
                );
                return Err(err);
            }
        };

        let invocation = PeerMessage::Invocation {
            request_id: call.invocation_id,
            registration_id: call.registration_id,
            details: Map::new(),
            args,
        };
        if let Err(err) = call.callee.deliver(invocation).await {
            let still_pending = self
                .state
                .lock()
                .await
                .pending
                .remove(call.invocation_id)
                .is_some();
            warn!(
                event = events::INVOCATION_DELIVERY_FAILED,
                component = COMPONENT,
                realm,
                uri,
                invocation_id = call.invocation_id,
                session_id = call.callee.id(),
                still_pending,
                err = %err,
                "invocation not delivered"
            );
            // A concurrent teardown of the callee already answered the caller.
            if !still_pending {
                return Ok(());
            }
            return Err(RouterError::CalleeUnavailable(uri.to_string()));
        }

        debug!(
            event = events::CALL_ROUTED,
            component = COMPONENT,
            realm,
            uri,
            session_id = session.id(),
            request_id,
            invocation_id = call.invocation_id,
            registration_id = call.registration_id,
            "call routed"
        );
        Ok(())
    }

    fn route_call(
        &self,
        state: &mut DealerState,
        caller: SessionHandle,
        request_id: RequestId,
        realm: &str,
        uri: &str,
    ) -> Result<PendingCall, RouterError> {
        if !is_valid_uri(uri) {
            return Err(RouterError::InvalidUri(uri.to_string()));
        }
        if state.pending.contains_request(caller.id(), request_id) {
            return Err(RouterError::DuplicateRequest(request_id));
        }
        let Some(registration) = state.registrations.active(&ProcedureKey::new(realm, uri)) else {
            return Err(RouterError::NoSuchProcedure(uri.to_string()));
        };

        let call = PendingCall {
            invocation_id: self.invocation_ids.next_id(),
            registration_id: registration.id,
            uri: uri.to_string(),
            caller,
            request_id,
            callee: registration.owner.clone(),
        };
        state.pending.insert(call.clone());
        Ok(call)
    }

    pub(crate) async fn yield_result(
        &self,
        session_id: SessionId,
        invocation_id: InvocationId,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        let call = self.resolve(session_id, invocation_id).await?;
        let message = PeerMessage::CallResult {
            request_id: call.request_id,
            details: Map::new(),
            args,
        };
        self.answer_caller(&call, message).await;
        Ok(())
    }

    pub(crate) async fn error(
        &self,
        session_id: SessionId,
        invocation_id: InvocationId,
        error_uri: &str,
        details: Options,
        args: WampArgs,
    ) -> Result<(), RouterError> {
        let call = self.resolve(session_id, invocation_id).await?;
        let message = PeerMessage::CallError {
            request_id: call.request_id,
            error: error_uri.to_string(),
            details,
            args,
        };
        self.answer_caller(&call, message).await;
        Ok(())
    }

    /// Takes the pending call answered by `session_id`, which must be its callee.
    async fn resolve(
        &self,
        session_id: SessionId,
        invocation_id: InvocationId,
    ) -> Result<PendingCall, RouterError> {
        let resolved = {
            let mut state = self.state.lock().await;
            let answered_by_callee = state
                .pending
                .get(invocation_id)
                .is_some_and(|call| call.callee.id() == session_id);
            if answered_by_callee {
                state.pending.remove(invocation_id)
            } else {
                None
            }
        };

        resolved.ok_or_else(|| {
            warn!(
                event = events::YIELD_REJECTED,
                component = COMPONENT,
                session_id,
                invocation_id,
                "no pending call for this callee"
            );
            RouterError::InvalidInvocation(invocation_id)
        })
    }

    async fn answer_caller(&self, call: &PendingCall, message: PeerMessage) {
        let kind = message.kind();
        match call.caller.deliver(message).await {
            Ok(()) => debug!(
                event = events::YIELD_OK,
                component = COMPONENT,
                uri = call.uri.as_str(),
                invocation_id = call.invocation_id,
                request_id = call.request_id,
                kind,
                "call answered"
            ),
            Err(err) => warn!(
                event = events::RESULT_DELIVERY_FAILED,
                component = COMPONENT,
                uri = call.uri.as_str(),
                invocation_id = call.invocation_id,
                session_id = call.caller.id(),
                kind,
                err = %err,
                "caller did not receive answer"
            ),
        }
    }

    pub(crate) async fn session_closed(&self, session_id: SessionId) {
        let (registrations, closed) = {
            let mut state = self.state.lock().await;
            (
                state.registrations.remove_session(session_id),
                state.pending.remove_session(session_id),
            )
        };

        for call in &closed.callee_closed {
            let canceled = PeerMessage::CallError {
                request_id: call.request_id,
                error: ERROR_CANCELED.to_string(),
                details: Map::new(),
                args: WampArgs::default(),
            };
            let delivered = call.caller.deliver(canceled).await.is_ok();
            info!(
                event = events::PENDING_CALL_CANCELED,
                component = COMPONENT,
                uri = call.uri.as_str(),
                invocation_id = call.invocation_id,
                session_id = call.caller.id(),
                reason = fields::REASON_CALLEE_CLOSED,
                delivered,
                "pending call canceled"
            );
        }
        for call in &closed.caller_closed {
            debug!(
                event = events::PENDING_CALL_CANCELED,
                component = COMPONENT,
                uri = call.uri.as_str(),
                invocation_id = call.invocation_id,
                reason = fields::REASON_CALLER_CLOSED,
                "pending call dropped"
            );
        }

        let cleaned_up = !registrations.is_empty()
            || !closed.callee_closed.is_empty()
            || !closed.caller_closed.is_empty();
        if cleaned_up {
            debug!(
                event = events::DEALER_SESSION_CLEANUP,
                component = COMPONENT,
                session_id,
                registrations = registrations.len(),
                canceled = closed.callee_closed.len(),
                dropped = closed.caller_closed.len(),
                "dropped registrations and calls of closed session"
            );
        }
    }

    pub(crate) async fn registration_count(&self) -> usize {
        self.state.lock().await.registrations.len()
    }

    pub(crate) async fn active_registration(&self, realm: &str, uri: &str) -> Option<RegistrationId> {
        self.state
            .lock()
            .await
            .registrations
            .active(&ProcedureKey::new(realm, uri))
            .map(|registration| registration.id)
    }

    pub(crate) async fn pending_call_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}
