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

//! In-flight calls keyed by invocation id, with a `(caller, request id)` index.

use crate::message::{InvocationId, RegistrationId, RequestId};
use crate::session::{SessionHandle, SessionId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub(crate) struct PendingCall {
    pub(crate) invocation_id: InvocationId,
    pub(crate) registration_id: RegistrationId,
    pub(crate) uri: String,
    pub(crate) caller: SessionHandle,
    pub(crate) request_id: RequestId,
    pub(crate) callee: SessionHandle,
}

/// Calls dropped by a session teardown, split by the side that went away.
#[derive(Debug, Default)]
pub(crate) struct ClosedCalls {
    /// The callee closed; the caller is still waiting for an answer.
    pub(crate) callee_closed: Vec<PendingCall>,
    /// The caller closed; nobody is left to answer.
    pub(crate) caller_closed: Vec<PendingCall>,
}

#[derive(Default)]
pub(crate) struct PendingCallTable {
    by_invocation: HashMap<InvocationId, PendingCall>,
    by_caller: HashMap<(SessionId, RequestId), InvocationId>,
}

impl PendingCallTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains_request(&self, caller: SessionId, request_id: RequestId) -> bool {
        self.by_caller.contains_key(&(caller, request_id))
    }

    pub(crate) fn insert(&mut self, call: PendingCall) {
        self.by_caller
            .insert((call.caller.id(), call.request_id), call.invocation_id);
        self.by_invocation.insert(call.invocation_id, call);
    }

    pub(crate) fn get(&self, invocation_id: InvocationId) -> Option<&PendingCall> {
        self.by_invocation.get(&invocation_id)
    }

    pub(crate) fn remove(&mut self, invocation_id: InvocationId) -> Option<PendingCall> {
        let call = self.by_invocation.remove(&invocation_id)?;
        self.by_caller.remove(&(call.caller.id(), call.request_id));
        Some(call)
    }

    /// Removes every call the session takes part in, ordered by invocation id.
    pub(crate) fn remove_session(&mut self, session_id: SessionId) -> ClosedCalls {
        let mut affected: Vec<InvocationId> = self
            .by_invocation
            .values()
            .filter(|call| call.caller.id() == session_id || call.callee.id() == session_id)
            .map(|call| call.invocation_id)
            .collect();
        affected.sort_unstable();

        let mut closed = ClosedCalls::default();
        for call in affected.into_iter().filter_map(|id| self.remove(id)) {
            if call.caller.id() == session_id {
                closed.caller_closed.push(call);
            } else {
                closed.callee_closed.push(call);
            }
        }
        closed
    }

    pub(crate) fn len(&self) -> usize {
        self.by_invocation.len()
    }
}
