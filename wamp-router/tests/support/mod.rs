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

use integration_test_utils::RecordingSession;
use serde_json::{json, Map};
use std::sync::Arc;
use wamp_router::{Options, PeerMessage, RequestId, Router, Session, SessionId, WampArgs};

#[allow(dead_code)]
pub(crate) const REALM: &str = "realm1";

/// A connected peer: the recorder for assertions plus the trait object the router sees.
pub(crate) struct Peer {
    pub(crate) recorder: Arc<RecordingSession>,
    pub(crate) session: Arc<dyn Session>,
}

pub(crate) fn connect(id: SessionId, realm: &str) -> Peer {
    let recorder = RecordingSession::new(id, realm);
    let session: Arc<dyn Session> = recorder.clone();
    Peer { recorder, session }
}

pub(crate) fn make_router(name: &str) -> Router {
    integration_test_utils::init_logging();
    Router::new(name)
}

#[allow(dead_code)]
pub(crate) fn no_options() -> Options {
    Map::new()
}

#[allow(dead_code)]
pub(crate) fn replace_options() -> Options {
    let mut options = Map::new();
    options.insert("invoke".to_string(), json!("replace"));
    options
}

#[allow(dead_code)]
/// Calls `uri` from `caller`; if the call is routed, `callee` yields `answer`.
///
/// Returns what the caller finally received, or `None` when the call was rejected up front.
pub(crate) async fn call_and_serve(
    router: &Router,
    caller: &Peer,
    request_id: RequestId,
    uri: &str,
    callee: &Peer,
    answer: WampArgs,
) -> Option<PeerMessage> {
    router
        .call(&caller.session, request_id, uri, &no_options(), WampArgs::default())
        .await
        .ok()?;
    let (invocation_id, _) = callee
        .recorder
        .last_invocation()
        .await
        .expect("routed call should reach the callee");
    router
        .yield_result(&callee.session, invocation_id, answer)
        .await
        .expect("callee should be able to answer");
    caller.recorder.answer_for(request_id).await
}

#[allow(dead_code)]
pub(crate) fn event_args(message: &PeerMessage) -> &WampArgs {
    match message {
        PeerMessage::Event { args, .. } => args,
        other => panic!("expected event, got {other:?}"),
    }
}
