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

mod support;

use support::{connect, make_router, no_options, replace_options, REALM};
use wamp_router::{PeerMessage, RouterError, WampArgs, ERROR_CANCELED};

#[tokio::test(flavor = "multi_thread")]
async fn session_closed_releases_everything_and_is_idempotent() {
    let router = make_router("test-teardown");
    let leaving = connect(1, REALM);
    let staying = connect(2, REALM);

    router
        .subscribe(&leaving.session, 1, "topicX", &no_options())
        .await
        .unwrap();
    router
        .subscribe(&staying.session, 1, "topicX", &no_options())
        .await
        .unwrap();
    router
        .provide(&leaving.session, 2, "rpc1", &no_options())
        .await
        .unwrap();
    router
        .provide(&leaving.session, 3, "rpc1", &replace_options())
        .await
        .unwrap();
    router
        .provide(&staying.session, 2, "rpc2", &no_options())
        .await
        .unwrap();

    router.session_closed(1).await;
    let after_first = (
        router.subscription_count().await,
        router.registration_count().await,
        router.pending_call_count().await,
    );
    router.session_closed(1).await;
    router.session_closed(42).await;

    assert_eq!(after_first, (1, 1, 0));
    assert_eq!(
        (
            router.subscription_count().await,
            router.registration_count().await,
            router.pending_call_count().await,
        ),
        after_first
    );
    assert_eq!(router.active_registration(REALM, "rpc1").await, None);
    assert!(router.active_registration(REALM, "rpc2").await.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn caller_is_told_when_callee_goes_away() {
    let router = make_router("test-callee-closed");
    let callee = connect(1, REALM);
    let caller = connect(2, REALM);
    router
        .provide(&callee.session, 1, "rpc1", &no_options())
        .await
        .unwrap();
    router
        .call(&caller.session, 5, "rpc1", &no_options(), WampArgs::default())
        .await
        .unwrap();
    let (invocation_id, _) = callee.recorder.last_invocation().await.unwrap();

    router.session_closed(1).await;

    match caller.recorder.answer_for(5).await {
        Some(PeerMessage::CallError { error, .. }) => assert_eq!(error, ERROR_CANCELED),
        other => panic!("expected canceled error, got {other:?}"),
    }
    assert_eq!(
        router
            .yield_result(&callee.session, invocation_id, WampArgs::default())
            .await,
        Err(RouterError::InvalidInvocation(invocation_id))
    );
    assert_eq!(
        router
            .call(&caller.session, 6, "rpc1", &no_options(), WampArgs::default())
            .await,
        Err(RouterError::NoSuchProcedure("rpc1".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn answer_for_departed_caller_is_dropped_quietly() {
    let router = make_router("test-caller-closed");
    let callee = connect(1, REALM);
    let caller = connect(2, REALM);
    router
        .provide(&callee.session, 1, "rpc1", &no_options())
        .await
        .unwrap();
    router
        .call(&caller.session, 5, "rpc1", &no_options(), WampArgs::default())
        .await
        .unwrap();
    let (invocation_id, _) = callee.recorder.last_invocation().await.unwrap();

    router.session_closed(2).await;

    assert_eq!(router.pending_call_count().await, 0);
    assert_eq!(
        router
            .yield_result(&callee.session, invocation_id, WampArgs::default())
            .await,
        Err(RouterError::InvalidInvocation(invocation_id))
    );
    assert!(caller.recorder.answer_for(5).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn provider_error_reaches_caller() {
    let router = make_router("test-provider-error");
    let callee = connect(1, REALM);
    let caller = connect(2, REALM);
    router
        .provide(&callee.session, 1, "rpc1", &no_options())
        .await
        .unwrap();
    router
        .call(&caller.session, 8, "rpc1", &no_options(), WampArgs::default())
        .await
        .unwrap();
    let (invocation_id, _) = callee.recorder.last_invocation().await.unwrap();

    router
        .error(
            &callee.session,
            invocation_id,
            "com.example.error.busy",
            no_options(),
            WampArgs::default(),
        )
        .await
        .unwrap();

    assert!(matches!(
        caller.recorder.answer_for(8).await,
        Some(PeerMessage::CallError { request_id: 8, error, .. }) if error == "com.example.error.busy"
    ));
    assert_eq!(router.pending_call_count().await, 0);
}
