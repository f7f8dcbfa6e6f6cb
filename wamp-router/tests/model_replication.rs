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

use integration_test_utils::{RecordingBridge, StallingSession};
use serde_json::json;
use std::sync::Arc;
use support::{connect, event_args, make_router, no_options, REALM};
use wamp_router::model::{ListModel, ListReplica, TextModel};
use wamp_router::{RouterError, Session};

#[tokio::test(flavor = "multi_thread")]
async fn late_subscriber_replays_snapshot_and_events() {
    let router = make_router("test-list-replication");
    let list = ListModel::with_items(vec![json!("a"), json!("b")]);
    router
        .attach_model(REALM, "model.todo", list.data_model().clone())
        .await
        .unwrap();
    list.push_back(json!("c")).await.unwrap();

    let peer = connect(1, REALM);
    router
        .subscribe(&peer.session, 1, "model.todo", &no_options())
        .await
        .unwrap();
    list.insert(0, json!("z")).await.unwrap();
    list.replace(2, json!("B")).await.unwrap();
    list.erase(3).await.unwrap();

    let mut replica = ListReplica::new();
    for event in peer.recorder.events().await {
        replica.apply(event_args(&event)).expect("publication should replay");
    }

    assert_eq!(replica.items(), list.copy_value().as_slice());
    assert_eq!(list.data_model().version(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn bridged_realm_mirror_converges_through_apply_event() {
    let source_router = make_router("test-bridge-source");
    let target_router = make_router("test-bridge-target");
    let list = ListModel::new();
    source_router
        .attach_model(REALM, "model.list", list.data_model().clone())
        .await
        .unwrap();
    list.push_back(json!(1)).await.unwrap();

    let remote = connect(7, "realm2");
    target_router
        .subscribe(&remote.session, 1, "model.list", &no_options())
        .await
        .unwrap();
    source_router
        .add_target(REALM, "model.list", "realm2", target_router.bridge())
        .await
        .unwrap();
    list.push_back(json!(2)).await.unwrap();
    list.erase(0).await.unwrap();

    let mirror = ListModel::new();
    for event in remote.recorder.events().await {
        mirror
            .apply_event(event_args(&event))
            .await
            .expect("mirror should apply every publication");
    }

    assert_eq!(mirror.copy_value(), vec![json!(2)]);
    assert_eq!(mirror.data_model().version(), list.data_model().version());
}

#[tokio::test(flavor = "multi_thread")]
async fn text_model_updates_reach_subscribers_and_targets() {
    let router = make_router("test-text-model");
    let text = TextModel::new("draft");
    router
        .attach_model(REALM, "model.title", text.data_model().clone())
        .await
        .unwrap();
    let bridge = RecordingBridge::new();
    router
        .add_target(REALM, "model.title", "archive", bridge.clone())
        .await
        .unwrap();
    let peer = connect(1, REALM);
    router
        .subscribe(&peer.session, 1, "model.title", &no_options())
        .await
        .unwrap();

    text.set_value("final").await.unwrap();

    let events = peer.recorder.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(event_args(&events[1]).args_list[1], json!([]));
    let forwarded = bridge.publications().await;
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[1].realm, "archive");
    assert_eq!(forwarded[1].args.args_list[0][0]["value"], "final");

    assert_eq!(
        router
            .attach_model(REALM, "model.title", TextModel::default().data_model().clone())
            .await,
        Err(RouterError::ModelAlreadyAttached("model.title".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_mutation_publishes_nothing() {
    let router = make_router("test-bad-mutation");
    let list = ListModel::new();
    router
        .attach_model(REALM, "model.list", list.data_model().clone())
        .await
        .unwrap();
    let peer = connect(1, REALM);
    router
        .subscribe(&peer.session, 1, "model.list", &no_options())
        .await
        .unwrap();

    assert!(list.erase(0).await.is_err());
    assert!(list.insert(4, json!("x")).await.is_err());

    assert_eq!(peer.recorder.events().await.len(), 1);
    assert_eq!(list.data_model().version(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_during_slow_snapshot_reaches_subscriber_after_it() {
    let router = make_router("test-slow-snapshot");
    let list = ListModel::with_items(vec![json!("a")]);
    router
        .attach_model(REALM, "model.list", list.data_model().clone())
        .await
        .unwrap();
    let slow = StallingSession::new(1, REALM, 0);
    let session: Arc<dyn Session> = slow.clone();

    let subscribe = {
        let router = router.clone();
        tokio::spawn(async move {
            router
                .subscribe(&session, 1, "model.list", &no_options())
                .await
        })
    };
    slow.wait_until_stalled().await;
    list.push_back(json!("b")).await.unwrap();
    slow.release();
    subscribe.await.unwrap().unwrap();

    let events = slow.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(event_args(&events[0]).args_list[0][0]["path"], "");
    assert_eq!(event_args(&events[1]).args_list[1], json!(["i", 1, "b"]));

    let mut replica = ListReplica::new();
    for event in &events {
        replica.apply(event_args(event)).expect("publication should replay");
    }
    assert_eq!(replica.items(), &[json!("a"), json!("b")]);
}
