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
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serde_json::{json, Map};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Builder;
use wamp_router::model::ListModel;
use wamp_router::{DeliveryError, PeerMessage, Router, Session, SessionId, WampArgs};

const REALM: &str = "bench";
const FANOUT_SUBSCRIBERS: u64 = 256;
const LIST_PRELOAD: usize = 128;

struct CountingSession {
    id: SessionId,
    received: AtomicUsize,
}

#[async_trait]
impl Session for CountingSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn realm(&self) -> &str {
        REALM
    }

    async fn send(&self, _message: PeerMessage) -> Result<(), DeliveryError> {
        self.received.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

fn counting_sessions(count: u64) -> Vec<Arc<dyn Session>> {
    (1..=count)
        .map(|id| {
            let session: Arc<dyn Session> = Arc::new(CountingSession {
                id,
                received: AtomicUsize::new(0),
            });
            session
        })
        .collect()
}

fn router_criterion(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime should build");

    let fanout_router = Router::new("bench-fanout");
    let subscribers = counting_sessions(FANOUT_SUBSCRIBERS);
    runtime.block_on(async {
        for session in &subscribers {
            fanout_router
                .subscribe(session, 1, "bench.topic", &Map::new())
                .await
                .expect("benchmark subscribe should succeed");
        }
    });

    let mut publish_group = c.benchmark_group("publish");
    publish_group.bench_function("fanout_256_subscribers", |b| {
        b.iter(|| {
            runtime.block_on(fanout_router.inbound_publish(
                REALM,
                "bench.topic",
                Map::new(),
                WampArgs::from_list(vec![json!("payload")]),
            ));
        });
    });
    publish_group.finish();

    let mut dealer_group = c.benchmark_group("dealer");
    dealer_group.bench_function("provide_call_yield", |b| {
        b.iter_batched(
            || {
                let router = Router::new("bench-dealer");
                let sessions = counting_sessions(2);
                (router, sessions)
            },
            |(router, sessions)| {
                runtime.block_on(async {
                    let registration_id = router
                        .provide(&sessions[0], 1, "bench.rpc", &Map::new())
                        .await
                        .expect("benchmark provide should succeed");
                    router
                        .call(&sessions[1], 1, "bench.rpc", &Map::new(), WampArgs::default())
                        .await
                        .expect("benchmark call should route");
                    black_box(registration_id);
                });
            },
            BatchSize::SmallInput,
        );
    });
    dealer_group.finish();

    let mut model_group = c.benchmark_group("model");
    model_group.bench_function("list_insert_erase_published", |b| {
        b.iter_batched(
            || {
                let router = Router::new("bench-model");
                let list = ListModel::with_items((0..LIST_PRELOAD).map(|n| json!(n)).collect());
                let subscribers = counting_sessions(16);
                runtime.block_on(async {
                    router
                        .attach_model(REALM, "bench.list", list.data_model().clone())
                        .await
                        .expect("benchmark attach should succeed");
                    for session in &subscribers {
                        router
                            .subscribe(session, 1, "bench.list", &Map::new())
                            .await
                            .expect("benchmark subscribe should succeed");
                    }
                });
                (router, list, subscribers)
            },
            |(router, list, subscribers)| {
                runtime.block_on(async {
                    list.insert(LIST_PRELOAD / 2, json!("x"))
                        .await
                        .expect("insert should apply");
                    list.erase(LIST_PRELOAD / 2).await.expect("erase should apply");
                });
                black_box((router, subscribers));
            },
            BatchSize::SmallInput,
        );
    });
    model_group.finish();
}

criterion_group!(benches, router_criterion);
criterion_main!(benches);
