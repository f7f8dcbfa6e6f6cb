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

//! Versioned document shared between a topic and its replication sinks.

use crate::model::patch::Patch;
use crate::model::ModelError;
use crate::observability::{events, fields};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const COMPONENT: &str = "data_model";

/// Receives every `(patch, event)` pair a [`DataModel`] applies.
#[async_trait]
pub trait ModelPublisher: Send + Sync {
    async fn publish_update(&self, patch: &Patch, event: &Value);
}

/// Receives a whole-document snapshot at a fixed point of a [`DataModel`]'s update sequence.
///
/// Updates applied before the snapshot was taken are notified before it; updates applied
/// after are notified after it.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn deliver_snapshot(&self, snapshot: Patch);
}

enum Notification {
    Update { patch: Patch, event: Value },
    Snapshot { patch: Patch, sink: Box<dyn SnapshotSink> },
}

#[derive(Default)]
struct NotificationQueue {
    pending: VecDeque<Notification>,
    draining: bool,
}

/// Releases the drainer role if a drain is dropped part way through.
struct DrainGuard<'a> {
    queue: &'a StdMutex<NotificationQueue>,
    finished: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            lock_queue(self.queue).draining = false;
        }
    }
}

fn lock_queue(queue: &StdMutex<NotificationQueue>) -> MutexGuard<'_, NotificationQueue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

///
/// A `{"head": {"type", "version"}, "body": {..}}` document.
///
/// Readers take lock-free snapshots; writers are serialized by a mutation lock. Each applied
/// patch is queued under that lock and publishers are notified from the queue in the order
/// patches were applied. No lock is held while a publisher runs, so a publisher may itself
/// mutate the model; its update is queued behind the one being delivered.
///
/// ```
/// use serde_json::{json, Map};
/// use wamp_router::model::{DataModel, Patch, PatchOperation};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut body = Map::new();
/// body.insert("value".to_string(), json!(1));
/// let model = DataModel::new("counter", body);
///
/// let patch = Patch::single(PatchOperation::Replace {
///     path: "/body/value".to_string(),
///     value: json!(2),
/// });
/// model.apply_patch(patch, json!([])).await.unwrap();
///
/// assert_eq!(model.copy_document()["body"]["value"], 2);
/// assert_eq!(model.version(), 1);
/// # });
/// ```
pub struct DataModel {
    model_type: String,
    document: ArcSwap<Value>,
    mutation: Mutex<()>,
    publishers: Mutex<Vec<Arc<dyn ModelPublisher>>>,
    notifications: StdMutex<NotificationQueue>,
}

impl DataModel {
    pub fn new(model_type: &str, body: Map<String, Value>) -> Self {
        let document = json!({
            "head": { "type": model_type, "version": 0 },
            "body": Value::Object(body),
        });
        Self {
            model_type: model_type.to_string(),
            document: ArcSwap::from_pointee(document),
            mutation: Mutex::new(()),
            publishers: Mutex::new(Vec::new()),
            notifications: StdMutex::new(NotificationQueue::default()),
        }
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Shared immutable view of the current document.
    pub fn snapshot(&self) -> Arc<Value> {
        self.document.load_full()
    }

    pub fn copy_document(&self) -> Value {
        self.snapshot().as_ref().clone()
    }

    pub fn version(&self) -> u64 {
        document_version(&self.snapshot())
    }

    /// Whole-document replace patch carrying the current state.
    pub fn snapshot_patch(&self) -> Patch {
        Patch::replace_document(self.copy_document())
    }

    pub async fn add_publisher(&self, publisher: Arc<dyn ModelPublisher>) {
        self.publishers.lock().await.push(publisher);
    }

    pub async fn publisher_count(&self) -> usize {
        self.publishers.lock().await.len()
    }

    /// Applies `patch` atomically and fans `(patch, event)` out to every publisher.
    ///
    /// Returns the new document version once the update has been delivered, or once it is
    /// queued behind a delivery already running on another task. A patch that does not apply
    /// leaves the document untouched and nothing is published.
    pub async fn apply_patch(&self, patch: Patch, event: Value) -> Result<u64, ModelError> {
        self.mutate(move |_| Ok((patch, event))).await
    }

    /// Builds a patch from the current document under the mutation lock, then applies it.
    pub(crate) async fn mutate<F>(&self, build: F) -> Result<u64, ModelError>
    where
        F: FnOnce(&Value) -> Result<(Patch, Value), ModelError>,
    {
        let mutation_guard = self.mutation.lock().await;
        let current = self.document.load_full();

        let applied = build(&current).and_then(|(patch, event)| {
            let mut next = current.as_ref().clone();
            patch.apply_to(&mut next)?;
            if patch.replaced_document().is_none() {
                bump_version(&mut next);
            }
            Ok((patch, event, next))
        });

        let (patch, event, next) = match applied {
            Ok(applied) => applied,
            Err(err) => {
                warn!(
                    event = events::MODEL_PATCH_SKIPPED,
                    component = COMPONENT,
                    model_type = self.model_type.as_str(),
                    version = document_version(&current),
                    err = %err,
                    "patch did not apply; document unchanged"
                );
                return Err(err);
            }
        };

        let version = document_version(&next);
        self.document.store(Arc::new(next));

        debug!(
            event = events::MODEL_PATCH_APPLIED,
            component = COMPONENT,
            model_type = self.model_type.as_str(),
            version,
            opcode = %fields::format_event_opcode(&event),
            "applied model patch"
        );

        lock_queue(&self.notifications)
            .pending
            .push_back(Notification::Update { patch, event });
        drop(mutation_guard);

        self.drain().await;
        Ok(version)
    }

    /// Hands `sink` the current document as a whole-document replace, ordered against
    /// every update: it sees exactly the updates applied after the snapshot was taken.
    pub async fn sync_snapshot(&self, sink: Box<dyn SnapshotSink>) {
        {
            let _mutation_guard = self.mutation.lock().await;
            let patch = self.snapshot_patch();
            lock_queue(&self.notifications)
                .pending
                .push_back(Notification::Snapshot { patch, sink });
        }
        self.drain().await;
    }

    /// Delivers queued notifications unless another task already does.
    async fn drain(&self) {
        {
            let mut queue = lock_queue(&self.notifications);
            if queue.draining {
                return;
            }
            queue.draining = true;
        }

        let mut guard = DrainGuard {
            queue: &self.notifications,
            finished: false,
        };
        loop {
            let next = {
                let mut queue = lock_queue(&self.notifications);
                match queue.pending.pop_front() {
                    Some(next) => next,
                    None => {
                        queue.draining = false;
                        guard.finished = true;
                        break;
                    }
                }
            };
            self.notify(next).await;
        }
    }

    async fn notify(&self, notification: Notification) {
        match notification {
            Notification::Update { patch, event } => {
                let publishers = self.publishers.lock().await.clone();
                for publisher in &publishers {
                    publisher.publish_update(&patch, &event).await;
                }
            }
            Notification::Snapshot { patch, sink } => sink.deliver_snapshot(patch).await,
        }
    }
}

fn document_version(document: &Value) -> u64 {
    document
        .pointer("/head/version")
        .and_then(Value::as_u64)
        .unwrap_or_default()
}

fn bump_version(document: &mut Value) {
    let next = document_version(document) + 1;
    if let Some(head) = document.get_mut("head").and_then(Value::as_object_mut) {
        head.insert("version".to_string(), Value::from(next));
    }
}
