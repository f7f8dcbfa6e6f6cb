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

//! Ordered-list model with compact insert/remove/modify events.

use crate::message::WampArgs;
use crate::model::document::DataModel;
use crate::model::patch::{Patch, PatchOperation};
use crate::model::ModelError;
use crate::observability::events;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

pub const LIST_MODEL_TYPE: &str = "basic_list_model";
pub const KEY_INSERT: &str = "i";
pub const KEY_REMOVE: &str = "e";
pub const KEY_MODIFY: &str = "m";

const COMPONENT: &str = "list_model";
const VALUE_PATH: &str = "/body/value";

/// Compact list event, encoded on the wire as `[opcode, index(, value)]`.
#[derive(Clone, Debug, PartialEq)]
pub enum ListEvent {
    Insert { index: usize, value: Value },
    Remove { index: usize },
    Modify { index: usize, value: Value },
}

impl ListEvent {
    pub fn to_value(&self) -> Value {
        match self {
            ListEvent::Insert { index, value } => {
                Value::Array(vec![KEY_INSERT.into(), (*index).into(), value.clone()])
            }
            ListEvent::Remove { index } => Value::Array(vec![KEY_REMOVE.into(), (*index).into()]),
            ListEvent::Modify { index, value } => {
                Value::Array(vec![KEY_MODIFY.into(), (*index).into(), value.clone()])
            }
        }
    }

    /// Decodes a compact event. An empty array means "no incremental event".
    pub fn from_value(event: &Value) -> Result<Option<Self>, ModelError> {
        let Some(items) = event.as_array() else {
            return Err(ModelError::MalformedEvent("event is not an array".to_string()));
        };
        if items.is_empty() {
            return Ok(None);
        }

        let opcode = items[0]
            .as_str()
            .ok_or_else(|| ModelError::MalformedEvent("opcode is not a string".to_string()))?;
        let index = items
            .get(1)
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| ModelError::MalformedEvent("index is not an integer".to_string()))?;
        let value = || {
            items
                .get(2)
                .cloned()
                .ok_or_else(|| ModelError::MalformedEvent(format!("{opcode} without value")))
        };

        match opcode {
            KEY_INSERT => Ok(Some(ListEvent::Insert {
                index,
                value: value()?,
            })),
            KEY_REMOVE => Ok(Some(ListEvent::Remove { index })),
            KEY_MODIFY => Ok(Some(ListEvent::Modify {
                index,
                value: value()?,
            })),
            other => Err(ModelError::MalformedEvent(format!("unknown opcode {other}"))),
        }
    }
}

/// Listener for changes replayed onto a mirrored [`ListModel`].
pub trait ListObserver: Send + Sync {
    fn on_insert(&self, _index: usize, _value: &Value) {}

    fn on_remove(&self, _index: usize) {}

    fn on_modify(&self, _index: usize, _value: &Value) {}

    fn on_reset(&self, _values: &[Value]) {}
}

///
/// List document at `/body/value`.
///
/// Local edits go through [`insert`](Self::insert), [`push_back`](Self::push_back),
/// [`erase`](Self::erase) and [`replace`](Self::replace). A mirror of a remote list is kept
/// up to date with [`apply_event`](Self::apply_event), which also drives the observers.
pub struct ListModel {
    model: Arc<DataModel>,
    observers: Mutex<Vec<Arc<dyn ListObserver>>>,
}

impl ListModel {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<Value>) -> Self {
        let mut body = Map::new();
        body.insert("value".to_string(), Value::Array(items));
        Self {
            model: Arc::new(DataModel::new(LIST_MODEL_TYPE, body)),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn data_model(&self) -> &Arc<DataModel> {
        &self.model
    }

    pub async fn insert(&self, pos: usize, value: Value) -> Result<u64, ModelError> {
        let event = ListEvent::Insert {
            index: pos,
            value: value.clone(),
        };
        let patch = Patch::single(PatchOperation::Add {
            path: element_path(pos),
            value,
        });
        self.model.apply_patch(patch, event.to_value()).await
    }

    pub async fn push_back(&self, value: Value) -> Result<u64, ModelError> {
        self.model
            .mutate(move |document| {
                let index = list_items(document)?.len();
                let event = ListEvent::Insert {
                    index,
                    value: value.clone(),
                };
                let patch = Patch::single(PatchOperation::Add {
                    path: element_path(index),
                    value,
                });
                Ok((patch, event.to_value()))
            })
            .await
    }

    pub async fn erase(&self, index: usize) -> Result<u64, ModelError> {
        let patch = Patch::single(PatchOperation::Remove {
            path: element_path(index),
        });
        self.model
            .apply_patch(patch, ListEvent::Remove { index }.to_value())
            .await
    }

    pub async fn replace(&self, index: usize, value: Value) -> Result<u64, ModelError> {
        let event = ListEvent::Modify {
            index,
            value: value.clone(),
        };
        let patch = Patch::single(PatchOperation::Replace {
            path: element_path(index),
            value,
        });
        self.model.apply_patch(patch, event.to_value()).await
    }

    pub fn copy_value(&self) -> Vec<Value> {
        list_items(&self.model.snapshot())
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        list_items(&self.model.snapshot())
            .map(|items| items.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn add_observer(&self, observer: Arc<dyn ListObserver>) {
        self.observers.lock().await.push(observer);
    }

    /// Applies a `[patch, event]` publication received from the list this model mirrors.
    pub async fn apply_event(&self, args: &WampArgs) -> Result<u64, ModelError> {
        match self.apply_remote_update(args).await {
            Ok(version) => Ok(version),
            Err(err) => {
                warn!(
                    event = events::MODEL_EVENT_SKIPPED,
                    component = COMPONENT,
                    err = %err,
                    "ignoring list update"
                );
                Err(err)
            }
        }
    }

    async fn apply_remote_update(&self, args: &WampArgs) -> Result<u64, ModelError> {
        let patch_value = args
            .args_list
            .first()
            .ok_or_else(|| ModelError::MalformedPatch("missing patch argument".to_string()))?;
        let patch = Patch::from_value(patch_value)?;
        let event_value = args
            .args_list
            .get(1)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let event = ListEvent::from_value(&event_value)?;
        let is_reset = patch.replaced_document().is_some();

        let version = self.model.apply_patch(patch, event_value).await?;

        let observers = self.observers.lock().await.clone();
        if is_reset {
            let items = self.copy_value();
            for observer in &observers {
                observer.on_reset(&items);
            }
        } else if let Some(event) = event {
            for observer in &observers {
                match &event {
                    ListEvent::Insert { index, value } => observer.on_insert(*index, value),
                    ListEvent::Remove { index } => observer.on_remove(*index),
                    ListEvent::Modify { index, value } => observer.on_modify(*index, value),
                }
            }
        }
        Ok(version)
    }
}

impl Default for ListModel {
    fn default() -> Self {
        Self::new()
    }
}

fn element_path(index: usize) -> String {
    format!("{VALUE_PATH}/{index}")
}

fn list_items(document: &Value) -> Result<&Vec<Value>, ModelError> {
    document
        .pointer(VALUE_PATH)
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::PathNotFound(VALUE_PATH.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{ListEvent, ListModel, ListObserver};
    use crate::message::WampArgs;
    use crate::model::ModelError;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CallLog {
        calls: Mutex<Vec<String>>,
    }

    impl ListObserver for CallLog {
        fn on_insert(&self, index: usize, value: &Value) {
            self.calls.lock().unwrap().push(format!("insert {index} {value}"));
        }

        fn on_remove(&self, index: usize) {
            self.calls.lock().unwrap().push(format!("remove {index}"));
        }

        fn on_reset(&self, values: &[Value]) {
            self.calls.lock().unwrap().push(format!("reset {}", values.len()));
        }
    }

    fn publication(patch: Value, event: Value) -> WampArgs {
        WampArgs::from_list(vec![patch, event])
    }

    #[tokio::test]
    async fn insert_then_erase_restores_list() {
        let list = ListModel::with_items(vec![json!("a"), json!("b")]);
        let before = list.copy_value();

        list.insert(1, json!("x")).await.expect("insert should apply");
        assert_eq!(list.copy_value(), vec![json!("a"), json!("x"), json!("b")]);

        list.erase(1).await.expect("erase should apply");
        assert_eq!(list.copy_value(), before);
        assert_eq!(list.data_model().version(), 2);
    }

    #[tokio::test]
    async fn push_back_replace_and_out_of_range() {
        let list = ListModel::new();
        list.push_back(json!(1)).await.expect("push should apply");
        list.push_back(json!(2)).await.expect("push should apply");
        list.replace(0, json!(10)).await.expect("replace should apply");

        assert_eq!(list.copy_value(), vec![json!(10), json!(2)]);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.insert(5, json!(3)).await,
            Err(ModelError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            list.erase(2).await,
            Err(ModelError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn events_encode_opcode_index_and_value() {
        let insert = ListEvent::Insert {
            index: 3,
            value: json!("v"),
        };
        assert_eq!(insert.to_value(), json!(["i", 3, "v"]));
        assert_eq!(ListEvent::Remove { index: 1 }.to_value(), json!(["e", 1]));
        assert_eq!(ListEvent::from_value(&insert.to_value()), Ok(Some(insert)));
        assert_eq!(ListEvent::from_value(&json!([])), Ok(None));
        assert!(ListEvent::from_value(&json!(["x", 0])).is_err());
        assert!(ListEvent::from_value(&json!(["m", 0])).is_err());
        assert!(ListEvent::from_value(&json!("i")).is_err());
    }

    #[tokio::test]
    async fn apply_event_mirrors_source_and_notifies_every_observer() {
        let source = ListModel::new();
        let mirror = ListModel::new();
        let first = Arc::new(CallLog::default());
        let second = Arc::new(CallLog::default());
        mirror.add_observer(first.clone()).await;
        mirror.add_observer(second.clone()).await;

        source.push_back(json!("a")).await.unwrap();
        source.push_back(json!("b")).await.unwrap();
        let snapshot = source.data_model().snapshot_patch().to_value();
        mirror
            .apply_event(&publication(snapshot, json!([])))
            .await
            .expect("snapshot should apply");

        mirror
            .apply_event(&publication(
                json!([{ "op": "add", "path": "/body/value/0", "value": "z" }]),
                json!(["i", 0, "z"]),
            ))
            .await
            .expect("insert should apply");
        mirror
            .apply_event(&publication(
                json!([{ "op": "remove", "path": "/body/value/2" }]),
                json!(["e", 2]),
            ))
            .await
            .expect("remove should apply");

        assert_eq!(mirror.copy_value(), vec![json!("z"), json!("a")]);
        for log in [first, second] {
            assert_eq!(
                *log.calls.lock().unwrap(),
                vec!["reset 2", "insert 0 \"z\"", "remove 2"]
            );
        }
    }

    #[tokio::test]
    async fn apply_event_rejects_malformed_input_without_mutation() {
        let mirror = ListModel::with_items(vec![json!(1)]);

        assert!(matches!(
            mirror.apply_event(&WampArgs::default()).await,
            Err(ModelError::MalformedPatch(_))
        ));
        assert!(matches!(
            mirror
                .apply_event(&publication(json!([]), json!(["?", 0])))
                .await,
            Err(ModelError::MalformedEvent(_))
        ));
        assert_eq!(mirror.copy_value(), vec![json!(1)]);
        assert_eq!(mirror.data_model().version(), 0);
    }
}
