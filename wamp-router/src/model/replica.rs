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

//! Plain local mirror of a remote list, driven by `[patch, event]` publications.

use crate::message::WampArgs;
use crate::model::list::{ListEvent, ListObserver};
use crate::model::patch::Patch;
use crate::model::ModelError;
use crate::observability::events;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

const COMPONENT: &str = "list_replica";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListReplica {
    items: Vec<Value>,
}

impl ListReplica {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn on_insert(&mut self, index: usize, value: Value) -> Result<(), ModelError> {
        let len = self.items.len();
        if index > len {
            return Err(ModelError::IndexOutOfRange { index, len });
        }
        self.items.insert(index, value);
        Ok(())
    }

    pub fn on_remove(&mut self, index: usize) -> Result<(), ModelError> {
        let len = self.items.len();
        if index >= len {
            return Err(ModelError::IndexOutOfRange { index, len });
        }
        self.items.remove(index);
        Ok(())
    }

    pub fn on_modify(&mut self, index: usize, value: Value) -> Result<(), ModelError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn on_reset(&mut self, items: Vec<Value>) {
        self.items = items;
    }

    /// Applies one publication. A whole-document patch resets the mirror; anything else is
    /// replayed from the compact event and the patch itself is ignored.
    pub fn apply(&mut self, args: &WampArgs) -> Result<(), ModelError> {
        let patch = args
            .args_list
            .first()
            .ok_or_else(|| ModelError::MalformedPatch("missing patch argument".to_string()))
            .and_then(Patch::from_value)?;

        if let Some(document) = patch.replaced_document() {
            let items = document
                .pointer("/body/value")
                .and_then(Value::as_array)
                .cloned()
                .ok_or_else(|| ModelError::PathNotFound("/body/value".to_string()))?;
            self.on_reset(items);
            return Ok(());
        }

        let event = match args.args_list.get(1) {
            Some(event) => ListEvent::from_value(event)?,
            None => None,
        };
        match event {
            Some(ListEvent::Insert { index, value }) => self.on_insert(index, value),
            Some(ListEvent::Remove { index }) => self.on_remove(index),
            Some(ListEvent::Modify { index, value }) => self.on_modify(index, value),
            None => Ok(()),
        }
    }
}

impl ListObserver for Mutex<ListReplica> {
    fn on_insert(&self, index: usize, value: &Value) {
        let mut replica = self.lock().unwrap_or_else(PoisonError::into_inner);
        log_skipped(replica.on_insert(index, value.clone()));
    }

    fn on_remove(&self, index: usize) {
        let mut replica = self.lock().unwrap_or_else(PoisonError::into_inner);
        log_skipped(replica.on_remove(index));
    }

    fn on_modify(&self, index: usize, value: &Value) {
        let mut replica = self.lock().unwrap_or_else(PoisonError::into_inner);
        log_skipped(replica.on_modify(index, value.clone()));
    }

    fn on_reset(&self, values: &[Value]) {
        let mut replica = self.lock().unwrap_or_else(PoisonError::into_inner);
        replica.on_reset(values.to_vec());
    }
}

fn log_skipped(result: Result<(), ModelError>) {
    if let Err(err) = result {
        warn!(
            event = events::REPLICA_EVENT_SKIPPED,
            component = COMPONENT,
            err = %err,
            "replica out of step with source list"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::ListReplica;
    use crate::message::WampArgs;
    use crate::model::{ListModel, ModelError};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn bounds_are_checked() {
        let mut replica = ListReplica::new();

        assert_eq!(
            replica.on_insert(1, json!("a")),
            Err(ModelError::IndexOutOfRange { index: 1, len: 0 })
        );
        replica.on_insert(0, json!("a")).unwrap();
        replica.on_modify(0, json!("b")).unwrap();
        assert_eq!(
            replica.on_remove(1),
            Err(ModelError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(replica.items(), &[json!("b")]);
    }

    #[test]
    fn apply_resets_from_snapshot_then_replays_events() {
        let mut replica = ListReplica::new();
        let snapshot = json!([{
            "op": "replace",
            "path": "",
            "value": { "head": { "type": "basic_list_model", "version": 4 }, "body": { "value": [1, 2] } }
        }]);

        replica
            .apply(&WampArgs::from_list(vec![snapshot, json!([])]))
            .expect("snapshot should apply");
        replica
            .apply(&WampArgs::from_list(vec![json!([]), json!(["m", 1, 20])]))
            .expect("modify should apply");
        replica
            .apply(&WampArgs::from_list(vec![json!([]), json!(["e", 0])]))
            .expect("remove should apply");

        assert_eq!(replica.items(), &[json!(20)]);
        assert!(replica.apply(&WampArgs::default()).is_err());
    }

    #[tokio::test]
    async fn replica_tracks_list_model_as_observer() {
        let source = ListModel::new();
        let mirror = ListModel::new();
        let replica = Arc::new(Mutex::new(ListReplica::new()));
        mirror.add_observer(replica.clone()).await;

        source.push_back(json!("x")).await.unwrap();
        let snapshot = source.data_model().snapshot_patch().to_value();
        mirror
            .apply_event(&WampArgs::from_list(vec![snapshot, json!([])]))
            .await
            .unwrap();
        mirror
            .apply_event(&WampArgs::from_list(vec![
                json!([{ "op": "add", "path": "/body/value/1", "value": "y" }]),
                json!(["i", 1, "y"]),
            ]))
            .await
            .unwrap();

        assert_eq!(replica.lock().unwrap().items(), &[json!("x"), json!("y")]);
    }
}
