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

//! Single-string model.

use crate::model::document::DataModel;
use crate::model::patch::{Patch, PatchOperation};
use crate::model::ModelError;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const TEXT_MODEL_TYPE: &str = "basic_text";
const VALUE_PATH: &str = "/body/value";

pub struct TextModel {
    model: Arc<DataModel>,
}

impl TextModel {
    pub fn new(initial: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("value".to_string(), Value::String(initial.into()));
        Self {
            model: Arc::new(DataModel::new(TEXT_MODEL_TYPE, body)),
        }
    }

    pub fn data_model(&self) -> &Arc<DataModel> {
        &self.model
    }

    pub async fn set_value(&self, value: impl Into<String>) -> Result<u64, ModelError> {
        let patch = Patch::single(PatchOperation::Replace {
            path: VALUE_PATH.to_string(),
            value: Value::String(value.into()),
        });
        self.model.apply_patch(patch, Value::Array(Vec::new())).await
    }

    pub fn value(&self) -> String {
        self.model
            .snapshot()
            .pointer(VALUE_PATH)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

impl Default for TextModel {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::TextModel;

    #[tokio::test]
    async fn set_value_replaces_text_and_bumps_version() {
        let model = TextModel::new("hello");
        assert_eq!(model.value(), "hello");

        assert_eq!(model.set_value("world").await, Ok(1));

        assert_eq!(model.value(), "world");
        assert_eq!(model.data_model().copy_document()["head"]["type"], "basic_text");
    }

    #[test]
    fn default_model_is_empty() {
        assert_eq!(TextModel::default().value(), "");
    }
}
