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

use crate::config::{ModelConfig, ModelKind};
use serde_json::Value;
use std::sync::Arc;
use wamp_router::model::{DataModel, ListModel, TextModel};

/// A model owned by the binary for as long as the router runs.
pub(crate) enum HostedModel {
    Text(TextModel),
    List(ListModel),
}

impl HostedModel {
    pub(crate) fn from_config(config: &ModelConfig) -> Self {
        match config.kind {
            ModelKind::BasicText => {
                let initial = config
                    .initial
                    .as_ref()
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                HostedModel::Text(TextModel::new(initial))
            }
            ModelKind::BasicList => {
                let items = config
                    .initial
                    .as_ref()
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                HostedModel::List(ListModel::with_items(items))
            }
        }
    }

    pub(crate) fn data_model(&self) -> Arc<DataModel> {
        match self {
            HostedModel::Text(model) => model.data_model().clone(),
            HostedModel::List(model) => model.data_model().clone(),
        }
    }
}
