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

//! Structural document patches: `add`, `remove` and `replace` addressed by JSON pointer.

use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One patch step. `path` is a JSON pointer; `""` addresses the whole document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
}

impl PatchOperation {
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. } => path,
        }
    }
}

/// Ordered list of operations, applied all-or-nothing by the data model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Vec<PatchOperation>);

impl Patch {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }

    pub fn single(operation: PatchOperation) -> Self {
        Self(vec![operation])
    }

    /// Patch that swaps in `document` wholesale; used for initial snapshots.
    pub fn replace_document(document: Value) -> Self {
        Self::single(PatchOperation::Replace {
            path: String::new(),
            value: document,
        })
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Returns the new document when this patch is a whole-document replace.
    pub fn replaced_document(&self) -> Option<&Value> {
        match self.0.as_slice() {
            [PatchOperation::Replace { path, value }] if path.is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .filter_map(|operation| serde_json::to_value(operation).ok())
                .collect(),
        )
    }

    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        serde_json::from_value(value.clone())
            .map_err(|err| ModelError::MalformedPatch(err.to_string()))
    }

    /// Applies every operation in order to `document`.
    ///
    /// On error `document` may be partially modified; callers apply to a working copy.
    pub fn apply_to(&self, document: &mut Value) -> Result<(), ModelError> {
        for operation in &self.0 {
            apply_operation(document, operation)?;
        }
        Ok(())
    }
}

fn parse_pointer(path: &str) -> Result<Vec<String>, ModelError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(ModelError::InvalidPointer(path.to_string()));
    };
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn parse_index(token: &str, path: &str) -> Result<usize, ModelError> {
    if token.len() > 1 && token.starts_with('0') {
        return Err(ModelError::InvalidPointer(path.to_string()));
    }
    token
        .parse::<usize>()
        .map_err(|_| ModelError::InvalidPointer(path.to_string()))
}

fn resolve_mut<'a>(
    document: &'a mut Value,
    tokens: &[String],
    path: &str,
) -> Result<&'a mut Value, ModelError> {
    let mut current = document;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| ModelError::PathNotFound(path.to_string()))?,
            Value::Array(items) => {
                let index = parse_index(token, path)?;
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or(ModelError::IndexOutOfRange { index, len })?
            }
            _ => return Err(ModelError::PathNotFound(path.to_string())),
        };
    }
    Ok(current)
}

fn apply_operation(document: &mut Value, operation: &PatchOperation) -> Result<(), ModelError> {
    let path = operation.path();
    let tokens = parse_pointer(path)?;

    let Some((last, parent_tokens)) = tokens.split_last() else {
        return match operation {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => {
                *document = value.clone();
                Ok(())
            }
            PatchOperation::Remove { .. } => Err(ModelError::InvalidPointer(path.to_string())),
        };
    };

    let parent = resolve_mut(document, parent_tokens, path)?;
    match (parent, operation) {
        (Value::Object(map), PatchOperation::Add { value, .. }) => {
            map.insert(last.clone(), value.clone());
        }
        (Value::Object(map), PatchOperation::Remove { .. }) => {
            map.remove(last)
                .ok_or_else(|| ModelError::PathNotFound(path.to_string()))?;
        }
        (Value::Object(map), PatchOperation::Replace { value, .. }) => {
            let slot = map
                .get_mut(last)
                .ok_or_else(|| ModelError::PathNotFound(path.to_string()))?;
            *slot = value.clone();
        }
        (Value::Array(items), PatchOperation::Add { value, .. }) => {
            let len = items.len();
            let index = if last == "-" {
                len
            } else {
                parse_index(last, path)?
            };
            if index > len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
            items.insert(index, value.clone());
        }
        (Value::Array(items), PatchOperation::Remove { .. }) => {
            let index = parse_index(last, path)?;
            let len = items.len();
            if index >= len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
            items.remove(index);
        }
        (Value::Array(items), PatchOperation::Replace { value, .. }) => {
            let index = parse_index(last, path)?;
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(ModelError::IndexOutOfRange { index, len })?;
            *slot = value.clone();
        }
        _ => return Err(ModelError::PathNotFound(path.to_string())),
    }
    Ok(())
}
