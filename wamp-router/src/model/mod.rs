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

//! Shared data-model and replication layer.
//!
//! A [`DataModel`] is a versioned document owned by one topic. Every mutation goes through
//! [`DataModel::apply_patch`], which produces a structural [`Patch`] plus a compact event.
//! The owning topic republishes both to its subscribers and bridged realms as the
//! publication arguments `[patch, event]`.
//!
//! ```
//! use serde_json::json;
//! use wamp_router::model::{ListModel, ListReplica};
//! use wamp_router::WampArgs;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let list = ListModel::new();
//! list.push_back(json!("a")).await.unwrap();
//!
//! // A subscriber mirrors the list from the initial snapshot plus compact events.
//! let mut replica = ListReplica::new();
//! let snapshot = list.data_model().snapshot_patch();
//! replica
//!     .apply(&WampArgs::from_list(vec![snapshot.to_value(), json!([])]))
//!     .unwrap();
//! assert_eq!(replica.items(), &[json!("a")]);
//! # });
//! ```

mod document;
mod list;
mod patch;
mod replica;
mod text;

pub use document::{DataModel, ModelPublisher, SnapshotSink};
pub use list::{
    ListEvent, ListModel, ListObserver, KEY_INSERT, KEY_MODIFY, KEY_REMOVE, LIST_MODEL_TYPE,
};
pub use patch::{Patch, PatchOperation};
pub use replica::ListReplica;
pub use text::{TextModel, TEXT_MODEL_TYPE};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Model-layer failures. Logged and skipped; never surfaced as protocol errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelError {
    InvalidPointer(String),
    PathNotFound(String),
    IndexOutOfRange { index: usize, len: usize },
    MalformedPatch(String),
    MalformedEvent(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidPointer(path) => write!(f, "invalid json pointer {path:?}"),
            ModelError::PathNotFound(path) => write!(f, "path {path:?} not found"),
            ModelError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            ModelError::MalformedPatch(reason) => write!(f, "malformed patch: {reason}"),
            ModelError::MalformedEvent(reason) => write!(f, "malformed event: {reason}"),
        }
    }
}

impl Error for ModelError {}
