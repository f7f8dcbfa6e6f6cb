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

//! Publish/subscribe layer.
//!
//! - `topic_registry` owns realm-scoped topics, created on first use
//! - `subscription_index` maps subscription ids back to topics and owning sessions
//! - `topic` holds per-topic recipients and computes delivery plans
//! - `bridge` is the seam for cross-realm replication
//! - `manager` coordinates the above behind one lock and drives model fan-out

pub(crate) mod bridge;
pub(crate) mod manager;
pub(crate) mod subscription_index;
pub(crate) mod topic;
pub(crate) mod topic_registry;

pub use bridge::RealmBridge;
pub(crate) use manager::PubSubManager;
