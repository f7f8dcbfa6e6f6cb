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

//! Canonical structured event names used across `wamp-router`.

// Router facade events.
pub const ROUTER_START: &str = "router_start";
pub const SESSION_CLOSED: &str = "session_closed";

// Publish/subscribe events.
pub const TOPIC_CREATE: &str = "topic_create";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const SUBSCRIBE_REJECTED: &str = "subscribe_rejected";
pub const UNSUBSCRIBE_OK: &str = "unsubscribe_ok";
pub const UNSUBSCRIBE_REJECTED: &str = "unsubscribe_rejected";
pub const PUBLISH_RECEIVE: &str = "publish_receive";
pub const PUBLISH_DROP_INVALID_URI: &str = "publish_drop_invalid_uri";
pub const PUBLISH_DELIVERY_SKIPPED: &str = "publish_delivery_skipped";
pub const BRIDGE_DELIVERY_FAILED: &str = "bridge_delivery_failed";
pub const SNAPSHOT_DELIVERY_FAILED: &str = "snapshot_delivery_failed";
pub const MODEL_ATTACH_OK: &str = "model_attach_ok";
pub const MODEL_ATTACH_REJECTED: &str = "model_attach_rejected";
pub const MODEL_UPDATE_DROPPED: &str = "model_update_dropped";
pub const TARGET_ADD: &str = "target_add";
pub const TARGET_REMOVE: &str = "target_remove";
pub const TARGET_REMOVE_REJECTED: &str = "target_remove_rejected";
pub const PUBSUB_SESSION_CLEANUP: &str = "pubsub_session_cleanup";

// Dealer events.
pub const PROVIDE_OK: &str = "provide_ok";
pub const PROVIDE_REPLACED: &str = "provide_replaced";
pub const PROVIDE_REJECTED: &str = "provide_rejected";
pub const UNPROVIDE_OK: &str = "unprovide_ok";
pub const UNPROVIDE_REJECTED: &str = "unprovide_rejected";
pub const CALL_ROUTED: &str = "call_routed";
pub const CALL_REJECTED: &str = "call_rejected";
pub const INVOCATION_DELIVERY_FAILED: &str = "invocation_delivery_failed";
pub const YIELD_OK: &str = "yield_ok";
pub const YIELD_REJECTED: &str = "yield_rejected";
pub const RESULT_DELIVERY_FAILED: &str = "result_delivery_failed";
pub const PENDING_CALL_CANCELED: &str = "pending_call_canceled";
pub const DEALER_SESSION_CLEANUP: &str = "dealer_session_cleanup";

// Data-model events.
pub const MODEL_PATCH_APPLIED: &str = "model_patch_applied";
pub const MODEL_PATCH_SKIPPED: &str = "model_patch_skipped";
pub const MODEL_EVENT_SKIPPED: &str = "model_event_skipped";
pub const REPLICA_EVENT_SKIPPED: &str = "replica_event_skipped";
