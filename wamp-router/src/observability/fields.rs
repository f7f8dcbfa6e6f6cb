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

//! Shared field values and value-format helpers.

use serde_json::Value;

pub const NONE: &str = "none";
pub const REASON_CALLEE_CLOSED: &str = "callee_closed";
pub const REASON_CALLER_CLOSED: &str = "caller_closed";

/// Compact `realm:uri` label used to key topic log lines.
pub fn topic_label(realm: &str, uri: &str) -> String {
    format!("{realm}:{uri}")
}

/// Opcode of a compact model event, or [`NONE`] for events without one.
pub fn format_event_opcode(event: &Value) -> String {
    event
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_str)
        .unwrap_or(NONE)
        .to_string()
}
