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

//! Payload and outbound message types exchanged with the session layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type SubscriptionId = u64;
pub type RegistrationId = u64;
pub type InvocationId = u64;
pub type RequestId = u64;

/// WAMP `Options` / `Details` dictionary.
pub type Options = Map<String, Value>;

/// Positional and keyword arguments carried by publications, calls and results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WampArgs {
    #[serde(default)]
    pub args_list: Vec<Value>,
    #[serde(default)]
    pub args_dict: Map<String, Value>,
}

impl WampArgs {
    pub fn from_list(args_list: Vec<Value>) -> Self {
        Self {
            args_list,
            args_dict: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args_list.is_empty() && self.args_dict.is_empty()
    }
}

/// Messages the router hands to a peer session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMessage {
    Event {
        uri: String,
        details: Options,
        args: WampArgs,
    },
    Invocation {
        request_id: InvocationId,
        registration_id: RegistrationId,
        details: Options,
        args: WampArgs,
    },
    CallResult {
        request_id: RequestId,
        details: Options,
        args: WampArgs,
    },
    CallError {
        request_id: RequestId,
        error: String,
        details: Options,
        args: WampArgs,
    },
}

impl PeerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::Event { .. } => "event",
            PeerMessage::Invocation { .. } => "invocation",
            PeerMessage::CallResult { .. } => "call_result",
            PeerMessage::CallError { .. } => "call_error",
        }
    }
}
