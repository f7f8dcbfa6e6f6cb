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

//! RPC dealer layer.
//!
//! `registration_registry` enforces the single-active-registration rule and keeps
//! superseded records unregisterable. `pending_calls` tracks in-flight invocations until
//! the callee answers or either side goes away. `service` ties both together behind one lock.

pub(crate) mod pending_calls;
pub(crate) mod registration_registry;
pub(crate) mod service;

pub use registration_registry::InvocationPolicy;
pub(crate) use service::Dealer;
