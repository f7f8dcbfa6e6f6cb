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

//! Caller-visible failures of router requests.

use crate::message::{InvocationId, RegistrationId, RequestId, SubscriptionId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ERROR_CANCELED: &str = "wamp.error.canceled";
pub const ERROR_INVALID_ARGUMENT: &str = "wamp.error.invalid_argument";
pub const ERROR_INVALID_URI: &str = "wamp.error.invalid_uri";
pub const ERROR_NO_AVAILABLE_CALLEE: &str = "wamp.error.no_available_callee";
pub const ERROR_NO_SUCH_PROCEDURE: &str = "wamp.error.no_such_procedure";
pub const ERROR_NO_SUCH_REGISTRATION: &str = "wamp.error.no_such_registration";
pub const ERROR_NO_SUCH_SUBSCRIPTION: &str = "wamp.error.no_such_subscription";
pub const ERROR_NOT_AUTHORIZED: &str = "wamp.error.not_authorized";
pub const ERROR_PROCEDURE_ALREADY_EXISTS: &str = "wamp.error.procedure_already_exists";
pub const ERROR_PROTOCOL_VIOLATION: &str = "wamp.error.protocol_violation";

/// What a failed lookup was looking for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup {
    Subscription(SubscriptionId),
    Registration(RegistrationId),
    Bridge { uri: String, target_realm: String },
}

/// Recoverable request failures, returned to the originating session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouterError {
    NotFound(Lookup),
    NotOwner,
    ProcedureAlreadyExists(String),
    NoSuchProcedure(String),
    InvalidInvocation(InvocationId),
    InvalidUri(String),
    DuplicateRequest(RequestId),
    CalleeUnavailable(String),
    ModelAlreadyAttached(String),
}

impl RouterError {
    /// WAMP error URI the session layer reports for this failure.
    pub fn error_uri(&self) -> &'static str {
        match self {
            RouterError::NotFound(Lookup::Subscription(_)) => ERROR_NO_SUCH_SUBSCRIPTION,
            RouterError::NotFound(Lookup::Registration(_)) => ERROR_NO_SUCH_REGISTRATION,
            RouterError::NotFound(Lookup::Bridge { .. }) => ERROR_INVALID_ARGUMENT,
            RouterError::NotOwner => ERROR_NOT_AUTHORIZED,
            RouterError::ProcedureAlreadyExists(_) => ERROR_PROCEDURE_ALREADY_EXISTS,
            RouterError::NoSuchProcedure(_) => ERROR_NO_SUCH_PROCEDURE,
            RouterError::InvalidInvocation(_) => ERROR_INVALID_ARGUMENT,
            RouterError::InvalidUri(_) => ERROR_INVALID_URI,
            RouterError::DuplicateRequest(_) => ERROR_PROTOCOL_VIOLATION,
            RouterError::CalleeUnavailable(_) => ERROR_NO_AVAILABLE_CALLEE,
            RouterError::ModelAlreadyAttached(_) => ERROR_INVALID_ARGUMENT,
        }
    }
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::NotFound(Lookup::Subscription(id)) => {
                write!(f, "subscription {id} not found")
            }
            RouterError::NotFound(Lookup::Registration(id)) => {
                write!(f, "registration {id} not found")
            }
            RouterError::NotFound(Lookup::Bridge { uri, target_realm }) => {
                write!(f, "no bridge to realm {target_realm} on topic {uri}")
            }
            RouterError::NotOwner => write!(f, "session does not own this id"),
            RouterError::ProcedureAlreadyExists(uri) => {
                write!(f, "procedure {uri} already registered")
            }
            RouterError::NoSuchProcedure(uri) => write!(f, "no such procedure {uri}"),
            RouterError::InvalidInvocation(id) => write!(f, "invalid invocation {id}"),
            RouterError::InvalidUri(uri) => write!(f, "invalid uri {uri:?}"),
            RouterError::DuplicateRequest(id) => {
                write!(f, "request {id} already has a call in flight")
            }
            RouterError::CalleeUnavailable(uri) => {
                write!(f, "callee for {uri} could not be reached")
            }
            RouterError::ModelAlreadyAttached(uri) => {
                write!(f, "topic {uri} already owns a data model")
            }
        }
    }
}

impl Error for RouterError {}
