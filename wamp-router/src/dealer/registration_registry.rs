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

//! Procedure registrations: one active record per `(realm, uri)` plus orphaned records.

use crate::error::{Lookup, RouterError};
use crate::id_allocator::IdAllocator;
use crate::message::{Options, RegistrationId};
use crate::session::{SessionHandle, SessionId};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ProcedureKey {
    pub(crate) realm: String,
    pub(crate) uri: String,
}

impl ProcedureKey {
    pub(crate) fn new(realm: &str, uri: &str) -> Self {
        Self {
            realm: realm.to_string(),
            uri: uri.to_string(),
        }
    }
}

/// How a registration reacts to a later `provide` of the same procedure.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InvocationPolicy {
    /// A later provide fails while this registration is active.
    #[default]
    Single,
    /// A later provide with `{"invoke": "replace"}` supersedes whatever is active.
    Replace,
}

impl InvocationPolicy {
    pub fn from_options(options: &Options) -> Self {
        match options.get("invoke").and_then(Value::as_str) {
            Some("replace") => InvocationPolicy::Replace,
            _ => InvocationPolicy::Single,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Registration {
    pub(crate) id: RegistrationId,
    pub(crate) key: ProcedureKey,
    pub(crate) owner: SessionHandle,
    pub(crate) policy: InvocationPolicy,
}

/// Result of a successful provide.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Provided {
    pub(crate) registration_id: RegistrationId,
    pub(crate) superseded: Option<RegistrationId>,
}

#[derive(Default)]
pub(crate) struct RegistrationRegistry {
    active: HashMap<ProcedureKey, RegistrationId>,
    records: HashMap<RegistrationId, Registration>,
}

impl RegistrationRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a registration. Ids are only allocated on success.
    pub(crate) fn provide(
        &mut self,
        key: ProcedureKey,
        owner: SessionHandle,
        policy: InvocationPolicy,
        ids: &IdAllocator,
    ) -> Result<Provided, RouterError> {
        let superseded = self.active.get(&key).copied();
        if superseded.is_some() && policy != InvocationPolicy::Replace {
            return Err(RouterError::ProcedureAlreadyExists(key.uri));
        }

        let registration_id = ids.next_id();
        self.active.insert(key.clone(), registration_id);
        self.records.insert(
            registration_id,
            Registration {
                id: registration_id,
                key,
                owner,
                policy,
            },
        );
        Ok(Provided {
            registration_id,
            superseded,
        })
    }

    pub(crate) fn active(&self, key: &ProcedureKey) -> Option<&Registration> {
        self.active.get(key).and_then(|id| self.records.get(id))
    }

    pub(crate) fn is_active(&self, registration_id: RegistrationId) -> bool {
        self.records
            .get(&registration_id)
            .is_some_and(|record| self.active.get(&record.key) == Some(&registration_id))
    }

    /// Removes a record owned by `session_id`, clearing the active slot if it held it.
    pub(crate) fn remove(
        &mut self,
        registration_id: RegistrationId,
        session_id: SessionId,
    ) -> Result<Registration, RouterError> {
        let Some(record) = self.records.get(&registration_id) else {
            return Err(RouterError::NotFound(Lookup::Registration(registration_id)));
        };
        if record.owner.id() != session_id {
            return Err(RouterError::NotOwner);
        }
        let record = self
            .records
            .remove(&registration_id)
            .ok_or(RouterError::NotFound(Lookup::Registration(registration_id)))?;
        self.clear_active(&record);
        Ok(record)
    }

    /// Removes every record owned by `session_id`, active or orphaned.
    pub(crate) fn remove_session(&mut self, session_id: SessionId) -> Vec<Registration> {
        let mut owned: Vec<RegistrationId> = self
            .records
            .values()
            .filter(|record| record.owner.id() == session_id)
            .map(|record| record.id)
            .collect();
        owned.sort_unstable();

        let removed: Vec<Registration> = owned
            .into_iter()
            .filter_map(|id| self.records.remove(&id))
            .collect();
        for record in &removed {
            self.clear_active(record);
        }
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    fn clear_active(&mut self, record: &Registration) {
        if self.active.get(&record.key) == Some(&record.id) {
            self.active.remove(&record.key);
        }
    }
}
