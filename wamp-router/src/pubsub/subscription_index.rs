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

//! Reverse index from subscription id to its topic and owning session.

use crate::message::SubscriptionId;
use crate::session::SessionId;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SubscriptionRecord {
    pub(crate) realm: String,
    pub(crate) uri: String,
    pub(crate) session_id: SessionId,
}

#[derive(Default)]
pub(crate) struct SubscriptionIndex {
    by_id: HashMap<SubscriptionId, SubscriptionRecord>,
    by_session: HashMap<SessionId, BTreeSet<SubscriptionId>>,
}

impl SubscriptionIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, subscription_id: SubscriptionId, record: SubscriptionRecord) {
        self.by_session
            .entry(record.session_id)
            .or_default()
            .insert(subscription_id);
        self.by_id.insert(subscription_id, record);
    }

    pub(crate) fn get(&self, subscription_id: SubscriptionId) -> Option<&SubscriptionRecord> {
        self.by_id.get(&subscription_id)
    }

    pub(crate) fn remove(&mut self, subscription_id: SubscriptionId) -> Option<SubscriptionRecord> {
        let record = self.by_id.remove(&subscription_id)?;
        if let Some(owned) = self.by_session.get_mut(&record.session_id) {
            owned.remove(&subscription_id);
            if owned.is_empty() {
                self.by_session.remove(&record.session_id);
            }
        }
        Some(record)
    }

    /// Drops every subscription owned by `session_id`, in id order.
    pub(crate) fn remove_session(
        &mut self,
        session_id: SessionId,
    ) -> Vec<(SubscriptionId, SubscriptionRecord)> {
        let Some(owned) = self.by_session.remove(&session_id) else {
            return Vec::new();
        };
        owned
            .into_iter()
            .filter_map(|id| self.by_id.remove(&id).map(|record| (id, record)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{SubscriptionIndex, SubscriptionRecord};

    fn record(session_id: u64) -> SubscriptionRecord {
        SubscriptionRecord {
            realm: "realm1".to_string(),
            uri: "topicX".to_string(),
            session_id,
        }
    }

    #[test]
    fn remove_session_only_drops_owned_entries() {
        let mut index = SubscriptionIndex::new();
        index.insert(1, record(10));
        index.insert(2, record(20));
        index.insert(3, record(10));

        let removed = index.remove_session(10);

        assert_eq!(
            removed.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(index.len(), 1);
        assert!(index.remove_session(10).is_empty());
        assert_eq!(index.get(2), Some(&record(20)));
    }

    #[test]
    fn remove_clears_session_bucket() {
        let mut index = SubscriptionIndex::new();
        index.insert(5, record(10));

        assert_eq!(index.remove(5), Some(record(10)));
        assert_eq!(index.remove(5), None);
        assert!(index.remove_session(10).is_empty());
    }
}
