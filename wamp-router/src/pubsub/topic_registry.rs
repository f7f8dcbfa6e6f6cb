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

//! Realm-scoped topic storage.

use crate::observability::{events, fields};
use crate::pubsub::topic::Topic;
use std::collections::HashMap;
use tracing::debug;

const COMPONENT: &str = "topic_registry";

/// realm -> uri -> topic. Topics are created on first use and kept for the process lifetime.
#[derive(Default)]
pub(crate) struct TopicRegistry {
    realms: HashMap<String, HashMap<String, Topic>>,
}

impl TopicRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn find_or_create(&mut self, realm: &str, uri: &str) -> &mut Topic {
        let topics = self.realms.entry(realm.to_string()).or_default();
        topics.entry(uri.to_string()).or_insert_with(|| {
            debug!(
                event = events::TOPIC_CREATE,
                component = COMPONENT,
                topic = %fields::topic_label(realm, uri),
                "created topic"
            );
            Topic::new(realm, uri)
        })
    }

    pub(crate) fn get(&self, realm: &str, uri: &str) -> Option<&Topic> {
        self.realms.get(realm).and_then(|topics| topics.get(uri))
    }

    pub(crate) fn get_mut(&mut self, realm: &str, uri: &str) -> Option<&mut Topic> {
        self.realms
            .get_mut(realm)
            .and_then(|topics| topics.get_mut(uri))
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.realms.values().map(HashMap::len).sum()
    }
}
