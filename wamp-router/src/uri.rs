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

//! Loose WAMP URI validation: dot-separated, non-empty components without whitespace or `#`.

pub(crate) fn is_valid_uri(uri: &str) -> bool {
    !uri.is_empty()
        && uri.split('.').all(|component| {
            !component.is_empty()
                && !component
                    .chars()
                    .any(|ch| ch.is_whitespace() || ch == '#')
        })
}

#[cfg(test)]
mod tests {
    use super::is_valid_uri;

    #[test]
    fn accepts_dotted_and_single_component_uris() {
        assert!(is_valid_uri("com.example.topic"));
        assert!(is_valid_uri("my_rpc"));
        assert!(is_valid_uri("topicX"));
    }

    #[test]
    fn rejects_empty_components_whitespace_and_hash() {
        assert!(!is_valid_uri(""));
        assert!(!is_valid_uri("com..topic"));
        assert!(!is_valid_uri(".com.topic"));
        assert!(!is_valid_uri("com.topic."));
        assert!(!is_valid_uri("com.my topic"));
        assert!(!is_valid_uri("com.#.topic"));
    }
}
