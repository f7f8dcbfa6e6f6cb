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

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) router: RouterConfig,
    pub(crate) realms: Vec<RealmConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    pub(crate) name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RealmConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) models: Vec<ModelConfig>,
    #[serde(default)]
    pub(crate) bridges: Vec<BridgeConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub(crate) uri: String,
    pub(crate) kind: ModelKind,
    #[serde(default)]
    pub(crate) initial: Option<Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    BasicText,
    BasicList,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    pub(crate) uri: String,
    pub(crate) target_realm: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(json5::Error),
    DuplicateRealm(String),
    UnknownTargetRealm { realm: String, target_realm: String },
    SelfBridge { realm: String, uri: String },
    BridgeCycle { realm: String, uri: String },
    InvalidInitialValue { uri: String, kind: ModelKind },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(err) => write!(f, "unable to read config file: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse config file: {err}"),
            ConfigError::DuplicateRealm(realm) => write!(f, "realm {realm} declared twice"),
            ConfigError::UnknownTargetRealm {
                realm,
                target_realm,
            } => write!(f, "realm {realm} bridges to undeclared realm {target_realm}"),
            ConfigError::SelfBridge { realm, uri } => {
                write!(f, "topic {uri} in realm {realm} bridges to its own realm")
            }
            ConfigError::BridgeCycle { realm, uri } => {
                write!(f, "bridges for topic {uri} lead from realm {realm} back to itself")
            }
            ConfigError::InvalidInitialValue { uri, kind } => {
                write!(f, "initial value of {uri} does not fit model kind {kind:?}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Read(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = json5::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut realms = HashSet::new();
        for realm in &self.realms {
            if !realms.insert(realm.name.as_str()) {
                return Err(ConfigError::DuplicateRealm(realm.name.clone()));
            }
        }

        for realm in &self.realms {
            for model in &realm.models {
                let fits = match (model.kind, &model.initial) {
                    (_, None) => true,
                    (ModelKind::BasicText, Some(value)) => value.is_string(),
                    (ModelKind::BasicList, Some(value)) => value.is_array(),
                };
                if !fits {
                    return Err(ConfigError::InvalidInitialValue {
                        uri: model.uri.clone(),
                        kind: model.kind,
                    });
                }
            }

            for bridge in &realm.bridges {
                if bridge.target_realm == realm.name {
                    return Err(ConfigError::SelfBridge {
                        realm: realm.name.clone(),
                        uri: bridge.uri.clone(),
                    });
                }
                if !realms.contains(bridge.target_realm.as_str()) {
                    return Err(ConfigError::UnknownTargetRealm {
                        realm: realm.name.clone(),
                        target_realm: bridge.target_realm.clone(),
                    });
                }
            }
        }

        if let Some((realm, uri)) = self.find_bridge_cycle() {
            return Err(ConfigError::BridgeCycle {
                realm: realm.to_string(),
                uri: uri.to_string(),
            });
        }
        Ok(())
    }

    /// First `(realm, uri)` whose bridges for `uri` lead back to `realm`.
    fn find_bridge_cycle(&self) -> Option<(&str, &str)> {
        let mut graphs: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();
        for realm in &self.realms {
            for bridge in &realm.bridges {
                graphs
                    .entry(bridge.uri.as_str())
                    .or_default()
                    .entry(realm.name.as_str())
                    .or_default()
                    .push(bridge.target_realm.as_str());
            }
        }

        for (uri, graph) in &graphs {
            for (start, targets) in graph {
                let mut pending = targets.clone();
                let mut visited = HashSet::new();
                while let Some(realm) = pending.pop() {
                    if realm == *start {
                        return Some((*start, *uri));
                    }
                    if visited.insert(realm) {
                        if let Some(next) = graph.get(realm) {
                            pending.extend(next.iter().copied());
                        }
                    }
                }
            }
        }
        None
    }
}
