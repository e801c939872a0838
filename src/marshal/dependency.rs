// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::algorithm::AlgorithmRef;

/// A decoded upstream result, shaped by the wire variant it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum DependencyValue {
    Scalar(f64),
    Values(Vec<f64>),
    Mapping(Map<String, Value>),
    /// The upstream result carried no success payload (failed or unset).
    Empty,
}

impl DependencyValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            DependencyValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            DependencyValue::Values(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            DependencyValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DependencyValue::Empty)
    }

    pub fn to_json(&self) -> Value {
        match self {
            DependencyValue::Scalar(value) => {
                serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number)
            }
            DependencyValue::Values(values) => Value::Array(
                values
                    .iter()
                    .map(|v| serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number))
                    .collect(),
            ),
            DependencyValue::Mapping(map) => Value::Object(map.clone()),
            DependencyValue::Empty => Value::Null,
        }
    }
}

/// Upstream results for one batch, keyed by producer `full_name`.
///
/// Every algorithm in the batch sees the same map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyValues(HashMap<String, DependencyValue>);

impl DependencyValues {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, full_name: impl Into<String>, value: DependencyValue) {
        self.0.insert(full_name.into(), value);
    }

    /// Look up by `name_version`.
    pub fn get(&self, full_name: &str) -> Option<&DependencyValue> {
        self.0.get(full_name)
    }

    pub fn get_algorithm(&self, name: &str, version: &str) -> Option<&DependencyValue> {
        self.get(&AlgorithmRef::new(name, version).full_name())
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.0.contains_key(full_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DependencyValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, DependencyValue>> for DependencyValues {
    fn from(values: HashMap<String, DependencyValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<(String, DependencyValue)> for DependencyValues {
    fn from_iter<I: IntoIterator<Item = (String, DependencyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
