// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;

/// What an execution unit hands back.
///
/// The wire format only knows three success shapes, so outputs come from this
/// closed set. `Json` carries a dynamically shaped value that is dispatched
/// at marshalling time: objects become mappings, numbers become scalars,
/// all-numeric arrays become float lists, and anything else is wrapped as
/// `{"value": "<text>"}`. The order matters; an object always takes the
/// mapping branch.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmOutput {
    Mapping(Map<String, Value>),
    Scalar(f64),
    Values(Vec<f64>),
    Json(Value),
    /// The value could not be represented at all; marshals to a handled failure.
    Unconvertible(String),
}

impl AlgorithmOutput {
    /// Convert any `Serialize` value through its JSON form.
    ///
    /// Structs serialize to objects and therefore marshal as mappings.
    /// Serialization errors (non-string map keys, failing `Serialize` impls)
    /// are kept as `Unconvertible`.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => AlgorithmOutput::Json(json),
            Err(e) => AlgorithmOutput::Unconvertible(e.to_string()),
        }
    }

    /// Wrap an arbitrary displayable value, marshalled as `{"value": text}`.
    pub fn text(value: impl Display) -> Self {
        AlgorithmOutput::Json(Value::String(value.to_string()))
    }
}

impl From<f64> for AlgorithmOutput {
    fn from(value: f64) -> Self {
        AlgorithmOutput::Scalar(value)
    }
}

impl From<f32> for AlgorithmOutput {
    fn from(value: f32) -> Self {
        AlgorithmOutput::Scalar(f64::from(value))
    }
}

impl From<i64> for AlgorithmOutput {
    fn from(value: i64) -> Self {
        AlgorithmOutput::Scalar(value as f64)
    }
}

impl From<i32> for AlgorithmOutput {
    fn from(value: i32) -> Self {
        AlgorithmOutput::Scalar(f64::from(value))
    }
}

impl From<Vec<f64>> for AlgorithmOutput {
    fn from(values: Vec<f64>) -> Self {
        AlgorithmOutput::Values(values)
    }
}

impl From<Vec<i64>> for AlgorithmOutput {
    fn from(values: Vec<i64>) -> Self {
        AlgorithmOutput::Values(values.into_iter().map(|v| v as f64).collect())
    }
}

impl From<Map<String, Value>> for AlgorithmOutput {
    fn from(map: Map<String, Value>) -> Self {
        AlgorithmOutput::Mapping(map)
    }
}

impl From<Value> for AlgorithmOutput {
    fn from(value: Value) -> Self {
        AlgorithmOutput::Json(value)
    }
}
