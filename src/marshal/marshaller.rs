// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The result marshaller and its inverse.
//!
//! Dispatch order for [`AlgorithmOutput::Json`] values:
//!
//! 1. object -> `struct_value`
//! 2. number -> `single_value`
//! 3. array whose every element is a number -> `float_values`
//! 4. anything else -> `struct_value` of `{"value": <text>}`
//!
//! Typed outputs (`Mapping`, `Scalar`, `Values`) go straight to their variant.
//! `Unconvertible` becomes a handled failure with no payload other than the
//! error detail. Every result is stamped with the current time in whole seconds.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use crate::marshal::codec::{json_to_struct, struct_to_json};
use crate::marshal::{AlgorithmOutput, DependencyValue};
use crate::proto::orca_v1::result::ResultData;
use crate::proto::orca_v1::{ErrorDetail, FloatArray, Result as WireResult, ResultStatus};

/// Key used when a value can only be carried as text.
const FALLBACK_KEY: &str = "value";

/// Message and trace of a failed algorithm, as placed on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub message: String,
    pub trace: String,
}

impl FailureDetail {
    /// Message from the alternate form (`outer: inner`), trace from the debug
    /// form, which lists the context chain and a backtrace when captured.
    pub fn from_error(error: &anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", error),
            trace: format!("{:?}", error),
        }
    }

    /// A failure with no trace to report.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: String::new(),
        }
    }
}

/// Seconds since the Unix epoch.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Marshal an output, stamped with the current time.
pub fn marshal(output: AlgorithmOutput) -> WireResult {
    marshal_at(output, unix_timestamp())
}

/// Marshal an output with an explicit timestamp.
pub fn marshal_at(output: AlgorithmOutput, timestamp: i64) -> WireResult {
    let data = match output {
        AlgorithmOutput::Mapping(map) => ResultData::StructValue(json_to_struct(&map)),
        AlgorithmOutput::Scalar(value) => ResultData::SingleValue(value),
        AlgorithmOutput::Values(values) => ResultData::FloatValues(FloatArray { values }),
        AlgorithmOutput::Json(value) => dispatch_json(value),
        AlgorithmOutput::Unconvertible(reason) => {
            return handled_failure(format!("Failed to convert result: {}", reason), timestamp)
        }
    };

    WireResult {
        status: ResultStatus::Succeeded as i32,
        timestamp,
        result_data: Some(data),
    }
}

fn dispatch_json(value: Value) -> ResultData {
    match value {
        Value::Object(map) => ResultData::StructValue(json_to_struct(&map)),
        Value::Number(n) => match n.as_f64() {
            Some(scalar) => ResultData::SingleValue(scalar),
            None => fallback(Value::Number(n)),
        },
        Value::Array(items) if items.iter().all(Value::is_number) => {
            let values = items.iter().filter_map(Value::as_f64).collect();
            ResultData::FloatValues(FloatArray { values })
        }
        other => fallback(other),
    }
}

fn fallback(value: Value) -> ResultData {
    let text = match value {
        Value::String(s) => s,
        other => other.to_string(),
    };
    let mut map = Map::new();
    map.insert(FALLBACK_KEY.to_string(), Value::String(text));
    ResultData::StructValue(json_to_struct(&map))
}

/// The result could not be represented on the wire.
pub fn handled_failure(message: impl Into<String>, timestamp: i64) -> WireResult {
    WireResult {
        status: ResultStatus::HandledFailed as i32,
        timestamp,
        result_data: Some(ResultData::Error(ErrorDetail {
            message: message.into(),
            trace: String::new(),
        })),
    }
}

/// The algorithm itself failed.
pub fn unhandled_failure(detail: FailureDetail, timestamp: i64) -> WireResult {
    WireResult {
        status: ResultStatus::UnhandledFailed as i32,
        timestamp,
        result_data: Some(ResultData::Error(ErrorDetail {
            message: detail.message,
            trace: detail.trace,
        })),
    }
}

/// Inverse of [`marshal`], used for upstream results.
///
/// The populated variant decides the shape; failures and unset payloads
/// decode to [`DependencyValue::Empty`].
///
/// A mapping does not always survive a round trip under `Value` equality:
/// integral floats such as `101.0` decode as the integer `101`.
pub fn decode(result: &WireResult) -> DependencyValue {
    match &result.result_data {
        Some(ResultData::SingleValue(value)) => DependencyValue::Scalar(*value),
        Some(ResultData::FloatValues(array)) => DependencyValue::Values(array.values.clone()),
        Some(ResultData::StructValue(s)) => DependencyValue::Mapping(struct_to_json(s)),
        Some(ResultData::Error(_)) | None => DependencyValue::Empty,
    }
}
