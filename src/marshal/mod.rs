// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conversion between algorithm outputs and wire results.
//!
//! Outgoing: an [`AlgorithmOutput`] is marshalled into exactly one populated
//! `Result` variant (scalar, float list, struct) or an explicit failure.
//! Incoming: upstream wire results are decoded back into [`DependencyValue`]s
//! by looking at which variant is populated.

mod codec;
mod dependency;
mod marshaller;
mod output;

pub use codec::{json_to_struct, json_to_value, struct_to_json, value_to_json};
pub use dependency::{DependencyValue, DependencyValues};
pub use marshaller::{
    decode, handled_failure, marshal, marshal_at, unhandled_failure, unix_timestamp, FailureDetail,
};
pub use output::AlgorithmOutput;
