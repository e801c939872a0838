// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while algorithms are being registered.
//!
//! Registration errors are synchronous and local: whoever is registering the
//! algorithm receives them directly and the registry is left untouched.

use std::fmt;
use thiserror::Error;

/// The descriptor field a registration rule was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorField {
    AlgorithmName,
    AlgorithmVersion,
    WindowName,
    WindowVersion,
}

impl fmt::Display for DescriptorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DescriptorField::AlgorithmName => "Algorithm name",
            DescriptorField::AlgorithmVersion => "Version",
            DescriptorField::WindowName => "Window name",
            DescriptorField::WindowVersion => "Window version",
        };
        f.write_str(label)
    }
}

/// The naming rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// `^[A-Z][a-zA-Z0-9]*$`
    PascalCase,
    /// `MAJOR.MINOR.PATCH` with no pre-release or build suffix
    BasicSemver,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::PascalCase => f.write_str("must be in PascalCase"),
            ValidationRule::BasicSemver => f.write_str(
                "must follow basic semantic versioning (e.g., '1.0.0') without release portions",
            ),
        }
    }
}

/// A descriptor field violated a naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} '{value}' {rule}")]
pub struct ValidationError {
    pub field: DescriptorField,
    pub value: String,
    pub rule: ValidationRule,
}

/// Errors that can occur while populating a [`Registry`](crate::algorithm::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A name or version field is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An algorithm with the same `name_version` key is already registered.
    #[error("Algorithm {full_name} already exists")]
    DuplicateName { full_name: String },

    /// A dependency was declared against an algorithm this registry never registered.
    #[error(
        "Cannot add `{dependency}` to the dependency stack of {consumer}. \
         All dependencies must be registered before they can be used as dependencies."
    )]
    UnknownDependency { consumer: String, dependency: String },

    /// Lookup of an unregistered algorithm.
    #[error("Algorithm {full_name} is not registered")]
    NotFound { full_name: String },
}
