// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registration rules for algorithm names, versions and window types.
//!
//! The checks run in a fixed order and stop at the first violation:
//!
//! 1. **Algorithm name** is PascalCase (`^[A-Z][a-zA-Z0-9]*$`)
//! 2. **Algorithm version** is `MAJOR.MINOR.PATCH` without pre-release or build parts
//! 3. **Window name** is PascalCase
//! 4. **Window version** is `MAJOR.MINOR.PATCH`
//!
//! All functions here are pure; nothing is registered until every rule passes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::algorithm::AlgorithmSpec;
use crate::errors::{DescriptorField, ValidationError, ValidationRule};

static PASCAL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("PascalCase pattern is valid"));

static BASIC_SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$").expect("semver pattern is valid")
});

pub fn is_pascal_case(value: &str) -> bool {
    PASCAL_CASE.is_match(value)
}

pub fn is_basic_semver(value: &str) -> bool {
    BASIC_SEMVER.is_match(value)
}

/// Checks every registration rule against `spec`, failing on the first violation.
///
/// # Examples
///
/// ```
/// use orca_processor::algorithm::{validate_spec, AlgorithmSpec};
///
/// let ok = AlgorithmSpec::new("DataLoader", "1.0.0", "WindowA", "1.0.0");
/// assert!(validate_spec(&ok).is_ok());
///
/// let bad = AlgorithmSpec::new("DataLoader", "1.0.0-rc1", "WindowA", "1.0.0");
/// assert!(validate_spec(&bad).is_err());
/// ```
pub fn validate_spec(spec: &AlgorithmSpec) -> Result<(), ValidationError> {
    check(&spec.name, DescriptorField::AlgorithmName, ValidationRule::PascalCase)?;
    check(&spec.version, DescriptorField::AlgorithmVersion, ValidationRule::BasicSemver)?;
    check(&spec.window_name, DescriptorField::WindowName, ValidationRule::PascalCase)?;
    check(&spec.window_version, DescriptorField::WindowVersion, ValidationRule::BasicSemver)?;
    Ok(())
}

fn check(value: &str, field: DescriptorField, rule: ValidationRule) -> Result<(), ValidationError> {
    let matches = match rule {
        ValidationRule::PascalCase => is_pascal_case(value),
        ValidationRule::BasicSemver => is_basic_semver(value),
    };

    if matches {
        Ok(())
    } else {
        Err(ValidationError {
            field,
            value: value.to_string(),
            rule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_table() {
        let cases = vec![
            ("DataLoader", true),
            ("A", true),
            ("Model2", true),
            ("dataLoader", false),
            ("Data_Loader", false),
            ("Data-Loader", false),
            ("Data Loader", false),
            ("2Model", false),
            ("", false),
        ];

        for (value, expected) in cases {
            assert_eq!(is_pascal_case(value), expected, "value '{}'", value);
        }
    }

    #[test]
    fn test_basic_semver_table() {
        let cases = vec![
            ("1.0.0", true),
            ("0.0.0", true),
            ("10.20.30", true),
            ("1.0.0-rc1", false),
            ("1.0.0+build5", false),
            ("01.0.0", false),
            ("1.0", false),
            ("v1.0.0", false),
            ("1.0.0.0", false),
            ("", false),
        ];

        for (value, expected) in cases {
            assert_eq!(is_basic_semver(value), expected, "value '{}'", value);
        }
    }

    #[test]
    fn test_validate_spec_reports_first_violation() {
        struct TestCase {
            name: &'static str,
            spec: AlgorithmSpec,
            expected_field: Option<DescriptorField>,
        }

        let test_cases = vec![
            TestCase {
                name: "valid",
                spec: AlgorithmSpec::new("DataLoader", "1.0.0", "WindowA", "1.0.0"),
                expected_field: None,
            },
            TestCase {
                name: "snake case algorithm name",
                spec: AlgorithmSpec::new("data_loader", "1.0.0", "WindowA", "1.0.0"),
                expected_field: Some(DescriptorField::AlgorithmName),
            },
            TestCase {
                name: "pre-release algorithm version",
                spec: AlgorithmSpec::new("DataLoader", "1.0.0-rc1", "WindowA", "1.0.0"),
                expected_field: Some(DescriptorField::AlgorithmVersion),
            },
            TestCase {
                name: "lowercase window name",
                spec: AlgorithmSpec::new("DataLoader", "1.0.0", "windowA", "1.0.0"),
                expected_field: Some(DescriptorField::WindowName),
            },
            TestCase {
                name: "build suffix on window version",
                spec: AlgorithmSpec::new("DataLoader", "1.0.0", "WindowA", "1.0.0+7"),
                expected_field: Some(DescriptorField::WindowVersion),
            },
            TestCase {
                name: "every field invalid reports the name",
                spec: AlgorithmSpec::new("bad", "x", "bad", "y"),
                expected_field: Some(DescriptorField::AlgorithmName),
            },
        ];

        for test_case in test_cases {
            let result = validate_spec(&test_case.spec);
            match test_case.expected_field {
                None => assert!(result.is_ok(), "Test case '{}' should pass", test_case.name),
                Some(field) => {
                    let error = result.expect_err(test_case.name);
                    assert_eq!(error.field, field, "Test case '{}'", test_case.name);
                }
            }
        }
    }

    #[test]
    fn test_validation_error_message_names_field_and_rule() {
        let error = validate_spec(&AlgorithmSpec::new("DataLoader", "1.0", "WindowA", "1.0.0"))
            .unwrap_err();

        let message = error.to_string();
        assert!(message.starts_with("Version '1.0'"));
        assert!(message.contains("semantic versioning"));
    }
}
