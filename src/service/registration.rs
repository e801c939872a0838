// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::algorithm::Registry;
use crate::config::ProcessorSettings;
use crate::proto::ProcessorRegistration;

/// How this processor introduces itself to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorIdentity {
    pub name: String,
    pub runtime: String,
    /// `host:port` the core dials for `ExecuteDagPart`
    pub connection_str: String,
}

impl ProcessorIdentity {
    pub fn new(
        name: impl Into<String>,
        runtime: impl Into<String>,
        connection_str: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            runtime: runtime.into(),
            connection_str: connection_str.into(),
        }
    }
}

impl From<&ProcessorSettings> for ProcessorIdentity {
    fn from(settings: &ProcessorSettings) -> Self {
        Self::new(
            settings.name.clone(),
            settings.runtime.clone(),
            settings.connection_str(),
        )
    }
}

/// Registration payload listing every algorithm in registration order.
///
/// Each dependency carries the name and runtime of the processor that owns
/// the producer, so the core can route across processors.
pub fn build_registration(registry: &Registry, identity: &ProcessorIdentity) -> ProcessorRegistration {
    let supported_algorithms = registry
        .all_descriptors()
        .map(|descriptor| {
            let mut algorithm = descriptor.to_proto();
            algorithm.dependencies = registry
                .dependencies_of(&descriptor.full_name())
                .iter()
                .map(|producer| producer.to_dependency_proto())
                .collect();
            algorithm
        })
        .collect();

    ProcessorRegistration {
        name: identity.name.clone(),
        runtime: identity.runtime.clone(),
        connection_str: identity.connection_str.clone(),
        supported_algorithms,
    }
}
