// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::algorithm::WindowType;
use crate::proto::orca_v1;

/// A span of data time announced to the core.
///
/// The core triggers every algorithm bound to `window_type` for the range
/// `[time_from, time_to)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub time_from: u64,
    pub time_to: u64,
    pub window_type: WindowType,
    /// Free-form label of whatever produced the window
    pub origin: String,
}

impl Window {
    pub fn new(
        time_from: u64,
        time_to: u64,
        window_type: WindowType,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            time_from,
            time_to,
            window_type,
            origin: origin.into(),
        }
    }

    pub fn to_proto(&self) -> orca_v1::Window {
        orca_v1::Window {
            time_from: self.time_from,
            time_to: self.time_to,
            window_type_name: self.window_type.name.clone(),
            window_type_version: self.window_type.version.clone(),
            origin: self.origin.clone(),
        }
    }
}

impl From<Window> for orca_v1::Window {
    fn from(window: Window) -> Self {
        window.to_proto()
    }
}
