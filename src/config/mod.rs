// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod settings;

pub mod consts;

pub use consts::DEFAULT_MAX_WORKERS;
pub use settings::{load_settings, ProcessorSettings};
