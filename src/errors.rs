//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiPrompt.
//! The ZiPrompt project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # ZiPrompt Error Module
//!
//! This module defines the error types used throughout ZiPrompt.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem and network errors
//! - **Configuration**: Structurally invalid configuration (missing exemplar
//!   fields, unsupported keyboard layout, unknown axis type)
//! - **Validation**: Parameters outside their accepted range
//! - **ExternalService**: Failures of the completion service
//! - **Axis**: Errors raised while an axis augments a prompt, tagged with the axis
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures
//!
//! Data-quality problems (empty pools, single documents, empty strings) are
//! never errors. External service failures are produced by completion services
//! but recovered inside the axes that call them.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout ZiPrompt.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for ZiPrompt.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem or network IO.
    #[error("io error: {0}")]
    Io(String),

    /// Malformed input contract, raised immediately and never retried.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Any failure reported by an external completion service.
    #[error("external service '{service}' failed: {message}")]
    ExternalService { service: String, message: String },

    /// Failures raised while an axis augments a prompt.
    #[error("axis '{axis}' failed: {message}")]
    Axis { axis: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct configuration errors.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        ZiError::Configuration {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct completion service errors.
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Helper to construct axis errors.
    pub fn axis(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Axis {
            axis: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }

    /// Whether the error stems from configuration rather than runtime failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ZiError::Configuration { .. } | ZiError::Validation { .. }
        )
    }
}
