//! Identifiers written into the generated artifacts.
//!
//! Every field has a default, so a TOML file only needs to name what it
//! changes:
//!
//! ```toml
//! managed_namespace = "My.Interop"
//! wrapper_class = "EngineWrapper"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CodegenError;

const DEFAULT_LICENSE_HEADER: &str = "\
// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.";

/// Names and boilerplate used by both emitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Comment block at the top of each artifact; empty for none.
    pub license_header: String,
    pub managed_namespace: String,
    /// Partial class that owns the instance methods being exported.
    pub managed_class: String,
    /// Name of the method that builds the callback table.
    pub callbacks_method: String,
    pub native_include: String,
    /// Native type thrown when the managed side reports a failure.
    pub native_exception_type: String,
    pub callbacks_struct: String,
    pub wrapper_class: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            license_header: DEFAULT_LICENSE_HEADER.to_string(),
            managed_namespace: "Internal.JitInterface".to_string(),
            managed_class: "CorInfoImpl".to_string(),
            callbacks_method: "GetUnmanagedCallbacks".to_string(),
            native_include: "corinfoexception.h".to_string(),
            native_exception_type: "CorInfoException".to_string(),
            callbacks_struct: "JitInterfaceCallbacks".to_string(),
            wrapper_class: "JitInterfaceWrapper".to_string(),
        }
    }
}

impl EmitConfig {
    /// Read a TOML config file. Missing fields keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, CodegenError> {
        let content = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CodegenError::Config { message, .. } => CodegenError::Config {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CodegenError> {
        toml::from_str(content).map_err(|e| CodegenError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}
