// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the script runner

use boa_engine::{js_string, Context, JsError, JsNativeError, JsString};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for script runner operations
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors that can occur while loading or running a script
#[derive(Debug, Error)]
pub enum ScriptError {
    /// No script was given on the command line
    #[error("Please specify a file to run.")]
    Usage,

    /// No file matched a `require()` specifier
    #[error("Cannot find module '{specifier}' from '{}'", .from.display())]
    ModuleNotFound {
        /// The specifier as written by the caller
        specifier: String,
        /// Directory the specifier was resolved against
        from: PathBuf,
    },

    /// A file matched but cannot be loaded
    #[error("Error resolving module '{module}': {reason}")]
    Resolution {
        /// Module specifier or path
        module: String,
        /// Reason for failure
        reason: String,
    },

    /// File system error
    #[error("{source}, '{}'", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A `.json` module failed to parse
    #[error("{}: {source}", .path.display())]
    Json {
        /// Path of the JSON module
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// The shell process could not be started
    #[error("spawnSync {shell} failed: {source}")]
    Spawn {
        /// Shell binary
        shell: String,
        /// Underlying error
        source: io::Error,
    },

    /// Captured output went past the configured buffer limit
    #[error("stdout maxBuffer length exceeded ({limit} bytes)")]
    OutputLimit {
        /// Limit in bytes
        limit: usize,
    },

    /// Uncaught exception raised by script code
    #[error("{0}")]
    Script(String),
}

impl ScriptError {
    /// Create a file system error for `path`
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a module not found error
    pub fn module_not_found(specifier: impl Into<String>, from: impl AsRef<Path>) -> Self {
        Self::ModuleNotFound {
            specifier: specifier.into(),
            from: from.as_ref().to_path_buf(),
        }
    }

    /// Node.js style `code` attached to the JavaScript error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usage => "ERR_USAGE",
            Self::ModuleNotFound { .. } => "MODULE_NOT_FOUND",
            Self::Resolution { .. } => "ERR_UNSUPPORTED_MODULE",
            Self::Io { source, .. } | Self::Spawn { source, .. } => io_code(source),
            Self::Json { .. } => "ERR_INVALID_JSON",
            Self::OutputLimit { .. } => "ENOBUFS",
            Self::Script(_) => "ERR_SCRIPT",
        }
    }

    /// Convert into a throwable JavaScript `Error` carrying a `code` property.
    pub fn into_js_error(self, context: &mut Context) -> JsError {
        let code = self.code();
        let native = JsNativeError::error().with_message(self.to_string());
        let error = JsError::from(native).to_opaque(context);
        if let Some(object) = error.as_object() {
            // A failed define leaves a plain Error, which is still throwable.
            let _ = object.set(js_string!("code"), JsString::from(code), false, context);
        }
        JsError::from_opaque(error)
    }

    /// Render an uncaught JavaScript exception for the top-level report.
    pub fn from_js(error: JsError, context: &mut Context) -> Self {
        let value = error.to_opaque(context);
        if let Some(object) = value.as_object() {
            if let Ok(stack) = object.get(js_string!("stack"), context) {
                if let Some(stack) = stack.as_string() {
                    return Self::Script(stack.to_std_string_escaped());
                }
            }
        }
        let rendered = value
            .to_string(context)
            .map(|text| text.to_std_string_escaped())
            .unwrap_or_else(|_| error.to_string());
        Self::Script(rendered)
    }
}

fn io_code(error: &io::Error) -> &'static str {
    match error.kind() {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::AlreadyExists => "EEXIST",
        io::ErrorKind::InvalidInput => "EINVAL",
        io::ErrorKind::InvalidData => "EILSEQ",
        io::ErrorKind::IsADirectory => "EISDIR",
        io::ErrorKind::NotADirectory => "ENOTDIR",
        io::ErrorKind::DirectoryNotEmpty => "ENOTEMPTY",
        _ => "EIO",
    }
}
