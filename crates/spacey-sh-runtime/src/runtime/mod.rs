// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Script runtime: sandbox construction and the run entry point

mod sandbox;
mod script_runtime;

pub use sandbox::Sandbox;
pub use script_runtime::ScriptRuntime;

use crate::command::ExecOptions;
use crate::error::{Result, ScriptError};
use std::path::{Path, PathBuf};

/// Runtime configuration
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Value of `process.argv`: runner, script path, then script arguments
    pub argv: Vec<String>,
    /// Options used by `exec` and `$`
    pub exec: ExecOptions,
}

impl RuntimeOptions {
    /// Options for running `script` with `args`.
    pub fn for_script(runner: impl Into<String>, script: &Path, args: &[String]) -> Self {
        let mut argv = vec![runner.into(), script.to_string_lossy().into_owned()];
        argv.extend(args.iter().cloned());
        Self {
            argv,
            ..Self::default()
        }
    }
}

/// The script to run, or [`ScriptError::Usage`] when none was given.
pub fn script_path(script: Option<&Path>) -> Result<PathBuf> {
    script.map(Path::to_path_buf).ok_or(ScriptError::Usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_script_is_usage_error() {
        let error = script_path(None).unwrap_err();
        assert!(matches!(error, ScriptError::Usage));
        assert_eq!(error.to_string(), "Please specify a file to run.");
        assert_eq!(script_path(Some(Path::new("a.js"))).unwrap(), PathBuf::from("a.js"));
    }

    #[test]
    fn test_argv_layout() {
        let options = RuntimeOptions::for_script("spacey-sh", Path::new("/s/run.js"), &["--fast".into()]);
        assert_eq!(options.argv, vec!["spacey-sh", "/s/run.js", "--fast"]);
        assert_eq!(options.exec, ExecOptions::default());
    }
}
