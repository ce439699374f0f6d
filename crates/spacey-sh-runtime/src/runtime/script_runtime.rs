// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Entry point tying the sandbox and the loader together

use super::{RuntimeOptions, Sandbox};
use crate::error::{Result, ScriptError};
use crate::module_system::ModuleLoader;
use boa_engine::{JsValue, Source};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Runs scripts inside one sandbox
pub struct ScriptRuntime {
    loader: ModuleLoader,
    sandbox: Sandbox,
}

impl ScriptRuntime {
    /// Create the sandbox and the module loader.
    pub fn new(options: RuntimeOptions) -> Result<Self> {
        let mut sandbox = Sandbox::create(&options)?;
        let builtins = sandbox.builtins().clone();
        let stack = sandbox.stack().clone();
        let loader = ModuleLoader::new(builtins, stack, sandbox.context());
        Ok(Self { loader, sandbox })
    }

    /// The module loader of this runtime
    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    /// The sandbox every module runs in
    pub fn sandbox(&mut self) -> &mut Sandbox {
        &mut self.sandbox
    }

    /// Run `script` as the main module, then drain pending promise jobs.
    pub fn run_file(&mut self, script: &Path) -> Result<()> {
        let cwd = env::current_dir().map_err(|e| ScriptError::io(".", e))?;
        let filename = cwd.join(script);
        // Surface a missing main file as a typed error before any code runs.
        self.loader
            .resolver()
            .resolve_from_dir(&filename.to_string_lossy(), &cwd)?;
        info!(script = %filename.display(), "running script");

        let context = self.sandbox.context();
        let outcome = self.loader.require_main(&filename, context);
        context.run_jobs();
        outcome.map_err(|error| ScriptError::from_js(error, context))?;
        debug!(modules = self.loader.module_count(), "script finished");
        Ok(())
    }

    /// Evaluate `code` directly in the sandbox's global scope.
    pub fn eval(&mut self, code: &str) -> Result<JsValue> {
        let context = self.sandbox.context();
        context
            .eval(Source::from_bytes(code))
            .map_err(|error| ScriptError::from_js(error, context))
    }

    /// Evaluate `code` and convert the result with `ToString`.
    pub fn eval_to_string(&mut self, code: &str) -> Result<String> {
        let value = self.eval(code)?;
        let context = self.sandbox.context();
        value
            .to_string(context)
            .map(|text| text.to_std_string_escaped())
            .map_err(|error| ScriptError::from_js(error, context))
    }
}
