// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The sandbox context shared by every module of a run

use super::RuntimeOptions;
use crate::error::{Result, ScriptError};
use crate::globals;
use crate::module_system::ExecutionStack;
use crate::modules::{self, BUILTIN_MODULES};
use boa_engine::property::Attribute;
use boa_engine::{js_string, Context, JsObject, JsResult, JsString, JsValue};

/// One global namespace for the whole run.
///
/// Created once, before any module executes, and never reset. Module code
/// is compiled against this context, so a global set by one module is
/// visible to every module loaded after it.
pub struct Sandbox {
    context: Context,
    builtins: JsObject,
    stack: ExecutionStack,
}

impl Sandbox {
    /// Build the context and install built-in namespaces, convenience
    /// globals, `console` and the `global` alias.
    pub fn create(options: &RuntimeOptions) -> Result<Self> {
        let mut context = Context::default();
        let stack = ExecutionStack::default();
        let builtins = populate(&mut context, &stack, options)
            .map_err(|error| ScriptError::from_js(error, &mut context))?;
        tracing::debug!(builtins = BUILTIN_MODULES.len(), "sandbox created");
        Ok(Self {
            context,
            builtins,
            stack,
        })
    }

    /// The engine context
    pub fn context(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Namespace table used by `require` for built-in names
    pub fn builtins(&self) -> &JsObject {
        &self.builtins
    }

    /// Modules currently running their top-level code
    pub fn stack(&self) -> &ExecutionStack {
        &self.stack
    }

    /// Read a global of the sandbox.
    pub fn global(&mut self, name: &str) -> JsResult<JsValue> {
        self.context
            .global_object()
            .get(JsString::from(name), &mut self.context)
    }
}

fn populate(context: &mut Context, stack: &ExecutionStack, options: &RuntimeOptions) -> JsResult<JsObject> {
    let builtins = modules::create_builtins(&options.argv, context)?;
    for name in BUILTIN_MODULES.iter().copied().filter(|name| modules::is_exposed_global(name)) {
        let namespace = builtins.get(JsString::from(name), context)?;
        context.register_global_property(JsString::from(name), namespace, Attribute::all())?;
    }

    globals::install(context, stack, &options.exec)?;

    let global = context.global_object();
    context.register_global_property(js_string!("global"), global, Attribute::all())?;
    Ok(builtins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals_installed() {
        let mut sandbox = Sandbox::create(&RuntimeOptions::default()).unwrap();
        for name in BUILTIN_MODULES.iter().chain(globals::GLOBAL_NAMES) {
            let value = sandbox.global(name).unwrap();
            assert!(!value.is_undefined(), "{name} is not installed");
        }
        assert!(sandbox.global("global").unwrap().is_object());
    }

    #[test]
    fn test_builtin_global_is_table_entry() {
        let mut sandbox = Sandbox::create(&RuntimeOptions::default()).unwrap();
        let from_global = sandbox.global("fs").unwrap();
        let builtins = sandbox.builtins().clone();
        let from_table = builtins.get(js_string!("fs"), sandbox.context()).unwrap();
        assert!(from_global.strict_equals(&from_table));
    }
}
