// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module execution inside the sandbox context

use boa_engine::{Context, JsNativeError, JsObject, JsResult, JsValue};
use std::path::Path;

/// Parameter names of the CommonJS wrapper function, in call order
pub const WRAPPER_PARAMETERS: [&str; 5] = ["exports", "require", "module", "__filename", "__dirname"];

/// Bindings handed to a module's wrapper function
#[derive(Debug, Clone)]
pub struct ModuleScope<'a> {
    /// `exports`, also used as `this`
    pub exports: JsValue,
    /// The module's private `require`
    pub require: JsObject,
    /// The module's `module` object
    pub module: JsObject,
    /// `__filename`
    pub filename: &'a Path,
    /// `__dirname`
    pub dirname: &'a Path,
}

/// Compile module source into the CommonJS wrapper function.
///
/// Goes through the realm's `Function` constructor rather than a nested
/// script evaluation, so compiling a child module while its parent is
/// still running leaves the parent's bindings alone. The constructor
/// closes the body on a fresh line, so a trailing line comment is harmless.
pub fn compile(source: &str, context: &mut Context) -> JsResult<JsObject> {
    let constructor = context.intrinsics().constructors().function().constructor();
    let mut args: Vec<JsValue> = WRAPPER_PARAMETERS
        .iter()
        .map(|name| crate::interop::js_str(name))
        .collect();
    args.push(crate::interop::js_str(source));
    constructor.construct(&args, None, context)
}

/// Compile `source` in `context` and run it for its effect on
/// `scope.module.exports`.
///
/// Free variables of the module resolve against the context's global
/// object, which is the sandbox shared by every module of the run.
/// Compile and runtime exceptions are returned as-is.
pub fn execute(source: &str, scope: ModuleScope<'_>, context: &mut Context) -> JsResult<()> {
    let compiled = compile(source, context)?;
    if !compiled.is_callable() {
        return Err(JsNativeError::typ()
            .with_message(format!(
                "module wrapper for {} did not compile to a function",
                scope.filename.display()
            ))
            .into());
    }

    let args = [
        scope.exports.clone(),
        scope.require.into(),
        scope.module.into(),
        crate::interop::js_str(&scope.filename.to_string_lossy()),
        crate::interop::js_str(&scope.dirname.to_string_lossy()),
    ];
    compiled.call(&scope.exports, &args, context)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::{js_string, JsString, NativeFunction};

    #[test]
    fn test_compile_declares_wrapper_parameters() {
        let mut context = Context::default();
        let function = compile("return 1;", &mut context).unwrap();
        let length = function.get(js_string!("length"), &mut context).unwrap();
        assert_eq!(length.to_number(&mut context).unwrap(), 5.0);
    }

    #[test]
    fn test_compile_survives_trailing_line_comment() {
        let mut context = Context::default();
        let function = compile("exports.ok = true; // trailing comment", &mut context).unwrap();
        assert!(function.is_callable());
    }

    #[test]
    fn test_compile_reports_syntax_errors() {
        let mut context = Context::default();
        assert!(compile("let = ;", &mut context).is_err());
    }

    #[test]
    fn test_execute_binds_scope() {
        let mut context = Context::default();
        let exports = JsObject::with_object_proto(context.intrinsics());
        let module = JsObject::with_object_proto(context.intrinsics());
        module
            .set(js_string!("exports"), exports.clone(), true, &mut context)
            .unwrap();
        let require: JsObject = crate::interop::function(
            &mut context,
            "require",
            1,
            NativeFunction::from_fn_ptr(|_, _, _| Ok(JsValue::undefined())),
        );

        let source = "exports.file = __filename; exports.dir = __dirname;\n\
                      exports.same = this === exports; module.exports.hasRequire = typeof require;";
        let scope = ModuleScope {
            exports: exports.clone().into(),
            require,
            module,
            filename: Path::new("/work/app.js"),
            dirname: Path::new("/work"),
        };
        execute(source, scope, &mut context).unwrap();

        let get = |key: &str, context: &mut Context| {
            exports
                .get(JsString::from(key), context)
                .unwrap()
                .to_string(context)
                .unwrap()
                .to_std_string_escaped()
        };
        assert_eq!(get("file", &mut context), "/work/app.js");
        assert_eq!(get("dir", &mut context), "/work");
        assert_eq!(get("same", &mut context), "true");
        assert_eq!(get("hasRequire", &mut context), "function");
    }

    #[test]
    fn test_execute_propagates_exceptions() {
        let mut context = Context::default();
        let exports = JsObject::with_object_proto(context.intrinsics());
        let module = JsObject::with_object_proto(context.intrinsics());
        let require = crate::interop::function(
            &mut context,
            "require",
            1,
            NativeFunction::from_fn_ptr(|_, _, _| Ok(JsValue::undefined())),
        );
        let scope = ModuleScope {
            exports: exports.into(),
            require,
            module,
            filename: Path::new("/work/boom.js"),
            dirname: Path::new("/work"),
        };
        let err = execute("throw new Error('boom');", scope, &mut context).unwrap_err();
        let message = err.to_opaque(&mut context).to_string(&mut context).unwrap();
        assert_eq!(message.to_std_string_escaped(), "Error: boom");
    }
}
