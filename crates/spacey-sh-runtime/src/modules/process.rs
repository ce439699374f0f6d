// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `process` namespace

use crate::error::ScriptError;
use crate::interop::{self, js_str, string_arg};
use crate::modules::os;
use boa_engine::{Context, JsArgs, JsObject, JsResult, JsString, JsValue, NativeFunction};
use std::env;
use std::io::{self, Write};
use std::path::Path;

/// Create the process namespace object
pub fn create_module(argv: &[String], context: &mut Context) -> JsResult<JsObject> {
    let exports = JsObject::with_object_proto(context.intrinsics());

    let argv = interop::string_array(argv, context);
    interop::set(&exports, "argv", argv, context)?;

    let environment = JsObject::with_object_proto(context.intrinsics());
    for (key, value) in env::vars_os() {
        let key = key.to_string_lossy();
        let value = value.to_string_lossy();
        environment.set(JsString::from(key.as_ref()), js_str(&value), true, context)?;
    }
    interop::set(&exports, "env", environment, context)?;
    interop::set(&exports, "pid", std::process::id(), context)?;
    interop::set(&exports, "platform", js_str(os::platform()), context)?;
    interop::set(&exports, "arch", js_str(os::arch()), context)?;

    let functions: [(&str, usize, NativeFunction); 3] = [
        ("cwd", 0, NativeFunction::from_fn_ptr(js_cwd)),
        ("chdir", 1, NativeFunction::from_fn_ptr(js_chdir)),
        ("exit", 1, NativeFunction::from_fn_ptr(js_exit)),
    ];
    for (name, length, native) in functions {
        let function = interop::function(context, name, length, native);
        interop::set(&exports, name, function, context)?;
    }
    Ok(exports)
}

/// Current working directory
pub fn cwd() -> crate::Result<String> {
    env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .map_err(|e| ScriptError::io(".", e))
}

/// Change the process-wide working directory.
pub fn chdir(dir: &Path) -> crate::Result<()> {
    tracing::debug!(dir = %dir.display(), "chdir");
    env::set_current_dir(dir).map_err(|e| ScriptError::io(dir, e))
}

pub(crate) fn js_cwd(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let dir = cwd().map_err(|e| e.into_js_error(context))?;
    Ok(js_str(&dir))
}

pub(crate) fn js_chdir(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let dir = string_arg(args, 0, context)?;
    chdir(Path::new(&dir)).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

fn js_exit(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let code = match args.get_or_undefined(0) {
        value if value.is_undefined() => 0,
        value => value.to_i32(context)?,
    };
    tracing::debug!(code, "process.exit");
    // Nothing sensible is left to do if the final flush fails.
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;

    fn eval(code: &str, context: &mut Context) -> String {
        context
            .eval(Source::from_bytes(code))
            .unwrap()
            .to_string(context)
            .unwrap()
            .to_std_string_escaped()
    }

    #[test]
    fn test_process_object() {
        let mut context = Context::default();
        let argv = vec!["spacey-sh".to_string(), "/tmp/s.js".to_string(), "x".to_string()];
        let process = create_module(&argv, &mut context).unwrap();
        context
            .register_global_property(
                boa_engine::js_string!("process"),
                process,
                boa_engine::property::Attribute::all(),
            )
            .unwrap();

        assert_eq!(eval("process.argv.slice(2).join(',')", &mut context), "x");
        assert_eq!(eval("process.pid", &mut context), std::process::id().to_string());
        assert_eq!(eval("process.platform", &mut context), os::platform());
        assert_eq!(eval("typeof process.env", &mut context), "object");
        assert_eq!(eval("process.cwd()", &mut context), cwd().unwrap());
    }
}
