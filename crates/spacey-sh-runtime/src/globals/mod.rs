// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Convenience globals
//!
//! Installs the shell-style helpers every script sees: `echo`, `exec`,
//! `$`, `absPath`, `readFile`, `writeFile`, `rm`, `cd`, `pwd`,
//! `objToArgs`, `glob`, `quote` and `console`.

pub mod console;
mod exec;
pub mod helpers;

use crate::command::ExecOptions;
use crate::interop;
use crate::module_system::ExecutionStack;
use crate::modules::process;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsResult, JsString, JsValue, NativeFunction};

/// Names installed by [`install`]
pub const GLOBAL_NAMES: &[&str] = &[
    "console", "echo", "exec", "$", "absPath", "readFile", "writeFile", "rm", "cd", "pwd",
    "objToArgs", "glob", "quote",
];

/// Install the convenience globals into `context`.
///
/// `stack` backs `absPath()`; `options` configures `exec` (and `$`, which
/// forces quiet mode).
pub fn install(context: &mut Context, stack: &ExecutionStack, options: &ExecOptions) -> JsResult<()> {
    let console = console::create_console_object(context)?;
    define(context, "console", console.into())?;

    let functions: [(&str, usize, NativeFunction); 12] = [
        ("echo", 0, NativeFunction::from_fn_ptr(console::log)),
        (
            "exec",
            0,
            NativeFunction::from_copy_closure_with_captures(
                exec::js_exec,
                exec::ExecCapture {
                    options: options.clone(),
                },
            ),
        ),
        (
            "$",
            0,
            NativeFunction::from_copy_closure_with_captures(
                exec::js_exec,
                exec::ExecCapture {
                    options: options.quiet(),
                },
            ),
        ),
        (
            "absPath",
            2,
            NativeFunction::from_copy_closure_with_captures(
                helpers::js_abs_path,
                helpers::CallerStack {
                    stack: stack.clone(),
                },
            ),
        ),
        ("readFile", 1, NativeFunction::from_fn_ptr(helpers::js_read_file)),
        ("writeFile", 2, NativeFunction::from_fn_ptr(helpers::js_write_file)),
        ("rm", 0, NativeFunction::from_fn_ptr(helpers::js_rm)),
        ("cd", 1, NativeFunction::from_fn_ptr(process::js_chdir)),
        ("pwd", 0, NativeFunction::from_fn_ptr(process::js_cwd)),
        ("objToArgs", 2, NativeFunction::from_fn_ptr(exec::js_obj_to_args)),
        ("glob", 1, NativeFunction::from_fn_ptr(helpers::js_glob)),
        ("quote", 1, NativeFunction::from_fn_ptr(helpers::js_quote)),
    ];
    for (name, length, native) in functions {
        let function = interop::function(context, name, length, native);
        define(context, name, function.into())?;
    }
    Ok(())
}

fn define(context: &mut Context, name: &str, value: JsValue) -> JsResult<()> {
    context.register_global_property(JsString::from(name), value, Attribute::all())
}
