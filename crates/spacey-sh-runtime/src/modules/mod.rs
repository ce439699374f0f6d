// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Built-in namespaces
//!
//! The standard library available to every script, both as globals and
//! through `require("fs")` / `require("node:fs")`.

pub mod assert;
pub mod fs;
pub mod os;
pub mod path;
pub mod process;

use crate::interop;
use boa_engine::{Context, JsObject, JsResult};

/// Names of every built-in namespace
pub const BUILTIN_MODULES: &[&str] = &["assert", "fs", "os", "path", "process"];

/// Whether a built-in is also installed as a sandbox global.
///
/// Internal (`_`-prefixed) names, path-like names and the `sys` alias stay
/// reachable only through `require`.
pub fn is_exposed_global(name: &str) -> bool {
    !name.starts_with('_') && !name.contains('/') && name != "sys"
}

/// Build the namespace table: one object per built-in, keyed by name.
pub fn create_builtins(argv: &[String], context: &mut Context) -> JsResult<JsObject> {
    let table = JsObject::with_null_proto();
    for name in BUILTIN_MODULES {
        let module = match *name {
            "assert" => assert::create_module(context)?,
            "fs" => fs::create_module(context)?,
            "os" => os::create_module(context)?,
            "path" => path::create_module(context)?,
            "process" => process::create_module(argv, context)?,
            _ => continue,
        };
        interop::set(&table, name, module, context)?;
    }
    Ok(table)
}
