// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `os` namespace

use crate::interop::{self, js_str};
use boa_engine::{Context, JsObject, JsResult, JsValue, NativeFunction};
use std::env;

/// End-of-line marker
pub const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Create the os namespace object
pub fn create_module(context: &mut Context) -> JsResult<JsObject> {
    let exports = JsObject::with_object_proto(context.intrinsics());
    interop::set(&exports, "EOL", js_str(EOL), context)?;

    let functions: [(&str, NativeFunction); 6] = [
        ("platform", NativeFunction::from_fn_ptr(|_, _, _| Ok(js_str(platform())))),
        ("arch", NativeFunction::from_fn_ptr(|_, _, _| Ok(js_str(arch())))),
        ("type", NativeFunction::from_fn_ptr(|_, _, _| Ok(js_str(os_type())))),
        ("homedir", NativeFunction::from_fn_ptr(|_, _, _| Ok(js_str(&homedir())))),
        ("tmpdir", NativeFunction::from_fn_ptr(|_, _, _| Ok(js_str(&tmpdir())))),
        ("hostname", NativeFunction::from_fn_ptr(js_hostname)),
    ];
    for (name, native) in functions {
        let function = interop::function(context, name, 0, native);
        interop::set(&exports, name, function, context)?;
    }
    Ok(exports)
}

/// Platform name as Node.js reports it (`linux`, `darwin`, `win32`, ...)
pub fn platform() -> &'static str {
    match env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// CPU architecture as Node.js reports it (`x64`, `arm64`, ...)
pub fn arch() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Operating system name as returned by `uname`
pub fn os_type() -> &'static str {
    match env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows_NT",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

/// Home directory of the current user, empty when unknown
pub fn homedir() -> String {
    dirs::home_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory for temporary files, without a trailing separator
pub fn tmpdir() -> String {
    let dir = env::temp_dir().to_string_lossy().into_owned();
    match dir.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => dir,
    }
}

/// Host name of the machine
pub fn hostname() -> std::io::Result<String> {
    let name = nix::unistd::gethostname()?;
    Ok(name.to_string_lossy().into_owned())
}

fn js_hostname(_this: &JsValue, _args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let name = hostname()
        .map_err(|e| crate::error::ScriptError::io("hostname", e).into_js_error(context))?;
    Ok(js_str(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names() {
        assert!(!platform().is_empty());
        assert_ne!(platform(), "macos");
        assert_ne!(arch(), "x86_64");
        assert_ne!(arch(), "aarch64");
    }

    #[test]
    fn test_tmpdir_has_no_trailing_separator() {
        let dir = tmpdir();
        assert!(dir == "/" || !dir.ends_with('/'));
    }

    #[test]
    #[cfg(unix)]
    fn test_hostname() {
        assert!(!hostname().unwrap().is_empty());
    }
}
