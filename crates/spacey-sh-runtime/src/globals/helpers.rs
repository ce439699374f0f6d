// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! File and path helpers: `absPath`, `readFile`, `writeFile`, `rm`, `cd`,
//! `pwd`, `quote` and `glob`

use crate::interop::{self, array_values, js_str, optional_string_arg, string_arg};
use crate::module_system::ExecutionStack;
use crate::modules::fs::{self, RmOptions};
use crate::modules::path;
use boa_engine::{Context, JsArgs, JsNativeError, JsObject, JsResult, JsValue};
use boa_gc::{Finalize, Trace};
use std::collections::HashSet;
use std::path::Path;

/// Resolve `path` to an absolute path.
///
/// Without `path` the answer is `caller` itself. A relative `path` is
/// resolved against `relative_to`, or against the caller's directory.
/// Returns `None` when the caller's location is needed but unknown.
pub fn abs_path(
    path: Option<&str>,
    relative_to: Option<&str>,
    caller: Option<&Path>,
    cwd: &str,
) -> Option<String> {
    let Some(path) = path else {
        return caller.map(|file| file.to_string_lossy().into_owned());
    };
    if path::is_absolute(path) {
        return Some(path.to_string());
    }
    if let Some(base) = relative_to {
        return Some(path::resolve(&[base, path], cwd));
    }
    let caller = caller?.to_string_lossy().into_owned();
    Some(path::resolve(&[path::dirname(&caller).as_str(), path], cwd))
}

/// Split `rm` arguments into options and targets.
pub fn parse_rm_args<S: AsRef<str>>(args: &[S]) -> (RmOptions, Vec<String>) {
    let mut options = RmOptions::default();
    let mut targets = Vec::new();
    for arg in args.iter().map(AsRef::as_ref) {
        match arg {
            "-rf" | "-fr" => {
                options.recursive = true;
                options.force = true;
            }
            "-r" => options.recursive = true,
            "-f" => options.force = true,
            target => targets.push(target.to_string()),
        }
    }
    (options, targets)
}

/// Expand glob patterns into matching files.
///
/// Patterns starting with `!` exclude matches of the earlier patterns.
/// Directories are skipped; every file appears once, in match order.
pub fn expand_globs<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<String>, glob::PatternError> {
    let mut excluded = Vec::new();
    let mut included = Vec::new();
    for pattern in patterns.iter().map(AsRef::as_ref) {
        match pattern.strip_prefix('!') {
            Some(negated) => excluded.push(glob::Pattern::new(negated)?),
            None => included.push(pattern),
        }
    }

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for pattern in included {
        // Unreadable entries are skipped rather than failing the expansion.
        for entry in glob::glob(pattern)?.flatten() {
            if !entry.is_file() || excluded.iter().any(|p| p.matches_path(&entry)) {
                continue;
            }
            let text = entry.to_string_lossy().into_owned();
            if seen.insert(text.clone()) {
                matches.push(text);
            }
        }
    }
    Ok(matches)
}

/// `quote(value)`: JSON-style quoting, `undefined` for `undefined`.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Stack consulted by `absPath()`
#[derive(Trace, Finalize)]
pub(crate) struct CallerStack {
    pub(crate) stack: ExecutionStack,
}

/// `absPath([path], [relativeTo])`.
///
/// The caller is the innermost module whose top-level code is running,
/// not the module that defined the calling function. A helper exported by
/// `lib/a.js` and invoked later from `main.js` resolves against `main.js`.
pub(crate) fn js_abs_path(
    _this: &JsValue,
    args: &[JsValue],
    callers: &CallerStack,
    context: &mut Context,
) -> JsResult<JsValue> {
    let target = optional_string_arg(args, 0, context)?;
    let relative_to = optional_string_arg(args, 1, context)?;
    let caller = callers.stack.current();
    let cwd = path::current_dir()?;
    match abs_path(target.as_deref(), relative_to.as_deref(), caller.as_deref(), &cwd) {
        Some(resolved) => Ok(js_str(&resolved)),
        None => Err(JsNativeError::typ()
            .with_message("absPath() needs a path when called outside a running module")
            .into()),
    }
}

pub(crate) fn js_read_file(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let file = string_arg(args, 0, context)?;
    let text = fs::read_file_sync(Path::new(&file)).map_err(|e| e.into_js_error(context))?;
    Ok(js_str(&text))
}

pub(crate) fn js_write_file(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let file = string_arg(args, 0, context)?;
    let data = args.get_or_undefined(1).to_string(context)?.to_std_string_escaped();
    fs::write_file_sync(Path::new(&file), &data).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

pub(crate) fn js_rm(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let words = args
        .iter()
        .map(|arg| Ok(arg.to_string(context)?.to_std_string_escaped()))
        .collect::<JsResult<Vec<_>>>()?;
    let (options, targets) = parse_rm_args(&words);
    for target in targets {
        tracing::debug!(target = %target, recursive = options.recursive, force = options.force, "rm");
        fs::rm_sync(Path::new(&target), options).map_err(|e| e.into_js_error(context))?;
    }
    Ok(JsValue::undefined())
}

pub(crate) fn js_quote(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let value = args.get_or_undefined(0);
    if value.is_undefined() {
        return Ok(JsValue::undefined());
    }
    if let Some(text) = value.as_string() {
        return Ok(js_str(&quote(&text.to_std_string_escaped())));
    }
    let json = value.to_json(context)?;
    Ok(js_str(&json.to_string()))
}

pub(crate) fn js_glob(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let input = args.get_or_undefined(0);
    let patterns = match input.as_object().map(JsObject::clone) {
        Some(object) => match array_values(&object, context)? {
            Some(items) => items
                .iter()
                .map(|item| Ok(item.to_string(context)?.to_std_string_escaped()))
                .collect::<JsResult<Vec<_>>>()?,
            None => vec![input.to_string(context)?.to_std_string_escaped()],
        },
        None => vec![string_arg(args, 0, context)?],
    };
    let matches = expand_globs(&patterns).map_err(|e| {
        JsNativeError::typ().with_message(format!("invalid glob pattern: {e}"))
    })?;
    Ok(interop::string_array(matches, context))
}
