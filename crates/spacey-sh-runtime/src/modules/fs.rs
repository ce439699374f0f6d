// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `fs` namespace
//!
//! Synchronous file system operations. File contents cross into scripts
//! as UTF-8 strings; invalid sequences are replaced.

use crate::error::{Result, ScriptError};
use crate::interop::{self, js_str, string_arg};
use boa_engine::{Context, JsArgs, JsObject, JsResult, JsString, JsValue, NativeFunction};
use boa_gc::{Finalize, Trace};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Options accepted by `fs.rmSync` and the `rm` global
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RmOptions {
    /// Remove directories and their contents
    pub recursive: bool,
    /// Ignore missing paths
    pub force: bool,
}

/// Create the fs namespace object
pub fn create_module(context: &mut Context) -> JsResult<JsObject> {
    let exports = JsObject::with_object_proto(context.intrinsics());
    let functions: [(&str, usize, NativeFunction); 8] = [
        ("readFileSync", 2, NativeFunction::from_fn_ptr(js_read_file_sync)),
        ("writeFileSync", 2, NativeFunction::from_fn_ptr(js_write_file_sync)),
        ("appendFileSync", 2, NativeFunction::from_fn_ptr(js_append_file_sync)),
        ("existsSync", 1, NativeFunction::from_fn_ptr(js_exists_sync)),
        ("mkdirSync", 2, NativeFunction::from_fn_ptr(js_mkdir_sync)),
        ("readdirSync", 1, NativeFunction::from_fn_ptr(js_readdir_sync)),
        ("rmSync", 2, NativeFunction::from_fn_ptr(js_rm_sync)),
        ("statSync", 1, NativeFunction::from_fn_ptr(js_stat_sync)),
    ];
    for (name, length, native) in functions {
        let function = interop::function(context, name, length, native);
        interop::set(&exports, name, function, context)?;
    }
    Ok(exports)
}

/// Read a whole file as UTF-8 text.
pub fn read_file_sync(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ScriptError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Create or truncate `path` and write `data`.
pub fn write_file_sync(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).map_err(|e| ScriptError::io(path, e))
}

/// Append `data`, creating the file when missing.
pub fn append_file_sync(path: &Path, data: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ScriptError::io(path, e))?;
    file.write_all(data.as_bytes())
        .map_err(|e| ScriptError::io(path, e))
}

/// Create a directory, with parents when `recursive` is set.
pub fn mkdir_sync(path: &Path, recursive: bool) -> Result<()> {
    let created = if recursive {
        fs::create_dir_all(path)
    } else {
        fs::create_dir(path)
    };
    created.map_err(|e| ScriptError::io(path, e))
}

/// Entry names of a directory, sorted.
pub fn readdir_sync(path: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(path)
        .map_err(|e| ScriptError::io(path, e))?
        .map(|entry| {
            entry
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .map_err(|e| ScriptError::io(path, e))
        })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Remove a file, or a directory tree with `recursive`.
///
/// Symlinks are removed, never followed.
pub fn rm_sync(path: &Path, options: RmOptions) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound && options.force => return Ok(()),
        Err(e) => return Err(ScriptError::io(path, e)),
    };

    let removed = if metadata.is_dir() {
        if !options.recursive {
            return Err(ScriptError::io(path, io::Error::from(io::ErrorKind::IsADirectory)));
        }
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| ScriptError::io(path, e))
}

/// Parse `{ recursive, force }` from an optional options object.
pub(crate) fn rm_options(value: &JsValue, context: &mut Context) -> JsResult<RmOptions> {
    Ok(RmOptions {
        recursive: bool_option(value, "recursive", context)?,
        force: bool_option(value, "force", context)?,
    })
}

fn bool_option(value: &JsValue, key: &str, context: &mut Context) -> JsResult<bool> {
    match value.as_object() {
        Some(object) => Ok(object.get(JsString::from(key), context)?.to_boolean()),
        None => Ok(false),
    }
}

fn js_read_file_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let text = read_file_sync(Path::new(&path)).map_err(|e| e.into_js_error(context))?;
    Ok(js_str(&text))
}

fn js_write_file_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let data = args.get_or_undefined(1).to_string(context)?.to_std_string_escaped();
    write_file_sync(Path::new(&path), &data).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

fn js_append_file_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let data = args.get_or_undefined(1).to_string(context)?.to_std_string_escaped();
    append_file_sync(Path::new(&path), &data).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

fn js_exists_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let value = args.get_or_undefined(0);
    if value.is_null_or_undefined() {
        return Ok(false.into());
    }
    let path = value.to_string(context)?.to_std_string_escaped();
    Ok(Path::new(&path).exists().into())
}

fn js_mkdir_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let recursive = bool_option(args.get_or_undefined(1), "recursive", context)?;
    mkdir_sync(Path::new(&path), recursive).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

fn js_readdir_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let names = readdir_sync(Path::new(&path)).map_err(|e| e.into_js_error(context))?;
    Ok(interop::string_array(names, context))
}

fn js_rm_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let options = rm_options(args.get_or_undefined(1), context)?;
    rm_sync(Path::new(&path), options).map_err(|e| e.into_js_error(context))?;
    Ok(JsValue::undefined())
}

#[derive(Trace, Finalize)]
struct StatFlag {
    #[unsafe_ignore_trace]
    set: bool,
}

fn js_stat_sync(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let metadata = fs::metadata(&path).map_err(|e| ScriptError::io(&path, e).into_js_error(context))?;
    let mtime_ms = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or_default();

    let stats = JsObject::with_object_proto(context.intrinsics());
    interop::set(&stats, "size", metadata.len() as f64, context)?;
    interop::set(&stats, "mtimeMs", mtime_ms, context)?;

    let is_file = interop::function(
        context,
        "isFile",
        0,
        NativeFunction::from_copy_closure_with_captures(
            |_this, _args, flag: &StatFlag, _context| Ok(flag.set.into()),
            StatFlag { set: metadata.is_file() },
        ),
    );
    let is_directory = interop::function(
        context,
        "isDirectory",
        0,
        NativeFunction::from_copy_closure_with_captures(
            |_this, _args, flag: &StatFlag, _context| Ok(flag.set.into()),
            StatFlag { set: metadata.is_dir() },
        ),
    );
    interop::set(&stats, "isFile", is_file, context)?;
    interop::set(&stats, "isDirectory", is_directory, context)?;
    Ok(stats.into())
}
