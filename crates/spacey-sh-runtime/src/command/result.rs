// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Result of a finished command

use crate::interop::{self, js_str, nullable_str};
use boa_engine::object::builtins::JsArray;
use boa_engine::{Context, JsArgs, JsResult, JsString, JsValue, NativeFunction, js_string};
use boa_gc::{Finalize, Trace};
use std::fmt;

/// Outcome of one `exec` / `$` call.
///
/// Formatting with `Display` yields the captured stdout, so call sites
/// that want the plain text use `to_string()`. Scripts receive a `String`
/// wrapper object instead, which is its stdout in any string context and
/// also carries the structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pid: u32,
    stdout: Option<String>,
    stderr: Option<String>,
    status: Option<i32>,
    signal: Option<String>,
}

impl CommandResult {
    /// Assemble a result. `None` output means the stream was not captured.
    pub fn new(
        pid: u32,
        stdout: Option<String>,
        stderr: Option<String>,
        status: Option<i32>,
        signal: Option<String>,
    ) -> Self {
        Self {
            pid,
            stdout,
            stderr,
            status,
            signal,
        }
    }

    /// Child process id
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Captured stdout, if it was captured
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Captured stderr, if it was captured
    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    /// Exit code; `None` when the process was killed by a signal
    pub fn status(&self) -> Option<i32> {
        self.status
    }

    /// Name of the terminating signal, e.g. `SIGTERM`
    pub fn signal(&self) -> Option<&str> {
        self.signal.as_deref()
    }

    /// Exited normally with status 0
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Per-stream output: `[stdin, stdout, stderr]`, stdin always `None`.
    pub fn output(&self) -> [Option<&str>; 3] {
        [None, self.stdout(), self.stderr()]
    }

    /// Trimmed stdout split on runs of whitespace, or on `delimiter`.
    pub fn to_array(&self, delimiter: Option<&str>) -> Vec<String> {
        let trimmed = self.stdout().unwrap_or_default().trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        match delimiter {
            Some(delimiter) => trimmed.split(delimiter).map(str::to_string).collect(),
            None => trimmed.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Build the script-facing value: a `String` object holding stdout with
    /// `pid`, `output`, `stdout`, `stderr`, `status`, `signal` and
    /// `toArray(delimiter?)` attached.
    pub fn to_js(&self, context: &mut Context) -> JsResult<JsValue> {
        let text = js_str(self.stdout().unwrap_or_default());
        let result = context
            .intrinsics()
            .constructors()
            .string()
            .constructor()
            .construct(&[text], None, context)?;

        let output = JsArray::from_iter(self.output().map(nullable_str), context);
        let status = self.status.map(JsValue::from).unwrap_or_else(JsValue::null);
        let to_array = interop::function(
            context,
            "toArray",
            1,
            NativeFunction::from_copy_closure_with_captures(
                |_this, args, stdout: &CapturedStdout, context| {
                    stdout.split(args.get_or_undefined(0), context)
                },
                CapturedStdout {
                    text: self.stdout().unwrap_or_default().to_string(),
                },
            ),
        );

        interop::set(&result, "status", status, context)?;
        interop::set(&result, "signal", nullable_str(self.signal()), context)?;
        interop::set(&result, "output", output, context)?;
        interop::set(&result, "pid", JsValue::from(self.pid as f64), context)?;
        interop::set(&result, "stdout", nullable_str(self.stdout()), context)?;
        interop::set(&result, "stderr", nullable_str(self.stderr()), context)?;
        interop::set(&result, "toArray", to_array, context)?;
        Ok(result.into())
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stdout().unwrap_or_default())
    }
}

#[derive(Trace, Finalize)]
struct CapturedStdout {
    #[unsafe_ignore_trace]
    text: String,
}

impl CapturedStdout {
    /// Whitespace split by default; any other delimiter (string or RegExp)
    /// goes through `String.prototype.split`.
    fn split(&self, delimiter: &JsValue, context: &mut Context) -> JsResult<JsValue> {
        let trimmed = self.text.trim();
        if delimiter.is_undefined() {
            return Ok(interop::string_array(trimmed.split_whitespace(), context));
        }
        let prototype = context.intrinsics().constructors().string().prototype();
        let split = prototype.get(js_string!("split"), context)?;
        match split.as_callable() {
            Some(split) => split.call(
                &JsValue::from(JsString::from(trimmed)),
                std::slice::from_ref(delimiter),
                context,
            ),
            None => Ok(interop::string_array(trimmed.split_whitespace(), context)),
        }
    }
}
