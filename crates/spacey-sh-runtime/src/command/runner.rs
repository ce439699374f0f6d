// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Synchronous shell invocation

use super::args::{self, Token};
use super::result::CommandResult;
use crate::error::{Result, ScriptError};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

/// Shell used to interpret command lines
pub const DEFAULT_SHELL: &str = "bash";

/// Upper bound on captured output per stream (1 GiB)
pub const MAX_BUFFER: usize = 1024 * 1024 * 1024;

/// Options for [`run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Capture stdout instead of forwarding it to the terminal
    pub quiet: bool,
    /// Shell binary, invoked as `<shell> -c <line>`
    pub shell: String,
    /// Captured bytes allowed per stream
    pub max_buffer: usize,
    /// Separator between long flags and their values
    pub flag_separator: String,
    /// In quiet mode, capture stderr as well
    pub capture_stderr: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            shell: DEFAULT_SHELL.to_string(),
            max_buffer: MAX_BUFFER,
            flag_separator: args::DEFAULT_SEPARATOR.to_string(),
            capture_stderr: false,
        }
    }
}

impl ExecOptions {
    /// Same options with `quiet` set, as used by `$`
    pub fn quiet(&self) -> Self {
        Self {
            quiet: true,
            ..self.clone()
        }
    }
}

/// Build the command line from `tokens` and run it to completion.
pub fn run(tokens: &[Token], options: &ExecOptions) -> Result<CommandResult> {
    let line = args::command_line(tokens, &options.flag_separator);
    run_command_line(&line, options)
}

/// Run an already assembled command line through the shell.
///
/// A non-zero exit status or a terminating signal is reported in the
/// result, never as an error.
pub fn run_command_line(line: &str, options: &ExecOptions) -> Result<CommandResult> {
    tracing::debug!(shell = %options.shell, command = %line, quiet = options.quiet, "exec");

    let capture_stderr = options.quiet && options.capture_stderr;
    let mut command = Command::new(&options.shell);
    command
        .arg("-c")
        .arg(line)
        .stdin(Stdio::inherit())
        .stdout(if options.quiet { Stdio::piped() } else { Stdio::inherit() })
        .stderr(if capture_stderr { Stdio::piped() } else { Stdio::inherit() });

    let mut child = command.spawn().map_err(|source| ScriptError::Spawn {
        shell: options.shell.clone(),
        source,
    })?;
    let pid = child.id();

    let limit = options.max_buffer;
    let stderr_reader = child
        .stderr
        .take()
        .map(|pipe| thread::spawn(move || read_bounded(pipe, limit)));

    let stdout = match child.stdout.take() {
        Some(pipe) => match read_bounded(pipe, limit) {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                abandon(&mut child);
                return Err(error);
            }
        },
        None => None,
    };

    let stderr = match stderr_reader {
        Some(handle) => {
            let joined = handle
                .join()
                .map_err(|_| ScriptError::io(&options.shell, io::Error::other("stderr reader panicked")))?;
            match joined {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    abandon(&mut child);
                    return Err(error);
                }
            }
        }
        None => None,
    };

    let status = child
        .wait()
        .map_err(|source| ScriptError::io(&options.shell, source))?;
    let signal = signal_name(&status);
    tracing::debug!(pid, status = ?status.code(), signal = ?signal, "exec finished");

    Ok(CommandResult::new(
        pid,
        stdout.map(lossy),
        stderr.map(lossy),
        status.code(),
        signal,
    ))
}

/// Read `reader` to the end, failing once more than `limit` bytes arrive.
pub fn read_bounded(reader: impl Read, limit: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let cap = (limit as u64).saturating_add(1);
    reader
        .take(cap)
        .read_to_end(&mut buffer)
        .map_err(|source| ScriptError::io("<pipe>", source))?;
    if buffer.len() > limit {
        return Err(ScriptError::OutputLimit { limit });
    }
    Ok(buffer)
}

fn abandon(child: &mut Child) {
    // The child may already have exited; either way it is reaped below.
    let _ = child.kill();
    let _ = child.wait();
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    let number = status.signal()?;
    Some(
        Signal::try_from(number)
            .map(|signal| signal.as_str().to_string())
            .unwrap_or_else(|_| format!("SIG{number}")),
    )
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExecOptions::default();
        assert!(!options.quiet);
        assert_eq!(options.shell, "bash");
        assert_eq!(options.max_buffer, 1 << 30);
        assert_eq!(options.flag_separator, "=");
        assert!(!options.capture_stderr);
        assert!(options.quiet().quiet);
    }

    #[test]
    fn test_read_bounded() {
        assert_eq!(read_bounded(&b"abcd"[..], 4).unwrap(), b"abcd");
        assert!(matches!(
            read_bounded(&b"abcde"[..], 4),
            Err(ScriptError::OutputLimit { limit: 4 })
        ));
        assert!(read_bounded(&b""[..], 0).unwrap().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_quiet_run_captures_stdout() {
        let options = ExecOptions {
            shell: "sh".into(),
            ..ExecOptions::default()
        }
        .quiet();
        let tokens = [Token::literal("printf"), Token::literal("'%s\\n'"), Token::literal("4")];
        let result = run(&tokens, &options).unwrap();
        assert_eq!(result.stdout(), Some("4\n"));
        assert_eq!(result.stderr(), None);
        assert_eq!(result.status(), Some(0));
        assert!(result.pid() > 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_failure_is_data() {
        let options = ExecOptions {
            shell: "sh".into(),
            quiet: true,
            capture_stderr: true,
            ..ExecOptions::default()
        };
        let result = run_command_line("echo oops >&2; exit 3", &options).unwrap();
        assert_eq!(result.status(), Some(3));
        assert_eq!(result.stderr(), Some("oops\n"));
        assert_eq!(result.signal(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_signal_is_reported() {
        let options = ExecOptions {
            shell: "sh".into(),
            quiet: true,
            ..ExecOptions::default()
        };
        let result = run_command_line("kill -TERM $$", &options).unwrap();
        assert_eq!(result.status(), None);
        assert_eq!(result.signal(), Some("SIGTERM"));
    }

    #[test]
    fn test_missing_shell() {
        let options = ExecOptions {
            shell: "/nonexistent/shell".into(),
            ..ExecOptions::default()
        };
        assert!(matches!(
            run_command_line("true", &options),
            Err(ScriptError::Spawn { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_output_limit_kills_child() {
        let options = ExecOptions {
            shell: "sh".into(),
            quiet: true,
            max_buffer: 16,
            ..ExecOptions::default()
        };
        let result = run_command_line("yes", &options);
        assert!(matches!(result, Err(ScriptError::OutputLimit { limit: 16 })));
    }
}
