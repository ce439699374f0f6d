// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-sh-runtime
//!
//! Runs a JavaScript file as a shell script. The script executes inside a
//! sandboxed [`boa_engine::Context`] that is pre-populated with:
//!
//! - shell helpers (`exec`, `$`, `echo`, `cd`, `pwd`, `rm`, `glob`, ...)
//! - path helpers (`absPath`, `quote`)
//! - the built-in namespaces (`fs`, `path`, `os`, `process`, `assert`)
//!
//! Scripts keep full CommonJS semantics: `require()` resolves sibling files
//! the same way Node.js does, every module gets its own `exports`, `module`,
//! `__filename` and `__dirname`, and all modules of a run share the one
//! sandbox global namespace.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spacey_sh_runtime::{RuntimeOptions, ScriptRuntime};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut runtime = ScriptRuntime::new(RuntimeOptions::default())?;
//!     runtime.run_file(Path::new("deploy.js"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Script example
//!
//! ```js
//! const files = $("ls").toArray();
//! exec("ls", { a: true }, ["-l"], { color: "auto" }); // ls -a -l --color=auto
//! echo(absPath(".."));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod error;
pub mod globals;
mod interop;
pub mod module_system;
pub mod modules;
pub mod runtime;

// Re-exports
pub use command::{CommandResult, ExecOptions, Token};
pub use error::{Result, ScriptError};
pub use runtime::{script_path, RuntimeOptions, Sandbox, ScriptRuntime};

/// Version of the spacey-sh runtime
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
