// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command invocation helper behind `exec` and `$`

pub mod args;
pub mod result;
pub mod runner;

pub use args::{FlagValue, Token, command_line, flatten, obj_to_args};
pub use result::CommandResult;
pub use runner::{DEFAULT_SHELL, ExecOptions, MAX_BUFFER, run, run_command_line};
