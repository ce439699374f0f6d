// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command-line assembly from heterogeneous arguments
//!
//! `exec("ls", { a: true }, ["-l"], { color: "auto" })` becomes
//! `ls -a -l --color=auto`. No shell escaping is applied; callers quote
//! explicitly (see `quote()`).

/// Default separator between a long flag and its value
pub const DEFAULT_SEPARATOR: &str = "=";

/// Value of one entry in a flag mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Exactly boolean `true`: the flag is emitted without a value
    Bare,
    /// Anything else, already stringified
    Value(String),
}

/// One argument passed to `exec` / `$`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Passed through unchanged
    Literal(String),
    /// Flattened in place, arbitrarily deep
    Sequence(Vec<Token>),
    /// Converted to `-k` / `--key[=value]` tokens, in insertion order
    Flags(Vec<(String, FlagValue)>),
}

impl Token {
    /// Shorthand for a literal token
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Append this token's words to `out`.
    pub fn flatten_into(&self, separator: &str, out: &mut Vec<String>) {
        match self {
            Self::Literal(text) => out.push(text.clone()),
            Self::Sequence(items) => {
                for item in items {
                    item.flatten_into(separator, out);
                }
            }
            Self::Flags(flags) => out.extend(obj_to_args(flags, separator)),
        }
    }
}

/// Format one flag: a single-character key gets `-`, longer keys `--`.
pub fn flag_to_arg(key: &str, value: &FlagValue, separator: &str) -> String {
    let dashes = if key.chars().count() == 1 { "-" } else { "--" };
    match value {
        FlagValue::Bare => format!("{dashes}{key}"),
        FlagValue::Value(value) => format!("{dashes}{key}{separator}{value}"),
    }
}

/// Convert a flag mapping into argument strings.
pub fn obj_to_args(flags: &[(String, FlagValue)], separator: &str) -> Vec<String> {
    flags
        .iter()
        .map(|(key, value)| flag_to_arg(key, value, separator))
        .collect()
}

/// Flatten every token into a list of words.
pub fn flatten(tokens: &[Token], separator: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in tokens {
        token.flatten_into(separator, &mut words);
    }
    words
}

/// Join the flattened words with single spaces.
pub fn command_line(tokens: &[Token], separator: &str) -> String {
    flatten(tokens, separator).join(" ")
}
