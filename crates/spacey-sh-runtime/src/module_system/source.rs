// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module source loading

use crate::error::{Result, ScriptError};
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Read a module's source text as UTF-8.
///
/// A leading byte-order mark is dropped and a leading `#!` interpreter
/// line is blanked out, so line numbers in stack traces still match the
/// file on disk.
pub fn load_source(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| ScriptError::io(path, e))?;
    Ok(strip_source_prefix(text))
}

/// Apply the BOM and interpreter-line rules to already-read text.
pub fn strip_source_prefix(mut text: String) -> String {
    if text.starts_with(BYTE_ORDER_MARK) {
        text.drain(..BYTE_ORDER_MARK.len_utf8());
    }
    if text.starts_with("#!") {
        let end = text.find('\n').unwrap_or(text.len());
        text.replace_range(..end, "");
    }
    text
}
