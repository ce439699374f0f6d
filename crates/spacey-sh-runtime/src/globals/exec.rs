// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `exec`, `$` and `objToArgs`

use crate::command::{self, args::DEFAULT_SEPARATOR, ExecOptions, FlagValue, Token};
use crate::interop::{self, array_values, object_entries, object_tag, optional_string_arg};
use boa_engine::{Context, JsArgs, JsNativeError, JsObject, JsResult, JsValue};
use boa_gc::{Finalize, Trace};

/// Options baked into one `exec` or `$` function
#[derive(Trace, Finalize)]
pub(crate) struct ExecCapture {
    #[unsafe_ignore_trace]
    pub(crate) options: ExecOptions,
}

/// Convert one `exec` argument.
///
/// Strings (including `String` objects such as earlier command results)
/// are literal, arrays are flattened and other objects are flag mappings.
pub(crate) fn to_token(value: &JsValue, context: &mut Context) -> JsResult<Token> {
    if let Some(text) = value.as_string() {
        return Ok(Token::Literal(text.to_std_string_escaped()));
    }
    let Some(object) = value.as_object().map(JsObject::clone) else {
        return literal(value, context);
    };
    if let Some(items) = array_values(&object, context)? {
        return sequence(&items, context);
    }
    if object.is_callable() || object_tag(value, context)? == "[object String]" {
        return literal(value, context);
    }
    Ok(Token::Flags(flag_entries(&object, context)?))
}

fn literal(value: &JsValue, context: &mut Context) -> JsResult<Token> {
    Ok(Token::Literal(value.to_string(context)?.to_std_string_escaped()))
}

/// Array elements are stringified; nested arrays flatten.
fn sequence(items: &[JsValue], context: &mut Context) -> JsResult<Token> {
    let mut tokens = Vec::with_capacity(items.len());
    for item in items {
        let nested = match item.as_object() {
            Some(object) => array_values(&object.clone(), context)?,
            None => None,
        };
        tokens.push(match nested {
            Some(nested) => sequence(&nested, context)?,
            None => literal(item, context)?,
        });
    }
    Ok(Token::Sequence(tokens))
}

/// Only boolean `true` yields a bare flag.
fn flag_entries(object: &JsObject, context: &mut Context) -> JsResult<Vec<(String, FlagValue)>> {
    let mut flags = Vec::new();
    for (key, value) in object_entries(object, context)? {
        let flag = if value.as_boolean() == Some(true) {
            FlagValue::Bare
        } else {
            FlagValue::Value(value.to_string(context)?.to_std_string_escaped())
        };
        flags.push((key, flag));
    }
    Ok(flags)
}

pub(crate) fn js_exec(
    _this: &JsValue,
    args: &[JsValue],
    capture: &ExecCapture,
    context: &mut Context,
) -> JsResult<JsValue> {
    let mut tokens = Vec::with_capacity(args.len());
    for arg in args {
        tokens.push(to_token(arg, context)?);
    }
    let result = command::run(&tokens, &capture.options).map_err(|e| e.into_js_error(context))?;
    result.to_js(context)
}

pub(crate) fn js_obj_to_args(
    _this: &JsValue,
    args: &[JsValue],
    context: &mut Context,
) -> JsResult<JsValue> {
    let Some(object) = args.get_or_undefined(0).as_object().map(JsObject::clone) else {
        return Err(JsNativeError::typ()
            .with_message("objToArgs() expects an object")
            .into());
    };
    let separator = optional_string_arg(args, 1, context)?;
    let flags = flag_entries(&object, context)?;
    let words = command::obj_to_args(&flags, separator.as_deref().unwrap_or(DEFAULT_SEPARATOR));
    Ok(interop::string_array(words, context))
}
