// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `assert` namespace
//!
//! `assert` itself is callable (`assert(value, message?)`) and carries the
//! comparison helpers as properties. Failures throw an `Error` whose
//! `name` is `AssertionError` and whose `code` is `ERR_ASSERTION`.

use crate::interop::{self, js_str, optional_string_arg};
use boa_engine::{
    Context, JsArgs, JsError, JsNativeError, JsObject, JsResult, JsValue, NativeFunction,
};

/// Create the callable assert namespace
pub fn create_module(context: &mut Context) -> JsResult<JsObject> {
    let assert = interop::function(context, "assert", 2, NativeFunction::from_fn_ptr(js_ok));

    let functions: [(&str, usize, NativeFunction); 6] = [
        ("ok", 2, NativeFunction::from_fn_ptr(js_ok)),
        ("equal", 3, NativeFunction::from_fn_ptr(js_equal)),
        ("notEqual", 3, NativeFunction::from_fn_ptr(js_not_equal)),
        ("strictEqual", 3, NativeFunction::from_fn_ptr(js_strict_equal)),
        ("notStrictEqual", 3, NativeFunction::from_fn_ptr(js_not_strict_equal)),
        ("fail", 1, NativeFunction::from_fn_ptr(js_fail)),
    ];
    for (name, length, native) in functions {
        let function = interop::function(context, name, length, native);
        interop::set(&assert, name, function, context)?;
    }
    Ok(assert)
}

/// Comparison performed by an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equal,
    NotEqual,
    StrictEqual,
    NotStrictEqual,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::NotStrictEqual => "!==",
        }
    }

    fn holds(self, actual: &JsValue, expected: &JsValue, context: &mut Context) -> JsResult<bool> {
        Ok(match self {
            Self::Equal => actual.equals(expected, context)?,
            Self::NotEqual => !actual.equals(expected, context)?,
            Self::StrictEqual => actual.strict_equals(expected),
            Self::NotStrictEqual => !actual.strict_equals(expected),
        })
    }
}

/// Build an `AssertionError`.
fn assertion_error(
    message: String,
    actual: &JsValue,
    expected: &JsValue,
    operator: &str,
    context: &mut Context,
) -> JsError {
    let error = JsError::from(JsNativeError::error().with_message(message)).to_opaque(context);
    if let Some(object) = error.as_object() {
        let object = object.clone();
        let fields = [
            ("name", js_str("AssertionError")),
            ("code", js_str("ERR_ASSERTION")),
            ("actual", actual.clone()),
            ("expected", expected.clone()),
            ("operator", js_str(operator)),
        ];
        for (key, value) in fields {
            // Still throwable without the extra fields.
            let _ = interop::set(&object, key, value, context);
        }
    }
    JsError::from_opaque(error)
}

fn js_ok(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let value = args.get_or_undefined(0);
    if value.to_boolean() {
        return Ok(JsValue::undefined());
    }
    let message = if args.is_empty() {
        "No value argument passed to `assert.ok()`".to_string()
    } else {
        optional_string_arg(args, 1, context)?
            .unwrap_or_else(|| "The expression evaluated to a falsy value".to_string())
    };
    Err(assertion_error(message, value, &JsValue::from(true), "==", context))
}

fn compare(args: &[JsValue], operator: Operator, context: &mut Context) -> JsResult<JsValue> {
    let actual = args.get_or_undefined(0);
    let expected = args.get_or_undefined(1);
    if operator.holds(actual, expected, context)? {
        return Ok(JsValue::undefined());
    }
    let message = match optional_string_arg(args, 2, context)? {
        Some(message) => message,
        None => format!(
            "{} {} {}",
            actual.display(),
            operator.symbol(),
            expected.display()
        ),
    };
    Err(assertion_error(message, actual, expected, operator.symbol(), context))
}

fn js_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    compare(args, Operator::Equal, context)
}

fn js_not_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    compare(args, Operator::NotEqual, context)
}

fn js_strict_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    compare(args, Operator::StrictEqual, context)
}

fn js_not_strict_equal(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    compare(args, Operator::NotStrictEqual, context)
}

fn js_fail(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let message = optional_string_arg(args, 0, context)?.unwrap_or_else(|| "Failed".to_string());
    let undefined = JsValue::undefined();
    Err(assertion_error(message, &undefined, &undefined, "fail", context))
}
