// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Small conversions between Rust values and the engine's values

use boa_engine::object::builtins::JsArray;
use boa_engine::object::FunctionObjectBuilder;
use boa_engine::{
    js_string, Context, JsArgs, JsNativeError, JsObject, JsResult, JsString, JsValue,
    NativeFunction,
};

/// Build a named native function object.
pub(crate) fn function(
    context: &mut Context,
    name: &str,
    length: usize,
    native: NativeFunction,
) -> JsObject {
    FunctionObjectBuilder::new(context.realm(), native)
        .name(JsString::from(name))
        .length(length)
        .constructor(false)
        .build()
        .into()
}

/// A JavaScript string value.
pub(crate) fn js_str(text: &str) -> JsValue {
    JsValue::from(JsString::from(text))
}

/// Required argument coerced with `ToString`.
pub(crate) fn string_arg(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    let value = args.get_or_undefined(index);
    if value.is_undefined() {
        return Err(JsNativeError::typ()
            .with_message(format!("argument {} is required", index + 1))
            .into());
    }
    Ok(value.to_string(context)?.to_std_string_escaped())
}

/// Optional argument; `undefined` and `null` map to `None`.
pub(crate) fn optional_string_arg(
    args: &[JsValue],
    index: usize,
    context: &mut Context,
) -> JsResult<Option<String>> {
    let value = args.get_or_undefined(index);
    if value.is_null_or_undefined() {
        return Ok(None);
    }
    Ok(Some(value.to_string(context)?.to_std_string_escaped()))
}

/// Nullable string, as used by result records.
pub(crate) fn nullable_str(text: Option<&str>) -> JsValue {
    text.map(js_str).unwrap_or_else(JsValue::null)
}

/// Array of strings.
pub(crate) fn string_array<I>(items: I, context: &mut Context) -> JsValue
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let values = items.into_iter().map(|item| js_str(item.as_ref()));
    JsArray::from_iter(values, context).into()
}

/// Returns the elements when `object` is an array.
pub(crate) fn array_values(object: &JsObject, context: &mut Context) -> JsResult<Option<Vec<JsValue>>> {
    let Ok(array) = JsArray::from_object(object.clone()) else {
        return Ok(None);
    };
    let length = array.length(context)?;
    let mut values = Vec::with_capacity(length as usize);
    for index in 0..length {
        values.push(object.get(index as u32, context)?);
    }
    Ok(Some(values))
}

/// Own enumerable string-keyed entries, in `Object.keys` order.
pub(crate) fn object_entries(
    object: &JsObject,
    context: &mut Context,
) -> JsResult<Vec<(String, JsValue)>> {
    let constructor = context.intrinsics().constructors().object().constructor();
    let keys = constructor.get(js_string!("keys"), context)?;
    let Some(keys) = keys.as_callable() else {
        return Err(JsNativeError::typ().with_message("Object.keys is not callable").into());
    };
    let keys = keys.call(&JsValue::undefined(), &[object.clone().into()], context)?;
    let Some(keys) = keys.as_object() else {
        return Ok(Vec::new());
    };
    let keys = keys.clone();
    let mut entries = Vec::new();
    for key in array_values(&keys, context)?.unwrap_or_default() {
        let key = key.to_string(context)?;
        let value = object.get(key.clone(), context)?;
        entries.push((key.to_std_string_escaped(), value));
    }
    Ok(entries)
}

/// `Object.prototype.toString` tag, e.g. `"[object String]"`.
pub(crate) fn object_tag(value: &JsValue, context: &mut Context) -> JsResult<String> {
    let prototype = context.intrinsics().constructors().object().prototype();
    let to_string = prototype.get(js_string!("toString"), context)?;
    let Some(to_string) = to_string.as_callable() else {
        return Ok(String::from("[object Object]"));
    };
    let tag = to_string.call(value, &[], context)?;
    Ok(tag.to_string(context)?.to_std_string_escaped())
}

/// Set a property, throwing on failure.
pub(crate) fn set(
    object: &JsObject,
    key: &str,
    value: impl Into<JsValue>,
    context: &mut Context,
) -> JsResult<()> {
    object.set(JsString::from(key), value, true, context)?;
    Ok(())
}
