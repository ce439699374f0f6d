// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `console` object and Node.js style value formatting

use crate::interop::{self, array_values, object_entries, object_tag};
use boa_engine::{js_string, Context, JsObject, JsResult, JsValue, NativeFunction};

/// Nested objects deeper than this print as `[Object]` / `[Array]`
const MAX_DEPTH: usize = 2;

/// Create the console object
pub fn create_console_object(context: &mut Context) -> JsResult<JsObject> {
    let console = JsObject::with_object_proto(context.intrinsics());
    let functions: [(&str, NativeFunction); 5] = [
        ("log", NativeFunction::from_fn_ptr(log)),
        ("info", NativeFunction::from_fn_ptr(log)),
        ("debug", NativeFunction::from_fn_ptr(log)),
        ("warn", NativeFunction::from_fn_ptr(error)),
        ("error", NativeFunction::from_fn_ptr(error)),
    ];
    for (name, native) in functions {
        let function = interop::function(context, name, 0, native);
        interop::set(&console, name, function, context)?;
    }
    Ok(console)
}

/// Write the formatted arguments and a newline to stdout.
pub(crate) fn log(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    println!("{}", format_args(args, context)?);
    Ok(JsValue::undefined())
}

fn error(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    eprintln!("{}", format_args(args, context)?);
    Ok(JsValue::undefined())
}

/// Format a `console.log` argument list.
///
/// A leading string may contain `%s`, `%d`, `%i`, `%f`, `%j`, `%o`, `%O`
/// and `%%`. Top-level strings print raw, everything else is inspected.
pub fn format_args(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let mut rest = args;
    let mut pieces = Vec::with_capacity(args.len());

    if let Some(first) = args.first().and_then(JsValue::as_string) {
        let template = first.to_std_string_escaped();
        rest = &args[1..];
        let mut out = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let Some(&directive) = chars.peek() else {
                out.push('%');
                break;
            };
            if directive == '%' {
                chars.next();
                out.push('%');
                continue;
            }
            if !matches!(directive, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O') || rest.is_empty() {
                out.push('%');
                continue;
            }
            chars.next();
            let value = &rest[0];
            rest = &rest[1..];
            let piece = match directive {
                's' => match value.as_string() {
                    Some(text) => text.to_std_string_escaped(),
                    None => inspect(value, context)?,
                },
                'd' | 'f' => value.to_number(context)?.to_string(),
                'i' => value.to_number(context)?.trunc().to_string(),
                'j' => match value.to_json(context) {
                    Ok(json) => json.to_string(),
                    Err(_) => "[Circular]".to_string(),
                },
                _ => inspect(value, context)?,
            };
            out.push_str(&piece);
        }
        pieces.push(out);
    }

    for value in rest {
        pieces.push(match value.as_string() {
            Some(text) => text.to_std_string_escaped(),
            None => inspect(value, context)?,
        });
    }
    Ok(pieces.join(" "))
}

/// `util.inspect`-like rendering of a single value.
pub fn inspect(value: &JsValue, context: &mut Context) -> JsResult<String> {
    let mut seen = Vec::new();
    inspect_value(value, 0, &mut seen, context)
}

fn inspect_value(
    value: &JsValue,
    depth: usize,
    seen: &mut Vec<JsObject>,
    context: &mut Context,
) -> JsResult<String> {
    if let Some(text) = value.as_string() {
        return Ok(if depth == 0 {
            text.to_std_string_escaped()
        } else {
            quote_single(&text.to_std_string_escaped())
        });
    }
    if let Some(number) = value.as_number() {
        if number == 0.0 && number.is_sign_negative() {
            return Ok("-0".to_string());
        }
        return Ok(value.display().to_string());
    }
    let Some(object) = value.as_object() else {
        return Ok(value.display().to_string());
    };
    let object = object.clone();

    if seen.iter().any(|other| JsObject::equals(other, &object)) {
        return Ok("[Circular]".to_string());
    }
    if object.is_callable() {
        let name = object.get(js_string!("name"), context)?;
        return Ok(match name.as_string().map(|n| n.to_std_string_escaped()) {
            Some(name) if !name.is_empty() => format!("[Function: {name}]"),
            _ => "[Function (anonymous)]".to_string(),
        });
    }

    match object_tag(value, context)?.as_str() {
        "[object Error]" => return inspect_error(&object, context),
        "[object String]" => {
            let text = value.to_string(context)?.to_std_string_escaped();
            return Ok(format!("[String: {}]", quote_single(&text)));
        }
        "[object RegExp]" => return Ok(value.to_string(context)?.to_std_string_escaped()),
        "[object Date]" => {
            let iso = object.get(js_string!("toISOString"), context)?;
            if let Some(iso) = iso.as_callable() {
                let text = iso.call(value, &[], context)?;
                return Ok(text.to_string(context)?.to_std_string_escaped());
            }
        }
        _ => {}
    }

    if let Some(items) = array_values(&object, context)? {
        if items.is_empty() {
            return Ok("[]".to_string());
        }
        if depth > MAX_DEPTH {
            return Ok("[Array]".to_string());
        }
        seen.push(object.clone());
        let mut parts = Vec::with_capacity(items.len());
        for item in &items {
            parts.push(inspect_value(item, depth + 1, seen, context)?);
        }
        seen.pop();
        return Ok(format!("[ {} ]", parts.join(", ")));
    }

    let entries = object_entries(&object, context)?;
    if entries.is_empty() {
        return Ok("{}".to_string());
    }
    if depth > MAX_DEPTH {
        return Ok("[Object]".to_string());
    }
    seen.push(object.clone());
    let mut parts = Vec::with_capacity(entries.len());
    for (key, item) in &entries {
        let rendered = inspect_value(item, depth + 1, seen, context)?;
        parts.push(format!("{}: {rendered}", property_key(key)));
    }
    seen.pop();
    Ok(format!("{{ {} }}", parts.join(", ")))
}

fn inspect_error(error: &JsObject, context: &mut Context) -> JsResult<String> {
    let stack = error.get(js_string!("stack"), context)?;
    if let Some(stack) = stack.as_string() {
        let stack = stack.to_std_string_escaped();
        if !stack.is_empty() {
            return Ok(stack);
        }
    }
    let name = error.get(js_string!("name"), context)?.to_string(context)?;
    let message = error.get(js_string!("message"), context)?.to_string(context)?;
    let (name, message) = (name.to_std_string_escaped(), message.to_std_string_escaped());
    Ok(if message.is_empty() {
        name
    } else {
        format!("{name}: {message}")
    })
}

fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if identifier {
        key.to_string()
    } else {
        quote_single(key)
    }
}

fn quote_single(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;

    fn render(code: &str) -> String {
        let mut context = Context::default();
        let value = context.eval(Source::from_bytes(code)).unwrap();
        inspect(&value, &mut context).unwrap()
    }

    fn render_args(code: &str) -> String {
        let mut context = Context::default();
        let value = context.eval(Source::from_bytes(code)).unwrap();
        let object = value.as_object().unwrap().clone();
        let args = array_values(&object, &mut context).unwrap().unwrap();
        format_args(&args, &mut context).unwrap()
    }

    #[test]
    fn test_inspect_primitives() {
        assert_eq!(render("'plain'"), "plain");
        assert_eq!(render("42"), "42");
        assert_eq!(render("-0"), "-0");
        assert_eq!(render("undefined"), "undefined");
        assert_eq!(render("null"), "null");
        assert_eq!(render("true"), "true");
    }

    #[test]
    fn test_inspect_objects() {
        assert_eq!(render("({ a: 1, 'b-c': 'x', d: [1, 2] })"), "{ a: 1, 'b-c': 'x', d: [ 1, 2 ] }");
        assert_eq!(render("({})"), "{}");
        assert_eq!(render("[]"), "[]");
        assert_eq!(render("({ a: { b: { c: { d: 1 } } } })"), "{ a: { b: { c: [Object] } } }");
        assert_eq!(render("(function named() {})"), "[Function: named]");
        assert_eq!(render("new String('x')"), "[String: 'x']");
    }

    #[test]
    fn test_inspect_circular() {
        assert_eq!(render("(() => { const o = { n: 1 }; o.self = o; return o; })()"), "{ n: 1, self: [Circular] }");
    }

    #[test]
    fn test_format_args() {
        assert_eq!(render_args("['a', 1, 'b']"), "a 1 b");
        assert_eq!(render_args("['%s is %d', 'x', 4.5, 'tail']"), "x is 4.5 tail");
        assert_eq!(render_args("['100%%']"), "100%");
        assert_eq!(render_args("['%j', { a: ['x'] }]"), "{\"a\":[\"x\"]}");
        assert_eq!(render_args("[{ a: 'q' }]"), "{ a: 'q' }");
        assert_eq!(render_args("[]"), "");
    }
}
