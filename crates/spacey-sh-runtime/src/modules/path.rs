// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `path` namespace (POSIX flavour)

use crate::interop::{self, js_str, optional_string_arg, string_arg};
use boa_engine::{Context, JsArgs, JsObject, JsResult, JsValue, NativeFunction};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Path segment separator
pub const SEP: &str = "/";

/// `PATH` list delimiter
pub const DELIMITER: &str = ":";

/// Create the path namespace object
pub fn create_module(context: &mut Context) -> JsResult<JsObject> {
    let exports = JsObject::with_object_proto(context.intrinsics());
    interop::set(&exports, "sep", js_str(SEP), context)?;
    interop::set(&exports, "delimiter", js_str(DELIMITER), context)?;

    let functions: [(&str, usize, NativeFunction); 8] = [
        ("join", 0, NativeFunction::from_fn_ptr(js_join)),
        ("resolve", 0, NativeFunction::from_fn_ptr(js_resolve)),
        ("normalize", 1, NativeFunction::from_fn_ptr(js_normalize)),
        ("dirname", 1, NativeFunction::from_fn_ptr(js_dirname)),
        ("basename", 2, NativeFunction::from_fn_ptr(js_basename)),
        ("extname", 1, NativeFunction::from_fn_ptr(js_extname)),
        ("isAbsolute", 1, NativeFunction::from_fn_ptr(js_is_absolute)),
        ("relative", 2, NativeFunction::from_fn_ptr(js_relative)),
    ];
    for (name, length, native) in functions {
        let function = interop::function(context, name, length, native);
        interop::set(&exports, name, function, context)?;
    }
    Ok(exports)
}

/// Lexically normalize a filesystem path: drops `.` components and folds
/// `..` into its parent without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// path.normalize(path)
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            segment => segments.push(segment),
        }
    }

    let mut result = segments.join(SEP);
    if result.is_empty() && !absolute {
        result.push('.');
    }
    if trailing && !result.is_empty() {
        result.push('/');
    }
    if absolute {
        result.insert(0, '/');
    }
    result
}

/// path.join(...paths)
pub fn join<S: AsRef<str>>(paths: &[S]) -> String {
    let joined = paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(SEP);
    if joined.is_empty() {
        return ".".to_string();
    }
    normalize(&joined)
}

/// path.resolve(...paths) against `cwd`
pub fn resolve<S: AsRef<str>>(paths: &[S], cwd: &str) -> String {
    let mut resolved = String::new();
    for segment in paths.iter().rev().map(AsRef::as_ref) {
        if segment.is_empty() {
            continue;
        }
        resolved = if resolved.is_empty() {
            segment.to_string()
        } else {
            format!("{segment}/{resolved}")
        };
        if segment.starts_with('/') {
            break;
        }
    }
    if !resolved.starts_with('/') {
        resolved = if resolved.is_empty() {
            cwd.to_string()
        } else {
            format!("{cwd}/{resolved}")
        };
    }
    strip_trailing(normalize(&resolved))
}

/// path.dirname(path)
pub fn dirname(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') { "/" } else { "." }.to_string();
    }
    match trimmed.rfind('/') {
        None => ".".to_string(),
        Some(index) => {
            let parent = trimmed[..index].trim_end_matches('/');
            if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            }
        }
    }
}

/// path.basename(path, ext?)
pub fn basename(path: &str, ext: Option<&str>) -> String {
    let trimmed = path.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or_default();
    match ext {
        Some(ext) if !ext.is_empty() && base != ext => {
            base.strip_suffix(ext).unwrap_or(base).to_string()
        }
        _ => base.to_string(),
    }
}

/// path.extname(path)
pub fn extname(path: &str) -> String {
    let base = basename(path, None);
    match base.rfind('.') {
        Some(index) if index > 0 => base[index..].to_string(),
        _ => String::new(),
    }
}

/// path.isAbsolute(path)
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// path.relative(from, to), both resolved against `cwd`
pub fn relative(from: &str, to: &str, cwd: &str) -> String {
    let from = resolve(&[from], cwd);
    let to = resolve(&[to], cwd);
    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts = vec![".."; from_segments.len() - common];
    parts.extend(&to_segments[common..]);
    parts.join(SEP)
}

fn strip_trailing(mut path: String) -> String {
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

/// Current directory as a string, for `resolve` and `relative`.
pub(crate) fn current_dir() -> JsResult<String> {
    env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .map_err(|error| {
            boa_engine::JsNativeError::error()
                .with_message(format!("cannot read current directory: {error}"))
                .into()
        })
}

fn string_args(args: &[JsValue], context: &mut Context) -> JsResult<Vec<String>> {
    args.iter()
        .map(|value| Ok(value.to_string(context)?.to_std_string_escaped()))
        .collect()
}

fn js_join(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(js_str(&join(&string_args(args, context)?)))
}

fn js_resolve(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let segments = string_args(args, context)?;
    Ok(js_str(&resolve(&segments, &current_dir()?)))
}

fn js_normalize(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(js_str(&normalize(&string_arg(args, 0, context)?)))
}

fn js_dirname(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(js_str(&dirname(&string_arg(args, 0, context)?)))
}

fn js_basename(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = string_arg(args, 0, context)?;
    let ext = optional_string_arg(args, 1, context)?;
    Ok(js_str(&basename(&path, ext.as_deref())))
}

fn js_extname(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(js_str(&extname(&string_arg(args, 0, context)?)))
}

fn js_is_absolute(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let path = args.get_or_undefined(0).to_string(context)?;
    Ok(is_absolute(&path.to_std_string_escaped()).into())
}

fn js_relative(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let from = string_arg(args, 0, context)?;
    let to = string_arg(args, 1, context)?;
    Ok(js_str(&relative(&from, &to, &current_dir()?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d.js")), PathBuf::from("/a/c/d.js"));
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_path(Path::new("../a/../../b")), PathBuf::from("../../b"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/foo/bar//baz/asdf/quux/.."), "/foo/bar/baz/asdf");
        assert_eq!(normalize("./a/"), "a/");
        assert_eq!(normalize("../../x"), "../../x");
        assert_eq!(normalize(""), ".");
        assert_eq!(normalize("/.."), "/");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["/foo", "bar", "baz/asdf", "quux", ".."]), "/foo/bar/baz/asdf");
        assert_eq!(join(&["a", "/b"]), "a/b");
        assert_eq!(join::<&str>(&[]), ".");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(&["/foo/bar", "./baz"], "/cwd"), "/foo/bar/baz");
        assert_eq!(resolve(&["/foo/bar", "/tmp/file/"], "/cwd"), "/tmp/file");
        assert_eq!(resolve(&["www", "../img"], "/home/me"), "/home/me/img");
        assert_eq!(resolve::<&str>(&[], "/home/me"), "/home/me");
    }

    #[test]
    fn test_dirname_basename_extname() {
        assert_eq!(dirname("/foo/bar/baz/asdf/quux"), "/foo/bar/baz/asdf");
        assert_eq!(dirname("/foo"), "/");
        assert_eq!(dirname("file.txt"), ".");
        assert_eq!(dirname("a/b/"), "a");

        assert_eq!(basename("/foo/bar/quux.html", None), "quux.html");
        assert_eq!(basename("/foo/bar/quux.html", Some(".html")), "quux");
        assert_eq!(basename("/foo/bar/", None), "bar");
        assert_eq!(basename(".html", Some(".html")), ".html");

        assert_eq!(extname("index.html"), ".html");
        assert_eq!(extname("index.coffee.md"), ".md");
        assert_eq!(extname("index."), ".");
        assert_eq!(extname(".bashrc"), "");
        assert_eq!(extname("index"), "");
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            relative("/data/orandea/test/aaa", "/data/orandea/impl/bbb", "/"),
            "../../impl/bbb"
        );
        assert_eq!(relative("/a/b", "/a/b", "/"), "");
        assert_eq!(relative("src", "src/lib", "/work"), "lib");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("/etc"));
        assert!(!is_absolute("etc"));
    }
}
