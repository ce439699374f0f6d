// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution (Node.js algorithm)
//!
//! `require(X)` from a module at path `Y`:
//!
//! 1. `X` is a built-in name (optionally `node:` prefixed): return it.
//! 2. `X` starts with `/`, `./` or `../`: probe `dirname(Y)/X` as a file,
//!    then as a directory.
//! 3. Otherwise probe `X` inside every `node_modules` directory from
//!    `dirname(Y)` up to the root.

use crate::error::{Result, ScriptError};
use crate::modules::path::normalize_path;
use crate::modules::BUILTIN_MODULES;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Extensions probed after the exact path, in order
pub const EXTENSIONS: &[&str] = &[".js", ".json", ".node"];

/// Result of module resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Built-in namespace (fs, path, ...)
    Builtin(String),
    /// JavaScript source file
    Script(PathBuf),
    /// JSON file
    Json(PathBuf),
    /// Native addon (.node file), which cannot be loaded
    Native(PathBuf),
}

impl Resolved {
    /// The file behind the resolution, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Builtin(_) => None,
            Self::Script(path) | Self::Json(path) | Self::Native(path) => Some(path),
        }
    }

    /// What `require.resolve()` returns
    pub fn display_name(&self) -> String {
        match self {
            Self::Builtin(name) => name.clone(),
            Self::Script(path) | Self::Json(path) | Self::Native(path) => {
                path.display().to_string()
            }
        }
    }
}

/// Module resolver implementing Node.js resolution algorithm
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// Built-in module names
    builtins: Vec<String>,
    /// File extensions to try
    extensions: Vec<String>,
}

impl ModuleResolver {
    /// Create a resolver that knows the runtime's built-in namespaces
    pub fn new() -> Self {
        Self {
            builtins: BUILTIN_MODULES.iter().map(|name| name.to_string()).collect(),
            extensions: EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Check if a module is a built-in
    pub fn is_builtin(&self, name: &str) -> bool {
        let name = name.strip_prefix("node:").unwrap_or(name);
        self.builtins.iter().any(|builtin| builtin == name)
    }

    /// Resolve `specifier` as seen from the module file `from`.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<Resolved> {
        let dir = from.parent().unwrap_or_else(|| Path::new("/"));
        self.resolve_from_dir(specifier, dir)
    }

    /// Resolve `specifier` against a directory rather than a module file.
    pub fn resolve_from_dir(&self, specifier: &str, dir: &Path) -> Result<Resolved> {
        if self.is_builtin(specifier) {
            let name = specifier.strip_prefix("node:").unwrap_or(specifier);
            return Ok(Resolved::Builtin(name.to_string()));
        }

        let directory_only = names_directory(specifier);
        let found = if is_path_specifier(specifier) {
            // An absolute specifier replaces `dir` entirely.
            self.probe(&normalize_path(&dir.join(specifier)), directory_only)
        } else {
            self.resolve_node_modules(specifier, dir, directory_only)
        };

        found
            .map(categorize_file)
            .ok_or_else(|| ScriptError::module_not_found(specifier, dir))
    }

    /// File first, then directory. `directory_only` skips the file step.
    fn probe(&self, path: &Path, directory_only: bool) -> Option<PathBuf> {
        if directory_only {
            return self.load_as_directory(path);
        }
        self.load_as_file(path)
            .or_else(|| self.load_as_directory(path))
    }

    /// `X`, then `X.js`, `X.json`, `X.node`
    fn load_as_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        self.extensions.iter().find_map(|ext| {
            let candidate = path.with_file_name(format!("{file_name}{ext}"));
            candidate.is_file().then_some(candidate)
        })
    }

    /// `package.json` "main", then `index.*`
    fn load_as_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }

        if let Some(main) = read_package_main(dir) {
            let main_path = normalize_path(&dir.join(main));
            if let Some(found) = self
                .load_as_file(&main_path)
                .or_else(|| self.load_index(&main_path))
            {
                return Some(found);
            }
        }

        self.load_index(dir)
    }

    fn load_index(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions.iter().find_map(|ext| {
            let index = dir.join(format!("index{ext}"));
            index.is_file().then_some(index)
        })
    }

    /// Walk up directory tree looking for node_modules
    fn resolve_node_modules(&self, specifier: &str, dir: &Path, directory_only: bool) -> Option<PathBuf> {
        dir.ancestors()
            .filter(|ancestor| ancestor.file_name().is_none_or(|name| name != "node_modules"))
            .find_map(|ancestor| {
                self.probe(&ancestor.join("node_modules").join(specifier), directory_only)
            })
    }
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Relative or absolute path, as opposed to a bare package name.
fn is_path_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || Path::new(specifier).is_absolute()
}

/// `.`, `..` and anything ending in `/`, `/.` or `/..` can only name a
/// directory. Normalizing drops that information, so check the raw text.
fn names_directory(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.ends_with('/')
        || specifier.ends_with("/.")
        || specifier.ends_with("/..")
}

/// Categorize a file by extension
fn categorize_file(path: PathBuf) -> Resolved {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Resolved::Json(path),
        Some("node") => Resolved::Native(path),
        _ => Resolved::Script(path),
    }
}

/// Minimal package.json structure for resolution
#[derive(Debug, Deserialize)]
struct PackageJson {
    main: Option<String>,
}

fn read_package_main(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join("package.json")).ok()?;
    let package: PackageJson = serde_json::from_str(&content).ok()?;
    package.main.filter(|main| !main.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_is_builtin() {
        let resolver = ModuleResolver::new();
        assert!(resolver.is_builtin("fs"));
        assert!(resolver.is_builtin("node:path"));
        assert!(!resolver.is_builtin("lodash"));
        assert_eq!(
            resolver.resolve_from_dir("node:fs", Path::new("/")).unwrap(),
            Resolved::Builtin("fs".to_string())
        );
    }

    #[test]
    fn test_exact_file_wins_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("lib"));
        touch(&dir.path().join("lib.js"));

        let resolver = ModuleResolver::new();
        let from = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./lib", &from).unwrap(),
            Resolved::Script(dir.path().join("lib"))
        );
    }

    #[test]
    fn test_extension_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("data.json"));
        touch(&dir.path().join("data.js"));
        touch(&dir.path().join("config.json"));

        let resolver = ModuleResolver::new();
        let from = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./data", &from).unwrap(),
            Resolved::Script(dir.path().join("data.js"))
        );
        assert_eq!(
            resolver.resolve("./config", &from).unwrap(),
            Resolved::Json(dir.path().join("config.json"))
        );
    }

    #[test]
    fn test_file_beats_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("util.js"));
        touch(&dir.path().join("util/index.js"));

        let resolver = ModuleResolver::new();
        assert_eq!(
            resolver.resolve("./util", &dir.path().join("main.js")).unwrap(),
            Resolved::Script(dir.path().join("util.js"))
        );
    }

    #[test]
    fn test_directory_index_and_package_main() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("plain/index.js"));
        touch(&dir.path().join("pkg/lib/entry.js"));
        fs::write(
            dir.path().join("pkg/package.json"),
            r#"{ "main": "./lib/entry" }"#,
        )
        .unwrap();

        let resolver = ModuleResolver::new();
        let from = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./plain", &from).unwrap(),
            Resolved::Script(dir.path().join("plain/index.js"))
        );
        assert_eq!(
            resolver.resolve("./pkg", &from).unwrap(),
            Resolved::Script(dir.path().join("pkg/lib/entry.js"))
        );
    }

    #[test]
    fn test_parent_relative_and_absolute() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("shared.js"));
        touch(&dir.path().join("nested/main.js"));

        let resolver = ModuleResolver::new();
        let from = dir.path().join("nested/main.js");
        assert_eq!(
            resolver.resolve("../shared", &from).unwrap(),
            Resolved::Script(dir.path().join("shared.js"))
        );

        let absolute = dir.path().join("shared.js");
        assert_eq!(
            resolver
                .resolve(absolute.to_str().unwrap(), &from)
                .unwrap(),
            Resolved::Script(absolute)
        );
    }

    #[test]
    fn test_node_modules_walk() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("node_modules/left-pad/index.js"));
        touch(&dir.path().join("src/deep/main.js"));

        let resolver = ModuleResolver::new();
        let from = dir.path().join("src/deep/main.js");
        assert_eq!(
            resolver.resolve("left-pad", &from).unwrap(),
            Resolved::Script(dir.path().join("node_modules/left-pad/index.js"))
        );
    }

    #[test]
    fn test_dot_skips_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("proj.js"));
        touch(&dir.path().join("proj/index.js"));
        touch(&dir.path().join("proj/lib/index.js"));
        let resolver = ModuleResolver::new();

        let from = dir.path().join("proj/main.js");
        assert_eq!(
            resolver.resolve(".", &from).unwrap(),
            Resolved::Script(dir.path().join("proj/index.js"))
        );
        assert_eq!(
            resolver.resolve("./", &from).unwrap(),
            Resolved::Script(dir.path().join("proj/index.js"))
        );
        assert_eq!(
            resolver.resolve("..", &dir.path().join("proj/lib/main.js")).unwrap(),
            Resolved::Script(dir.path().join("proj/index.js"))
        );
        assert_eq!(
            resolver.resolve("./lib/..", &from).unwrap(),
            Resolved::Script(dir.path().join("proj/index.js"))
        );
    }

    #[test]
    fn test_trailing_slash_means_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("util.js"));
        touch(&dir.path().join("util/index.js"));
        let resolver = ModuleResolver::new();

        let from = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./util", &from).unwrap(),
            Resolved::Script(dir.path().join("util.js"))
        );
        assert_eq!(
            resolver.resolve("./util/", &from).unwrap(),
            Resolved::Script(dir.path().join("util/index.js"))
        );
        assert_eq!(
            resolver.resolve("./util/.", &from).unwrap(),
            Resolved::Script(dir.path().join("util/index.js"))
        );
    }

    #[test]
    fn test_trailing_slash_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("only.js"));
        let resolver = ModuleResolver::new();
        let err = resolver
            .resolve("./only/", &dir.path().join("main.js"))
            .unwrap_err();
        assert!(matches!(err, ScriptError::ModuleNotFound { .. }));
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ModuleResolver::new();
        let err = resolver
            .resolve("./missing", &dir.path().join("main.js"))
            .unwrap_err();
        assert!(matches!(err, ScriptError::ModuleNotFound { ref specifier, .. } if specifier == "./missing"));
    }
}
