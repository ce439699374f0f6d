// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, caches and executes modules

use crate::error::ScriptError;
use crate::interop::{self, js_str};
use crate::module_system::delegate::{self, ModuleScope};
use crate::module_system::registry::{ExecutionStack, ModuleId, ModuleRegistry, ModuleState};
use crate::module_system::resolver::{ModuleResolver, Resolved};
use crate::module_system::source::load_source;
use boa_engine::object::builtins::JsArray;
use boa_engine::{js_string, Context, JsObject, JsResult, JsString, JsValue, NativeFunction};
use boa_gc::{Finalize, Gc, GcRefCell, Trace};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// CommonJS loader for one run.
///
/// Cloning is cheap; clones share the registry, the `require.cache`
/// object and the execution stack.
#[derive(Clone, Trace, Finalize)]
pub struct ModuleLoader {
    registry: Gc<GcRefCell<ModuleRegistry>>,
    /// Built-in namespaces by name
    builtins: JsObject,
    /// `require.cache`
    cache: JsObject,
    #[unsafe_ignore_trace]
    resolver: Rc<ModuleResolver>,
    stack: ExecutionStack,
}

/// State captured by each module's `require` and `require.resolve`
#[derive(Trace, Finalize)]
struct RequireCapture {
    loader: ModuleLoader,
    #[unsafe_ignore_trace]
    id: ModuleId,
    #[unsafe_ignore_trace]
    dirname: PathBuf,
}

impl ModuleLoader {
    /// Create a loader serving `builtins` for built-in names and pushing
    /// running modules onto `stack`.
    pub fn new(builtins: JsObject, stack: ExecutionStack, context: &mut Context) -> Self {
        Self {
            registry: Gc::new(GcRefCell::new(ModuleRegistry::new())),
            builtins,
            cache: JsObject::with_object_proto(context.intrinsics()),
            resolver: Rc::new(ModuleResolver::new()),
            stack,
        }
    }

    /// The resolver used by every `require`
    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Number of modules currently cached
    pub fn module_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Whether `filename` finished loading
    pub fn is_loaded(&self, filename: &Path) -> bool {
        let registry = self.registry.borrow();
        registry
            .lookup(filename)
            .is_some_and(|id| matches!(registry.get(id).state(), ModuleState::Loaded(_)))
    }

    /// The main module's `module` object
    pub fn main_module(&self) -> Option<JsObject> {
        let registry = self.registry.borrow();
        registry.main().map(|id| registry.get(id).module().clone())
    }

    /// Load `filename` as the main module. Its exports are discarded.
    pub fn require_main(&self, filename: &Path, context: &mut Context) -> JsResult<()> {
        let cwd = std::env::current_dir().map_err(|e| ScriptError::io(".", e).into_js_error(context))?;
        let filename = if filename.is_absolute() {
            filename.to_path_buf()
        } else {
            cwd.join(filename)
        };

        let resolved = self
            .resolver
            .resolve_from_dir(&filename.to_string_lossy(), &cwd)
            .map_err(|e| e.into_js_error(context))?;
        debug!(main = %resolved.display_name(), "loading main module");

        match resolved {
            Resolved::Script(path) => self.load_script(&path, None, true, context).map(drop),
            other => Err(ScriptError::Resolution {
                module: other.display_name(),
                reason: "only JavaScript files can be run".to_string(),
            }
            .into_js_error(context)),
        }
    }

    /// `require(specifier)` issued by module `parent` living in `dir`.
    pub fn require_module(
        &self,
        specifier: &str,
        parent: Option<ModuleId>,
        dir: &Path,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        let resolved = self
            .resolver
            .resolve_from_dir(specifier, dir)
            .map_err(|e| e.into_js_error(context))?;
        debug!(specifier, resolved = %resolved.display_name(), "resolved module");

        match resolved {
            Resolved::Builtin(name) => self.builtins.get(JsString::from(name.as_str()), context),
            Resolved::Script(path) => self.load_script(&path, parent, false, context),
            Resolved::Json(path) => self.load_json(&path, parent, context),
            Resolved::Native(path) => Err(ScriptError::Resolution {
                module: path.display().to_string(),
                reason: "native addons (.node) are not supported".to_string(),
            }
            .into_js_error(context)),
        }
    }

    fn load_script(
        &self,
        filename: &Path,
        parent: Option<ModuleId>,
        is_main: bool,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        if let Some(id) = self.cached_id(filename, context)? {
            return self.current_exports(id, context);
        }

        let id = self.register(filename, parent, is_main, context)?;
        self.execute(id, context)?;
        self.current_exports(id, context)
    }

    fn load_json(
        &self,
        filename: &Path,
        parent: Option<ModuleId>,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        if let Some(id) = self.cached_id(filename, context)? {
            return self.current_exports(id, context);
        }

        let text = load_source(filename).map_err(|e| e.into_js_error(context))?;
        let json: serde_json::Value = serde_json::from_str(&text).map_err(|source| {
            ScriptError::Json {
                path: filename.to_path_buf(),
                source,
            }
            .into_js_error(context)
        })?;
        let exports = JsValue::from_json(&json, context)?;

        let id = self.register(filename, parent, false, context)?;
        let module = self.registry.borrow().get(id).module().clone();
        interop::set(&module, "exports", exports.clone(), context)?;
        interop::set(&module, "loaded", true, context)?;
        self.registry
            .borrow_mut()
            .set_state(id, ModuleState::Loaded(exports.clone()));
        Ok(exports)
    }

    /// Registry id for `filename`, unless a script deleted its
    /// `require.cache` entry; that evicts the module and the next load runs
    /// it again.
    fn cached_id(&self, filename: &Path, context: &mut Context) -> JsResult<Option<ModuleId>> {
        let Some(id) = self.registry.borrow().lookup(filename) else {
            return Ok(None);
        };
        let key = JsString::from(filename.to_string_lossy().as_ref());
        if self.cache.has_own_property(key, context)? {
            return Ok(Some(id));
        }

        debug!(filename = %filename.display(), "evicted from require.cache");
        self.registry.borrow_mut().forget(id);
        Ok(None)
    }

    /// Cached exports, or the partial `module.exports` of a module that is
    /// still running (circular require).
    fn current_exports(&self, id: ModuleId, context: &mut Context) -> JsResult<JsValue> {
        let (state, module, filename) = {
            let registry = self.registry.borrow();
            let record = registry.get(id);
            (
                record.state().clone(),
                record.module().clone(),
                record.filename().to_path_buf(),
            )
        };

        match &state {
            ModuleState::Loaded(exports) => {
                debug!(filename = %filename.display(), "module cache hit");
                Ok(exports.clone())
            }
            ModuleState::InProgress | ModuleState::Unloaded => {
                debug!(filename = %filename.display(), "circular require, returning partial exports");
                module.get(js_string!("exports"), context)
            }
        }
    }

    /// Create the `module` object and its registry record.
    fn register(
        &self,
        filename: &Path,
        parent: Option<ModuleId>,
        is_main: bool,
        context: &mut Context,
    ) -> JsResult<ModuleId> {
        let module = JsObject::with_object_proto(context.intrinsics());
        let exports = JsObject::with_object_proto(context.intrinsics());
        let parent_module = parent.map(|id| self.registry.borrow().get(id).module().clone());
        let filename_text = filename.to_string_lossy();
        let dirname_text = filename
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string());

        let id_text = if is_main { "." } else { filename_text.as_ref() };
        interop::set(&module, "id", js_str(id_text), context)?;
        interop::set(&module, "exports", exports, context)?;
        interop::set(&module, "filename", js_str(&filename_text), context)?;
        interop::set(&module, "path", js_str(&dirname_text), context)?;
        interop::set(&module, "loaded", false, context)?;
        interop::set(
            &module,
            "parent",
            parent_module.clone().map(JsValue::from).unwrap_or_else(JsValue::null),
            context,
        )?;
        interop::set(&module, "children", JsArray::new(context), context)?;

        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.insert(filename.to_path_buf(), module.clone(), parent);
            if is_main {
                registry.set_main(id);
            }
            id
        };

        if let Some(parent_module) = parent_module {
            let children = parent_module.get(js_string!("children"), context)?;
            if let Some(children) = children.as_object() {
                if let Ok(children) = JsArray::from_object(children.clone()) {
                    children.push(module.clone(), context)?;
                }
            }
        }
        self.cache
            .set(JsString::from(filename_text.as_ref()), module, true, context)?;

        debug!(filename = %filename.display(), main = is_main, "registered module");
        Ok(id)
    }

    /// Run a registered module's source through the execution delegate.
    fn execute(&self, id: ModuleId, context: &mut Context) -> JsResult<()> {
        let (filename, dirname, module) = {
            let registry = self.registry.borrow();
            let record = registry.get(id);
            (
                record.filename().to_path_buf(),
                record.dirname().to_path_buf(),
                record.module().clone(),
            )
        };

        let source = match load_source(&filename) {
            Ok(source) => source,
            Err(err) => {
                self.unlink(id, context);
                return Err(err.into_js_error(context));
            }
        };

        self.registry
            .borrow_mut()
            .set_state(id, ModuleState::InProgress);
        let require = self.require_function(id, context)?;
        interop::set(&module, "require", require.clone(), context)?;
        let exports = module.get(js_string!("exports"), context)?;

        debug!(filename = %filename.display(), "executing module");
        self.stack.push(filename.clone());
        let outcome = delegate::execute(
            &source,
            ModuleScope {
                exports,
                require,
                module: module.clone(),
                filename: &filename,
                dirname: &dirname,
            },
            context,
        );
        self.stack.pop();

        if let Err(err) = outcome {
            self.unlink(id, context);
            return Err(err);
        }

        let exports = module.get(js_string!("exports"), context)?;
        interop::set(&module, "loaded", true, context)?;
        self.registry
            .borrow_mut()
            .set_state(id, ModuleState::Loaded(exports));
        Ok(())
    }

    /// Drop a module whose first load failed so a later `require` retries.
    fn unlink(&self, id: ModuleId, context: &mut Context) {
        let filename = self
            .registry
            .borrow()
            .get(id)
            .filename()
            .to_string_lossy()
            .into_owned();
        self.registry.borrow_mut().forget(id);
        // `require.cache` is script-writable; a missing entry is fine.
        let _ = self
            .cache
            .delete_property_or_throw(JsString::from(filename.as_str()), context);
    }

    /// Build the `require` function private to module `id`.
    fn require_function(&self, id: ModuleId, context: &mut Context) -> JsResult<JsObject> {
        let dirname = self.registry.borrow().get(id).dirname().to_path_buf();

        let require = interop::function(
            context,
            "require",
            1,
            NativeFunction::from_copy_closure_with_captures(
                |_this, args, capture: &RequireCapture, context| {
                    let specifier = interop::string_arg(args, 0, context)?;
                    capture
                        .loader
                        .require_module(&specifier, Some(capture.id), &capture.dirname, context)
                },
                RequireCapture {
                    loader: self.clone(),
                    id,
                    dirname: dirname.clone(),
                },
            ),
        );

        let resolve = interop::function(
            context,
            "resolve",
            1,
            NativeFunction::from_copy_closure_with_captures(
                |_this, args, capture: &RequireCapture, context| {
                    let specifier = interop::string_arg(args, 0, context)?;
                    match capture
                        .loader
                        .resolver
                        .resolve_from_dir(&specifier, &capture.dirname)
                    {
                        Ok(resolved) => Ok(js_str(&resolved.display_name())),
                        Err(err) => Err(err.into_js_error(context)),
                    }
                },
                RequireCapture {
                    loader: self.clone(),
                    id,
                    dirname,
                },
            ),
        );

        let main = self
            .main_module()
            .map(JsValue::from)
            .unwrap_or_else(JsValue::undefined);
        interop::set(&require, "resolve", resolve, context)?;
        interop::set(&require, "cache", self.cache.clone(), context)?;
        interop::set(&require, "main", main, context)?;
        Ok(require)
    }
}
