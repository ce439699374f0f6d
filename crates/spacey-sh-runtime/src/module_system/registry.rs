// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module registry for require()
//!
//! Records live in a `Vec` and are addressed by [`ModuleId`]; a path index
//! maps absolute filenames to ids. Records are never removed, only
//! unlinked from the path index when their first execution throws or the
//! script deletes their `require.cache` entry.

use boa_engine::{JsObject, JsValue};
use boa_gc::{Finalize, Trace};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Index of a record in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(usize);

/// Load state of a module
#[derive(Debug, Clone, Trace, Finalize)]
pub enum ModuleState {
    /// Registered, wrapper not started
    Unloaded,
    /// Wrapper is running; `module.exports` may be partially populated
    InProgress,
    /// Wrapper returned; the final `module.exports`
    Loaded(JsValue),
}

/// One module, identified by its absolute filename
#[derive(Debug, Trace, Finalize)]
pub struct ModuleRecord {
    #[unsafe_ignore_trace]
    filename: PathBuf,
    #[unsafe_ignore_trace]
    dirname: PathBuf,
    /// The script-visible `module` object
    module: JsObject,
    state: ModuleState,
    #[unsafe_ignore_trace]
    parent: Option<ModuleId>,
    #[unsafe_ignore_trace]
    children: Vec<ModuleId>,
}

impl ModuleRecord {
    /// Absolute path of the module
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Directory containing the module
    pub fn dirname(&self) -> &Path {
        &self.dirname
    }

    /// The script-visible `module` object
    pub fn module(&self) -> &JsObject {
        &self.module
    }

    /// Current load state
    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    /// Module that first required this one
    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    /// Modules first required by this one
    pub fn children(&self) -> &[ModuleId] {
        &self.children
    }
}

/// Every module loaded during one run
#[derive(Debug, Default, Trace, Finalize)]
pub struct ModuleRegistry {
    records: Vec<ModuleRecord>,
    #[unsafe_ignore_trace]
    by_path: HashMap<PathBuf, ModuleId>,
    #[unsafe_ignore_trace]
    main: Option<ModuleId>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the live record for `filename`
    pub fn lookup(&self, filename: &Path) -> Option<ModuleId> {
        self.by_path.get(filename).copied()
    }

    /// Register a new module in the `Unloaded` state.
    pub fn insert(
        &mut self,
        filename: PathBuf,
        module: JsObject,
        parent: Option<ModuleId>,
    ) -> ModuleId {
        let id = ModuleId(self.records.len());
        let dirname = filename
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        self.by_path.insert(filename.clone(), id);
        self.records.push(ModuleRecord {
            filename,
            dirname,
            module,
            state: ModuleState::Unloaded,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.records[parent.0].children.push(id);
        }
        id
    }

    /// Get a record
    pub fn get(&self, id: ModuleId) -> &ModuleRecord {
        &self.records[id.0]
    }

    /// Move a record to a new state
    pub fn set_state(&mut self, id: ModuleId, state: ModuleState) {
        self.records[id.0].state = state;
    }

    /// Unlink a record from the path index so the next `require` starts over.
    pub fn forget(&mut self, id: ModuleId) {
        let record = &mut self.records[id.0];
        record.state = ModuleState::Unloaded;
        if self.by_path.get(&record.filename) == Some(&id) {
            self.by_path.remove(&record.filename);
        }
    }

    /// The entry module of the run
    pub fn main(&self) -> Option<ModuleId> {
        self.main
    }

    /// Mark the entry module
    pub fn set_main(&mut self, id: ModuleId) {
        self.main = Some(id);
    }

    /// Get the number of live modules
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Check if no module is live
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Filenames of all live modules
    pub fn filenames(&self) -> impl Iterator<Item = &Path> {
        self.by_path.keys().map(PathBuf::as_path)
    }
}

/// Filenames of modules whose top-level code is currently running,
/// innermost last.
#[derive(Debug, Clone, Default, Trace, Finalize)]
pub struct ExecutionStack(#[unsafe_ignore_trace] Rc<RefCell<Vec<PathBuf>>>);

impl ExecutionStack {
    /// Enter a module's top-level code
    pub fn push(&self, filename: PathBuf) {
        self.0.borrow_mut().push(filename);
    }

    /// Leave the innermost module
    pub fn pop(&self) -> Option<PathBuf> {
        self.0.borrow_mut().pop()
    }

    /// Filename of the innermost running module
    pub fn current(&self) -> Option<PathBuf> {
        self.0.borrow().last().cloned()
    }

    /// Number of nested module executions
    pub fn depth(&self) -> usize {
        self.0.borrow().len()
    }
}
