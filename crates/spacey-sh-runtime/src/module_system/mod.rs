// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS module system
//!
//! - [`resolver`] turns a specifier into an absolute path (Node.js rules)
//! - [`source`] reads module text (BOM and `#!` handling)
//! - [`registry`] tracks every module of the run by absolute path
//! - [`delegate`] compiles and runs module code inside the sandbox context
//! - [`loader`] ties them together behind `require()`

pub mod delegate;
mod loader;
pub mod registry;
pub mod resolver;
pub mod source;

pub use delegate::{ModuleScope, WRAPPER_PARAMETERS};
pub use loader::ModuleLoader;
pub use registry::{ExecutionStack, ModuleId, ModuleRecord, ModuleRegistry, ModuleState};
pub use resolver::{ModuleResolver, Resolved, EXTENSIONS};
pub use source::{load_source, strip_source_prefix};
