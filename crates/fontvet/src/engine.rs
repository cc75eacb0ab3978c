// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The boundary to the external check-running engine.
//!
//! The engine is an opaque collaborator: it parses fonts and executes
//! validation rules, none of which is implemented here. This trait
//! pins down its invocation contract; a real implementation hosts an
//! embedded interpreter or talks to a subprocess, and any byte
//! transport decodes incoming payloads with
//! [`EngineMessage::decode`](crate::message::EngineMessage::decode)
//! before they cross this boundary.
//!
//! Errors at this boundary are raw strings: whatever the engine says
//! is shown to the user verbatim.

use std::collections::BTreeMap;

use crate::event::RunRequest;
use crate::message::EngineMessage;
use crate::registry::CheckDefinition;

/// Emits messages from a running engine back to the session.
pub type EmitFn<'a> = &'a mut dyn FnMut(EngineMessage);

/// Contract for the external validation engine.
pub trait CheckEngine: Send + 'static {
    /// One-time warm-up. Expensive (interpreter boot, package
    /// installs); called once per session before anything else.
    fn load(&mut self) -> std::result::Result<(), String>;

    /// Engine version string, reported at the start of each run.
    fn version(&mut self) -> std::result::Result<String, String>;

    /// Metadata dump of every check the engine knows, keyed by id.
    fn list_checks(&mut self)
    -> std::result::Result<BTreeMap<String, CheckDefinition>, String>;

    /// Execute a run, emitting `Progress` and `Result` messages as
    /// checks complete. Returning `Ok` means the run ran to the end;
    /// the session appends the `Done` marker itself.
    fn run(&mut self, request: &RunRequest, emit: EmitFn) -> std::result::Result<(), String>;
}
