// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeMap;

use crate::engine::{CheckEngine, EmitFn};
use crate::event::RunRequest;
use crate::message::{EngineMessage, ProgressUpdate};
use crate::registry::{CheckDefinition, CheckRegistry};

/// A two-check catalog used across tests.
pub fn small_registry() -> CheckRegistry {
    CheckRegistry::from_definitions([
        (
            "com.google.fonts/check/unitsperem".to_string(),
            CheckDefinition {
                description: "Checking unitsPerEm value is reasonable.".to_string(),
                profiles: ["opentype".to_string(), "universal".to_string()].into(),
                sections: vec!["head".to_string()],
                ..Default::default()
            },
        ),
        (
            "com.google.fonts/check/name/trailing_spaces".to_string(),
            CheckDefinition {
                description: "Name table records must not have trailing spaces.".to_string(),
                rationale: Some("Trailing spaces confuse installers.".to_string()),
                profiles: ["universal".to_string()].into(),
                sections: vec!["Name table checks".to_string()],
                ..Default::default()
            },
        ),
    ])
}

/// What a [`ScriptedEngine`] records about the requests it served.
#[derive(Debug, Default)]
pub struct ScriptedCalls {
    pub loads: usize,
    pub runs: Vec<RunRequest>,
}

/// An in-process engine that replays a fixed message script per run.
pub struct ScriptedEngine {
    pub load_result: Result<(), String>,
    pub version: String,
    pub script: Vec<EngineMessage>,
    pub run_result: Result<(), String>,
    pub calls: ScriptedCalls,
}

impl ScriptedEngine {
    pub fn new(script: Vec<EngineMessage>) -> Self {
        Self {
            load_result: Ok(()),
            version: "0.12.10".to_string(),
            script,
            run_result: Ok(()),
            calls: ScriptedCalls::default(),
        }
    }

    pub fn failing_load(message: &str) -> Self {
        Self {
            load_result: Err(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn failing_run(message: &str, script: Vec<EngineMessage>) -> Self {
        Self {
            run_result: Err(message.to_string()),
            ..Self::new(script)
        }
    }
}

impl CheckEngine for ScriptedEngine {
    fn load(&mut self) -> Result<(), String> {
        self.calls.loads += 1;
        self.load_result.clone()
    }

    fn version(&mut self) -> Result<String, String> {
        Ok(self.version.clone())
    }

    fn list_checks(&mut self) -> Result<BTreeMap<String, CheckDefinition>, String> {
        Ok(small_registry()
            .iter()
            .map(|(id, def)| (id.to_string(), def.clone()))
            .collect())
    }

    fn run(&mut self, request: &RunRequest, emit: EmitFn) -> Result<(), String> {
        self.calls.runs.push(request.clone());
        for message in self.script.clone() {
            emit(message);
        }
        self.run_result.clone()
    }
}

/// Progress message with only a percentage.
pub fn progress(percent: f64) -> EngineMessage {
    EngineMessage::Progress(ProgressUpdate {
        percent,
        counts: BTreeMap::new(),
    })
}
