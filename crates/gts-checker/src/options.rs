//! Inference options.
//!
//! Loaded by the host from JSON (`{"sourceMode": "dynamic"}`); every field
//! has a default so partial documents are accepted.

use anyhow::Context;
use gts_common::limits::MAX_INFERENCE_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Typing discipline of the code being inferred.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Typed,
    /// Plain untyped code: unannotated variables, parameters and catch
    /// variables are dynamic-any.
    Dynamic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceOptions {
    pub source_mode: SourceMode,
    /// Nesting depth of `infer` beyond which `[unknown]` is returned.
    pub max_inference_depth: u32,
    /// Whether explicit `simplify` calls report removed union/intersection
    /// members.
    pub report_redundant_members: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::Typed,
            max_inference_depth: MAX_INFERENCE_DEPTH,
            report_redundant_members: true,
        }
    }
}

impl InferenceOptions {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid inference options")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inference options from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.source_mode == SourceMode::Dynamic
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
