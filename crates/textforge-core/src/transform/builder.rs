//! Builder for assembling pipelines
//!
//! Names are collected as given and only validated in [`PipelineBuilder::build`],
//! so a builder can be filled from user input and rejected in one place.
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use super::pipeline::Pipeline;
use super::types::{TransformKind, DEFAULT_TRANSFORMS};
use crate::error::Result;

/// Fluent builder for [`Pipeline`]
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    names: Vec<String>,
    fallback: Option<Vec<String>>,
}

impl PipelineBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage by name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Append several stages by name
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append a stage by kind
    pub fn kind(mut self, kind: TransformKind) -> Self {
        self.names.push(kind.name().to_string());
        self
    }

    /// Stages to use if no name was added
    pub fn fallback<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Use [`DEFAULT_TRANSFORMS`] if no name was added
    pub fn default_fallback(self) -> Self {
        self.fallback(DEFAULT_TRANSFORMS.iter().copied())
    }

    /// Resolve the collected names
    pub fn build(self) -> Result<Pipeline> {
        let names = match (self.names.is_empty(), self.fallback) {
            (true, Some(fallback)) => fallback,
            _ => self.names,
        };
        Pipeline::resolve(names)
    }
}
