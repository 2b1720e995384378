//! Transformation pipeline implementation
//!
//! A [`Pipeline`] is an ordered list of [`TransformKind`] stages over an
//! implicit identity base. Applying it folds the text through the stages
//! left to right, which gives the same net order as a chain of wrappers
//! where each wrapper first delegates to the one it wraps.
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

use super::types::{TextTransform, TransformKind};
use crate::error::Result;
use tracing::{debug, trace};

/// A composed, immutable chain of transformations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    /// Stages in application order
    stages: Vec<TransformKind>,
}

impl Pipeline {
    /// The identity pipeline: returns its input unchanged
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a pipeline from already-resolved stages
    pub fn new(stages: Vec<TransformKind>) -> Self {
        Self { stages }
    }

    /// Resolve an ordered sequence of names into a pipeline.
    ///
    /// Fails on the first unknown name; nothing is applied and no partial
    /// pipeline is returned.
    pub fn resolve<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stages = names
            .into_iter()
            .map(|name| TransformKind::from_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let pipeline = Self::new(stages);
        debug!(stages = ?pipeline.names(), "resolved transformation pipeline");
        Ok(pipeline)
    }

    /// Append a stage; it runs after every stage already present
    pub fn then(mut self, kind: TransformKind) -> Self {
        self.stages.push(kind);
        self
    }

    /// Stages in application order
    pub fn stages(&self) -> &[TransformKind] {
        &self.stages
    }

    /// Canonical stage names in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|kind| kind.name()).collect()
    }

    /// Number of stages, not counting the identity base
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True for the identity pipeline
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Apply every stage in order
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (index, stage) in self.stages.iter().enumerate() {
            current = stage.apply(&current);
            trace!(index, stage = stage.name(), len = current.len(), "applied stage");
        }
        current
    }
}

impl TextTransform for Pipeline {
    fn apply(&self, text: &str) -> String {
        Pipeline::apply(self, text)
    }
}

impl FromIterator<TransformKind> for Pipeline {
    fn from_iter<T: IntoIterator<Item = TransformKind>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
