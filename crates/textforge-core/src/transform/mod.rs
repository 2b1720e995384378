//! Named text transformation system
//!
//! This module turns an ordered list of transformation names into a
//! [`Pipeline`] and applies it to text. Each stage sees the output of every
//! stage named before it, so the first name's effect is applied first and
//! the last name's effect is applied last.
//!
//! # Module Organization
//!
//! - [`types`] - the closed [`TransformKind`] vocabulary and the [`TextTransform`] seam
//! - [`pipeline`] - resolution of names into a composed pipeline
//! - [`builder`] - fluent builder API for assembling pipelines
//! - [`case`] - case and structural transforms (upper, lower, capitalize, inverse, removeduplicates)
//! - [`phrases`] - fixed dictionaries (abbreviate, expand, latex)
//! - [`numbers`] - Polish cardinal number-to-words conversion
//!
//! # Examples
//!
//! ```
//! use textforge_core::transform::{Pipeline, TransformKind};
//!
//! let pipeline = Pipeline::resolve(["expand", "capitalize"]).unwrap();
//! assert_eq!(pipeline.stages(), &[TransformKind::Expand, TransformKind::Capitalize]);
//! assert_eq!(pipeline.apply("np. kot"), "Na przykład kot");
//! ```
//!
//! Order matters:
//!
//! ```
//! use textforge_core::transform::Pipeline;
//!
//! let lower_first = Pipeline::resolve(["lower", "capitalize"]).unwrap();
//! let capitalize_first = Pipeline::resolve(["capitalize", "lower"]).unwrap();
//! assert_eq!(lower_first.apply("HELLO"), "Hello");
//! assert_eq!(capitalize_first.apply("HELLO"), "hello");
//! ```
//!
//! Copyright (c) 2025 Textforge Team
//! Licensed under the Apache-2.0 license

// Vocabulary and the transform seam
pub mod types;

// Name resolution and composition
pub mod pipeline;

// Builder API
pub mod builder;

// Algorithms
pub mod case;
pub mod numbers;
pub mod phrases;


pub use builder::PipelineBuilder;
pub use pipeline::Pipeline;
pub use types::{TextTransform, TransformKind, DEFAULT_TRANSFORMS};
