//! Textforge Core - named, order-sensitive text transformation pipelines
//!
//! This crate resolves an ordered list of transformation names into a
//! [`Pipeline`] and applies it to text. The effect of the first name is
//! applied first and the effect of the last name is applied last.
//!
//! # Main Components
//!
//! - **Error Handling**: a single [`Error::UnknownTransformation`] kind using `thiserror`
//! - **Vocabulary**: [`TransformKind`], the closed set of named transformations
//! - **Resolver**: [`Pipeline::resolve`] and [`PipelineBuilder`]
//! - **Algorithms**: case and structural transforms, phrase dictionaries,
//!   LaTeX escaping and Polish number-to-words conversion
//!
//! # Example
//!
//! ```
//! use textforge_core::{Pipeline, Result};
//!
//! fn example() -> Result<()> {
//!     let pipeline = Pipeline::resolve(["lower", "capitalize"])?;
//!     assert_eq!(pipeline.apply("HELLO"), "Hello");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod transform;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use transform::{Pipeline, PipelineBuilder, TextTransform, TransformKind, DEFAULT_TRANSFORMS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve `names` and apply the resulting pipeline to `text` in one step
pub fn transform<I, S>(names: I, text: &str) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pipeline = Pipeline::resolve(names)?;
    Ok(pipeline.apply(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_transform_shortcut() {
        assert_eq!(transform(["upper"], "abc").unwrap(), "ABC");
        assert_eq!(
            transform(["nope"], "abc"),
            Err(Error::unknown_transformation("nope"))
        );
    }
}
