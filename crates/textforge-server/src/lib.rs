//! Textforge Server - HTTP adapter for the transformation pipeline
//!
//! Exposes two request styles over the same pipeline:
//!
//! - `GET /classic/{text}?transforms=a,b` returns the transformed text as plain text
//! - `POST /formatted/transform` takes `{"text": ..., "transforms": [...]}` and
//!   returns `{"transformedText": ...}`
//!
//! Unknown transformation names are answered with `400` and a JSON body
//! carrying an `error` field.

pub mod config;
mod server;

pub use config::*;
pub use server::{build_api_router, build_app_router, serve, ApiState, ServerError};
