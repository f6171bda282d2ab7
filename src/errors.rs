//! Error Types
//!
//! This module defines the error type used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`ArborError`] covers every failure mode of the scene
//! graph and the renderer:
//! - Invalid arguments (out-of-range matrix indices, bad colors, cycles)
//! - Operations an entity kind does not support (scaling a camera, moving an
//!   ambient light)
//! - Calls made in the wrong state (rendering before a window is bound)
//! - GPU resource creation failures reported by the graphics device
//! - Lookups of unknown resources (shaders, entities)
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ArborError>`.
//!
//! ```rust,ignore
//! use arbor::errors::{ArborError, Result};
//!
//! fn scale_camera(scene: &mut Scene, camera: EntityHandle) -> Result<()> {
//!     scene.entity_mut(camera)?.set_scaling(Vector3::splat(2.0))
//! }
//! ```
//!
//! Mutators validate before writing, so an `Err` always means the target was
//! left untouched.

use thiserror::Error;

/// The main error type for the Arbor engine.
#[derive(Error, Debug)]
pub enum ArborError {
    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// An argument was outside the accepted range or otherwise malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The entity kind does not support the requested operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The operation requires initialization that has not happened yet.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A GPU resource (buffer, shader program) could not be created.
    #[error("Failed to instantiate {resource}: {reason}")]
    Instantiation {
        /// Description of the resource being created
        resource: String,
        /// Reason reported by the device
        reason: String,
    },

    /// A named resource or entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Renderer settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl ArborError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Alias for `Result<T, ArborError>`.
pub type Result<T> = std::result::Result<T, ArborError>;
