//! Image processing pipeline components.
//!
//! This module contains all the stages of the stylization pipeline:
//! - **discovery**: Find image files in directories
//! - **validate**: Pre-processing validation
//! - **decode**: Load and decode images
//! - **encode**: Encode stylized images by output extension
//! - **processor**: Runs one image through every stage
//! - **batch**: Drives a whole directory, one image at a time

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod processor;
pub mod validate;

// Re-exports for convenient access
pub use batch::{BatchDriver, BatchEvent, BatchOutcome, FailurePolicy};
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::ImageEncoder;
pub use processor::ImageProcessor;
pub use validate::Validator;
