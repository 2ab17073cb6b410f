//! Processing-resolution math.
//!
//! The generator expects both spatial axes to be multiples of 32, and small
//! inputs are lifted to a 256 floor.

use crate::types::Dimensions;

/// Spatial alignment required by the network.
pub const ALIGNMENT: u32 = 32;

/// Smallest edge fed to the network.
pub const MIN_EDGE: u32 = 256;

/// Map one edge length to the processing resolution.
///
/// Values below [`MIN_EDGE`] become exactly `MIN_EDGE`; everything else is
/// rounded *down* to the nearest multiple of [`ALIGNMENT`].
pub fn normalize(x: u32) -> u32 {
    if x < MIN_EDGE {
        return MIN_EDGE;
    }
    x - x % ALIGNMENT
}

/// Apply [`normalize`] to both axes independently.
pub fn normalized_dimensions(dims: Dimensions) -> Dimensions {
    Dimensions::new(normalize(dims.width), normalize(dims.height))
}
