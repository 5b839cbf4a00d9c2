//! Feature-map memory layouts and the elementwise output-shape transform.
//!
//! The NPU consumes feature maps either in plain `NHWC` order or in the
//! channel-bricked `NHCWB16` order used by its internal memory format. The
//! bricked form pads the channel dimension to whole bricks, so a bricked
//! shape alone no longer determines the true channel count; shape inference
//! always takes the output channel count as an explicit attribute instead of
//! deriving it from an input shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::Shape;

/// Number of channels packed into one `NHCWB16` brick.
pub const CHANNEL_BRICK: usize = 16;

/// Memory order of a feature map tensor.
///
/// `Nhwc` shapes are `(1, H, W, C)`. `Nhcwb16` shapes are
/// `(1, H, ceil(C / 16), W, 16)`, with the last brick zero-padded when `C`
/// is not a multiple of 16.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureMapLayout {
    #[default]
    #[serde(rename = "NHWC")]
    Nhwc,
    #[serde(rename = "NHCWB16")]
    Nhcwb16,
}

impl FeatureMapLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureMapLayout::Nhwc => "NHWC",
            FeatureMapLayout::Nhcwb16 => "NHCWB16",
        }
    }

    /// Rank a feature map occupies in this layout.
    pub fn rank(self) -> usize {
        match self {
            FeatureMapLayout::Nhwc => 4,
            FeatureMapLayout::Nhcwb16 => 5,
        }
    }
}

impl fmt::Display for FeatureMapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a layout string from the construction surface is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature map layout '{0}' (expected 'NHWC' or 'NHCWB16')")]
pub struct ParseLayoutError(pub String);

impl FromStr for FeatureMapLayout {
    type Err = ParseLayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NHWC" => Ok(FeatureMapLayout::Nhwc),
            "NHCWB16" => Ok(FeatureMapLayout::Nhcwb16),
            other => Err(ParseLayoutError(other.to_string())),
        }
    }
}

/// Computes the output feature-map shape for an elementwise operator.
///
/// The spatial extents are read positionally from `ifm_shape` according to
/// `ifm_layout`; any channel information carried by a bricked input shape is
/// discarded because padding makes it untrustworthy. The channel dimension of
/// the result always comes from the caller-supplied `ofm_channels`.
///
/// # Panics
///
/// Panics if `ifm_shape` has fewer dimensions than `ifm_layout` requires.
/// The inference engine rejects rank-mismatched inputs before calling this.
pub fn elementwise_output_shape(
    ifm_shape: &Shape,
    ifm_layout: FeatureMapLayout,
    ofm_layout: FeatureMapLayout,
    ofm_channels: usize,
) -> Shape {
    let dims = ifm_shape.dims();
    let (height, width) = match ifm_layout {
        FeatureMapLayout::Nhwc => (dims[1], dims[2]),
        FeatureMapLayout::Nhcwb16 => (dims[1], dims[3]),
    };
    match ofm_layout {
        FeatureMapLayout::Nhwc => Shape::new([1, height, width, ofm_channels]),
        FeatureMapLayout::Nhcwb16 => Shape::new([
            1,
            height,
            ofm_channels.div_ceil(CHANNEL_BRICK),
            width,
            CHANNEL_BRICK,
        ]),
    }
}
