//! Attribute schema for the quantized unary elementwise operator family.
//!
//! An attribute block is built once at graph-construction time and never
//! mutated afterwards. Construction fills documented defaults and performs no
//! cross-field validation; legality of the configuration is decided lazily by
//! the type relation every time the node is checked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{FeatureMapLayout, ParseLayoutError};

/// Activation applied on the output feature-map path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Clip the output between `clip_min` and `clip_max`.
    #[serde(rename = "CLIP")]
    Clip,
    #[serde(rename = "TANH")]
    Tanh,
    #[serde(rename = "SIGMOID")]
    Sigmoid,
    /// Apply the activation through the lookup-table operand.
    #[serde(rename = "LUT")]
    Lut,
}

impl Activation {
    pub fn as_str(self) -> &'static str {
        match self {
            Activation::None => "NONE",
            Activation::Clip => "CLIP",
            Activation::Tanh => "TANH",
            Activation::Sigmoid => "SIGMOID",
            Activation::Lut => "LUT",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tie-breaking rule applied when quantized arithmetic rounds to an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    /// TensorFlow Lite rounding scheme.
    #[default]
    #[serde(rename = "TFL")]
    Tfl,
    /// Truncate towards zero.
    #[serde(rename = "TRUNCATE")]
    Truncate,
    /// Round to nearest, with x.5 rounded up towards positive infinity.
    #[serde(rename = "NATURAL")]
    Natural,
}

impl RoundingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::Tfl => "TFL",
            RoundingMode::Truncate => "TRUNCATE",
            RoundingMode::Natural => "NATURAL",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an attribute string from the construction surface is not in
/// its documented set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrParseError {
    #[error("unknown activation '{0}' (expected 'NONE', 'CLIP', 'TANH', 'SIGMOID' or 'LUT')")]
    UnknownActivation(String),
    #[error("unknown rounding mode '{0}' (expected 'TFL', 'TRUNCATE' or 'NATURAL')")]
    UnknownRoundingMode(String),
    #[error(transparent)]
    Layout(#[from] ParseLayoutError),
}

impl FromStr for Activation {
    type Err = AttrParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NONE" => Ok(Activation::None),
            "CLIP" => Ok(Activation::Clip),
            "TANH" => Ok(Activation::Tanh),
            "SIGMOID" => Ok(Activation::Sigmoid),
            "LUT" => Ok(Activation::Lut),
            other => Err(AttrParseError::UnknownActivation(other.to_string())),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = AttrParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TFL" => Ok(RoundingMode::Tfl),
            "TRUNCATE" => Ok(RoundingMode::Truncate),
            "NATURAL" => Ok(RoundingMode::Natural),
            other => Err(AttrParseError::UnknownRoundingMode(other.to_string())),
        }
    }
}

/// Affine mapping between a stored integer value and the real it represents.
///
/// Scale positivity and zero-point range against the element type are not
/// enforced anywhere in this layer; graphs carrying out-of-range values are
/// accepted and left for later compiler stages to judge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantParams {
    pub scale: f64,
    pub zero_point: i32,
}

impl QuantParams {
    pub fn new(scale: f64, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }
}

/// Declared configuration of one unary elementwise node.
///
/// `operator_type` stays a free-form string: the legal set belongs to the
/// registry entry rather than the type system, and unsupported values must
/// survive construction so the type relation can echo them in diagnostics.
/// `clip_min <= clip_max` is deliberately not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryElementwiseAttrs {
    pub operator_type: String,
    pub ifm_scale: f64,
    pub ifm_zero_point: i32,
    pub ofm_scale: f64,
    pub ofm_zero_point: i32,
    pub ofm_channels: usize,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub clip_min: i32,
    #[serde(default)]
    pub clip_max: i32,
    #[serde(default)]
    pub rounding_mode: RoundingMode,
    #[serde(default)]
    pub ifm_layout: FeatureMapLayout,
    #[serde(default)]
    pub ofm_layout: FeatureMapLayout,
}

impl UnaryElementwiseAttrs {
    pub fn ifm_quant(&self) -> QuantParams {
        QuantParams::new(self.ifm_scale, self.ifm_zero_point)
    }

    pub fn ofm_quant(&self) -> QuantParams {
        QuantParams::new(self.ofm_scale, self.ofm_zero_point)
    }

    /// Clip bounds, present only when the activation is `CLIP`.
    pub fn clip_range(&self) -> Option<(i32, i32)> {
        match self.activation {
            Activation::Clip => Some((self.clip_min, self.clip_max)),
            _ => None,
        }
    }
}

/// Attribute block attached to a graph node, tagged by operator family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpAttrs {
    #[serde(rename = "unary_elementwise")]
    UnaryElementwise(UnaryElementwiseAttrs),
}

/// Documentation record for one schema field.
///
/// The table below exists for introspection and serialization tooling only;
/// runtime behavior never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrFieldInfo {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub description: &'static str,
}

pub const UNARY_ELEMENTWISE_ATTR_FIELDS: &[AttrFieldInfo] = &[
    AttrFieldInfo {
        name: "operator_type",
        default: None,
        description: "The elementwise operation to perform. 'ABS'.",
    },
    AttrFieldInfo {
        name: "ifm_scale",
        default: None,
        description: "Quantization scale of the input feature map.",
    },
    AttrFieldInfo {
        name: "ifm_zero_point",
        default: None,
        description: "Quantization zero point of the input feature map.",
    },
    AttrFieldInfo {
        name: "ofm_scale",
        default: None,
        description: "Quantization scale of the output feature map.",
    },
    AttrFieldInfo {
        name: "ofm_zero_point",
        default: None,
        description: "Quantization zero point of the output feature map.",
    },
    AttrFieldInfo {
        name: "ofm_channels",
        default: None,
        description: "Number of channels in the output feature map.",
    },
    AttrFieldInfo {
        name: "activation",
        default: Some("NONE"),
        description: "Activation applied to the output. \
                      'NONE', 'CLIP', 'TANH', 'SIGMOID' or 'LUT'.",
    },
    AttrFieldInfo {
        name: "clip_min",
        default: Some("0"),
        description: "Lower clip bound when activation is 'CLIP'.",
    },
    AttrFieldInfo {
        name: "clip_max",
        default: Some("0"),
        description: "Upper clip bound when activation is 'CLIP'.",
    },
    AttrFieldInfo {
        name: "rounding_mode",
        default: Some("TFL"),
        description: "Rounding applied to the output. 'TFL', 'TRUNCATE' or 'NATURAL'.",
    },
    AttrFieldInfo {
        name: "ifm_layout",
        default: Some("NHWC"),
        description: "Memory layout of the input feature map. 'NHWC' or 'NHCWB16'.",
    },
    AttrFieldInfo {
        name: "ofm_layout",
        default: Some("NHWC"),
        description: "Memory layout of the output feature map. 'NHWC' or 'NHCWB16'.",
    },
];
