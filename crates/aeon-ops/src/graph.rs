//! Graph nodes for registered operators and the builders that assemble them.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attrs::{Activation, OpAttrs, QuantParams, RoundingMode, UnaryElementwiseAttrs};
use crate::env;
use crate::layout::FeatureMapLayout;
use crate::registry::{self, Registry, UNARY_ELEMENTWISE};
use crate::relation::{TypeCheckError, TypeCheckResult};
use crate::spec::TensorType;

/// Reference to a value produced elsewhere in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperandRef(pub u32);

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Raised when a node fails to round-trip through an interchange format.
#[derive(Debug, Error)]
pub enum NodeSerdeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// One operator application in the program graph.
///
/// The operator tag, operand list, and attribute block are fixed at
/// construction. The output type slot stays empty until the first successful
/// type check and is immutable afterwards, so repeated checks across compiler
/// passes observe the identical type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    op: String,
    operands: Vec<OperandRef>,
    attrs: OpAttrs,
    #[serde(skip)]
    output: OnceLock<TensorType>,
}

impl GraphNode {
    pub fn new(op: impl Into<String>, operands: Vec<OperandRef>, attrs: OpAttrs) -> Self {
        Self {
            op: op.into(),
            operands,
            attrs,
            output: OnceLock::new(),
        }
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn operands(&self) -> &[OperandRef] {
        &self.operands
    }

    pub fn attrs(&self) -> &OpAttrs {
        &self.attrs
    }

    /// Output type computed by the last successful type check, if any.
    pub fn output(&self) -> Option<&TensorType> {
        self.output.get()
    }

    /// Type-checks the node against `registry`, recording the output type on
    /// success. On failure the output slot is left unset and the failure is
    /// returned for the caller to report.
    pub fn type_check_with(
        &self,
        registry: &Registry,
        inputs: &[TensorType],
    ) -> TypeCheckResult<&TensorType> {
        let entry = registry
            .lookup(&self.op)
            .ok_or_else(|| TypeCheckError::UnknownOperator {
                found: self.op.clone(),
            })?;
        let result = entry.infer(inputs, &self.attrs);
        if env::trace_typecheck_enabled() {
            match &result {
                Ok(output) => eprintln!("[typecheck] {} => {output}", self.op),
                Err(err) => eprintln!("[typecheck] {} !! {err}", self.op),
            }
        }
        let output = result?;
        Ok(self.output.get_or_init(|| output))
    }

    /// Type-checks against the process-wide registry.
    pub fn type_check(&self, inputs: &[TensorType]) -> TypeCheckResult<&TensorType> {
        self.type_check_with(registry::global(), inputs)
    }

    pub fn to_json_string(&self) -> Result<String, NodeSerdeError> {
        serde_json::to_string_pretty(self).map_err(NodeSerdeError::from)
    }

    pub fn from_json_str(src: &str) -> Result<Self, NodeSerdeError> {
        serde_json::from_str(src).map_err(NodeSerdeError::from)
    }

    pub fn to_bincode_bytes(&self) -> Result<Vec<u8>, NodeSerdeError> {
        bincode::serialize(self).map_err(NodeSerdeError::from)
    }

    pub fn from_bincode_slice(bytes: &[u8]) -> Result<Self, NodeSerdeError> {
        bincode::deserialize(bytes).map_err(NodeSerdeError::from)
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.op)?;
        for (index, operand) in self.operands.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ")")?;
        match &self.attrs {
            OpAttrs::UnaryElementwise(attrs) => {
                write!(
                    f,
                    " {{operator_type=\"{}\", activation={}, rounding_mode={}, \
                     ifm_layout={}, ofm_layout={}, ofm_channels={}}}",
                    attrs.operator_type,
                    attrs.activation,
                    attrs.rounding_mode,
                    attrs.ifm_layout,
                    attrs.ofm_layout,
                    attrs.ofm_channels,
                )?;
            }
        }
        if let Some(output) = self.output.get() {
            write!(f, " -> {output}")?;
        }
        Ok(())
    }
}

/// Staged construction of a unary elementwise node.
///
/// Required operands and quantization come in through [`new`]; the remaining
/// fields fall back to the schema defaults until overridden. `build` performs
/// no validation; legality is decided lazily, every time the node is
/// type-checked.
///
/// [`new`]: UnaryElementwiseBuilder::new
pub struct UnaryElementwiseBuilder {
    ifm: OperandRef,
    lut: OperandRef,
    attrs: UnaryElementwiseAttrs,
}

impl UnaryElementwiseBuilder {
    pub fn new(
        ifm: OperandRef,
        lut: OperandRef,
        operator_type: impl Into<String>,
        ifm_quant: QuantParams,
        ofm_quant: QuantParams,
        ofm_channels: usize,
    ) -> Self {
        Self {
            ifm,
            lut,
            attrs: UnaryElementwiseAttrs {
                operator_type: operator_type.into(),
                ifm_scale: ifm_quant.scale,
                ifm_zero_point: ifm_quant.zero_point,
                ofm_scale: ofm_quant.scale,
                ofm_zero_point: ofm_quant.zero_point,
                ofm_channels,
                activation: Activation::default(),
                clip_min: 0,
                clip_max: 0,
                rounding_mode: RoundingMode::default(),
                ifm_layout: FeatureMapLayout::default(),
                ofm_layout: FeatureMapLayout::default(),
            },
        }
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.attrs.activation = activation;
        self
    }

    /// Sets the clip bounds used when the activation is `CLIP`. Ordering of
    /// the bounds is not checked.
    pub fn clip(mut self, clip_min: i32, clip_max: i32) -> Self {
        self.attrs.clip_min = clip_min;
        self.attrs.clip_max = clip_max;
        self
    }

    pub fn rounding_mode(mut self, rounding_mode: RoundingMode) -> Self {
        self.attrs.rounding_mode = rounding_mode;
        self
    }

    pub fn ifm_layout(mut self, layout: FeatureMapLayout) -> Self {
        self.attrs.ifm_layout = layout;
        self
    }

    pub fn ofm_layout(mut self, layout: FeatureMapLayout) -> Self {
        self.attrs.ofm_layout = layout;
        self
    }

    pub fn build(self) -> GraphNode {
        GraphNode::new(
            UNARY_ELEMENTWISE,
            vec![self.ifm, self.lut],
            OpAttrs::UnaryElementwise(self.attrs),
        )
    }
}
