//! Type relations: per-family validation and output-type inference.
//!
//! A type relation is a pure function from input tensor types and an
//! attribute block to the output tensor type. The surrounding compiler calls
//! it through the registry every time a pass re-checks a node, so relations
//! must be deterministic and free of side effects.

use std::fmt;

use crate::attrs::OpAttrs;
use crate::layout::{elementwise_output_shape, FeatureMapLayout};
use crate::spec::{DType, InputRole, TensorType};

/// Operand roles accepted by the unary elementwise family, in call order.
pub const UNARY_ELEMENTWISE_INPUT_ROLES: &[InputRole] = &[InputRole::Ifm, InputRole::Lut];

/// Operator variants the unary elementwise entry accepts.
pub const UNARY_ELEMENTWISE_VARIANTS: &[&str] = &["ABS"];

/// Element types the quantized elementwise families accept for the IFM.
pub const QUANTIZED_IFM_DTYPES: &[DType] = &[DType::Si8, DType::Ui8];

/// Terminal failure of one node's type check.
///
/// Every variant is fatal for the node being checked: no output type is
/// produced and the compiler must stop propagating types through the node.
/// There is no retry and no partial recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheckError {
    /// The node's tag is not present in the registry.
    UnknownOperator { found: String },
    /// Wrong number of typed inputs supplied.
    ArityMismatch { expected: usize, found: usize },
    /// The variant attribute is outside the entry's supported set.
    UnsupportedVariant {
        found: String,
        supported: &'static [&'static str],
    },
    /// The IFM element type is outside the family's supported set.
    UnsupportedElementType {
        found: DType,
        supported: &'static [DType],
    },
    /// The IFM shape rank does not match the declared input layout.
    LayoutRankMismatch {
        layout: FeatureMapLayout,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCheckError::UnknownOperator { found } => {
                write!(f, "no operator registered under '{found}'")
            }
            TypeCheckError::ArityMismatch { expected, found } => {
                write!(
                    f,
                    "invalid operator: expected {expected} typed inputs but {found} were supplied"
                )
            }
            TypeCheckError::UnsupportedVariant { found, supported } => {
                write!(
                    f,
                    "invalid operator: expected operator_type '{}' but was '{found}'",
                    supported.join("' or '")
                )
            }
            TypeCheckError::UnsupportedElementType { found, supported } => {
                let supported = supported
                    .iter()
                    .map(|dtype| dtype.as_str())
                    .collect::<Vec<_>>()
                    .join(" or ");
                write!(
                    f,
                    "invalid operator: expected input feature map of type {supported} but was {found}"
                )
            }
            TypeCheckError::LayoutRankMismatch {
                layout,
                expected,
                found,
            } => {
                write!(
                    f,
                    "invalid operator: {layout} input feature map must have rank {expected} but had rank {found}"
                )
            }
        }
    }
}

impl std::error::Error for TypeCheckError {}

/// Convenience alias for results returned by type relations.
pub type TypeCheckResult<T> = Result<T, TypeCheckError>;

/// Uniform inference contract implemented by every operator family.
///
/// The registry stores a reference to the implementation; dispatch happens
/// through this trait rather than a dynamically typed callback.
pub trait TypeRelation: Send + Sync {
    /// Relation name used in trace output.
    fn name(&self) -> &'static str;

    /// Validates `inputs` against `attrs` and computes the output type.
    fn infer(&self, inputs: &[TensorType], attrs: &OpAttrs) -> TypeCheckResult<TensorType>;
}

/// Type relation for the quantized unary elementwise family.
///
/// Checks run in a fixed order, short-circuiting on the first failure:
/// arity, variant, IFM element type, IFM rank against the declared layout,
/// then shape inference. The lookup-table operand is typed but its contents
/// are not validated here. The output inherits the IFM element type; its
/// shape is rebuilt from the declared output layout and channel count.
pub struct UnaryElementwiseRelation;

impl TypeRelation for UnaryElementwiseRelation {
    fn name(&self) -> &'static str {
        "UnaryElementwise"
    }

    fn infer(&self, inputs: &[TensorType], attrs: &OpAttrs) -> TypeCheckResult<TensorType> {
        let OpAttrs::UnaryElementwise(attrs) = attrs;

        if inputs.len() != UNARY_ELEMENTWISE_INPUT_ROLES.len() {
            return Err(TypeCheckError::ArityMismatch {
                expected: UNARY_ELEMENTWISE_INPUT_ROLES.len(),
                found: inputs.len(),
            });
        }
        let ifm = &inputs[0];

        if !UNARY_ELEMENTWISE_VARIANTS.contains(&attrs.operator_type.as_str()) {
            return Err(TypeCheckError::UnsupportedVariant {
                found: attrs.operator_type.clone(),
                supported: UNARY_ELEMENTWISE_VARIANTS,
            });
        }

        if !QUANTIZED_IFM_DTYPES.contains(&ifm.dtype) {
            return Err(TypeCheckError::UnsupportedElementType {
                found: ifm.dtype,
                supported: QUANTIZED_IFM_DTYPES,
            });
        }

        let expected_rank = attrs.ifm_layout.rank();
        if ifm.shape.rank() != expected_rank {
            return Err(TypeCheckError::LayoutRankMismatch {
                layout: attrs.ifm_layout,
                expected: expected_rank,
                found: ifm.shape.rank(),
            });
        }

        let ofm_shape = elementwise_output_shape(
            &ifm.shape,
            attrs.ifm_layout,
            attrs.ofm_layout,
            attrs.ofm_channels,
        );
        Ok(TensorType::new(ifm.dtype, ofm_shape))
    }
}
