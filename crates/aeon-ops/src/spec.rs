//! Frozen contract types shared between graph construction and type checking.
//!
//! Everything here is immutable value data: element kinds, shapes, and the
//! tensor metadata the type-checking pass propagates. Serialized forms of
//! these types are part of the graph interchange format and must stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar element kinds the Aeon toolchain can store in a feature map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Si8,
    Ui8,
    Si16,
    Ui16,
    Si32,
    Ui32,
    F16,
    F32,
}

impl DType {
    /// Returns `true` when the dtype is a signed or unsigned integer.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Si8 | DType::Ui8 | DType::Si16 | DType::Ui16 | DType::Si32 | DType::Ui32
        )
    }

    /// Returns `true` when the dtype is a floating-point representation.
    pub fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::F32)
    }

    /// Storage size of one element in bytes.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::Si8 | DType::Ui8 => 1,
            DType::Si16 | DType::Ui16 | DType::F16 => 2,
            DType::Si32 | DType::Ui32 | DType::F32 => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DType::Si8 => "int8",
            DType::Ui8 => "uint8",
            DType::Si16 => "int16",
            DType::Ui16 => "uint16",
            DType::Si32 => "int32",
            DType::Ui32 => "uint32",
            DType::F16 => "float16",
            DType::F32 => "float32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical tensor shape as an ordered list of extents, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self { dims: dims.into() }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn into_dims(self) -> Vec<usize> {
        self.dims
    }

    /// Total element count, or `None` on overflow.
    pub fn element_count(&self) -> Option<usize> {
        let mut count = 1usize;
        for dim in &self.dims {
            count = count.checked_mul(*dim)?;
        }
        Some(count)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dims.is_empty() {
            return f.write_str("scalar");
        }
        let rendered = self
            .dims
            .iter()
            .map(|dim| dim.to_string())
            .collect::<Vec<_>>()
            .join("x");
        f.write_str(&rendered)
    }
}

/// Tensor metadata coupling dtype and shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorType {
    pub dtype: DType,
    pub shape: Shape,
}

impl TensorType {
    pub fn new(dtype: DType, shape: Shape) -> Self {
        Self { dtype, shape }
    }

    /// Total byte length when the element count does not overflow.
    pub fn byte_len(&self) -> Option<usize> {
        self.shape
            .element_count()?
            .checked_mul(self.dtype.size_in_bytes())
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor<{}, {}>", self.dtype, self.shape)
    }
}

/// Role an operand plays for a registered operator, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputRole {
    /// Input feature map: the tensor the operator transforms.
    Ifm,
    /// Lookup table operand, meaningful when the activation is `LUT`.
    Lut,
}

impl InputRole {
    pub fn as_str(self) -> &'static str {
        match self {
            InputRole::Ifm => "ifm",
            InputRole::Lut => "lut",
        }
    }
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
