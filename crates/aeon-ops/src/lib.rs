pub mod attrs;
mod env;
pub mod graph;
pub mod layout;
pub mod registry;
pub mod relation;
pub mod spec;

pub use attrs::{Activation, OpAttrs, QuantParams, RoundingMode, UnaryElementwiseAttrs};
pub use graph::{GraphNode, OperandRef, UnaryElementwiseBuilder};
pub use layout::FeatureMapLayout;
pub use relation::{TypeCheckError, TypeCheckResult, TypeRelation};
pub use spec::{DType, Shape, TensorType};
