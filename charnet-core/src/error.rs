use thiserror::Error;

/// Custom error type for the charnet graph engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum CharNetError {
    #[error("Node name '{name}' is already declared in the graph")]
    DuplicateName { name: String },

    #[error("Node '{node}' refers to undeclared operand '{operand}'")]
    UnknownOperand { node: String, operand: String },

    #[error("No node named '{name}' in the graph")]
    UnknownNode { name: String },

    #[error("Operation {operation} takes {expected} operand(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("No value supplied for '{name}' in the value environment")]
    MissingValue { name: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Incompatible shapes for operation {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        operation: String,
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Backward called on non-scalar node '{name}' (shape {shape:?}) without explicit gradient.")]
    BackwardNonScalar { name: String, shape: Vec<usize> },

    #[error("Evaluation order is empty: the terminal node is not an operation")]
    EmptyGraph,

    #[error("Cycle detected in the computation graph at node '{name}'.")]
    CycleDetected { name: String },

    #[error("Gradients not close for {name}: analytical {analytical:.5}, numerical {numerical:.5}")]
    GradientMismatch {
        name: String,
        analytical: f64,
        numerical: f64,
    },

    #[error("An MLP needs at least an input and an output width, all non-zero. Got {sizes:?}")]
    InvalidLayerSizes { sizes: Vec<usize> },
}
