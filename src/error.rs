//! Errors raised while extracting meshes and transforms from a glTF document.
//!
//! Every failure is fatal to the current run. Variants carry the indices and the
//! expected/actual values needed to track down the malformed part of the input.

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Broad classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document has a shape this tool does not support or that glTF forbids.
    Schema,
    /// Reading an accessor would run past a buffer view or the buffer itself.
    Bounds,
    /// Decoded data disagrees with itself (attribute lengths, triangle lists).
    Consistency,
    /// Numerically degenerate input, such as a zero-length rotation.
    Degenerate,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Accessor {0} does not exist")]
    UnknownAccessor(usize),

    #[error("Buffer view {view} referenced by accessor {accessor} does not exist")]
    UnknownBufferView { accessor: usize, view: usize },

    #[error("Mesh {0} does not exist")]
    UnknownMesh(usize),

    #[error("Node {node} referenced by {referrer} does not exist")]
    UnknownNode { node: usize, referrer: String },

    #[error("Accessor {0} has no buffer view")]
    MissingBufferView(usize),

    #[error("Accessor {accessor} has an unrecognised {field}")]
    InvalidAccessorField { accessor: usize, field: &'static str },

    #[error("Buffer view {view} references buffer {buffer}, only buffer 0 is supported")]
    UnsupportedBuffer { view: usize, buffer: usize },

    #[error("Mesh {mesh} has {count} primitives, exactly one is supported")]
    PrimitiveCount { mesh: usize, count: usize },

    #[error("Mesh {mesh} has no indices")]
    MissingIndices { mesh: usize },

    #[error("Mesh {mesh} has no POSITION attribute")]
    MissingPositions { mesh: usize },

    #[error("Mesh {mesh} has an unrecognised attribute semantic")]
    InvalidSemantic { mesh: usize },

    #[error("Document has {count} scenes, exactly one is supported")]
    SceneCount { count: usize },

    #[error("Active scene is {active:?}, expected scene 0")]
    ActiveScene { active: Option<usize> },

    #[error("Scene roots are {roots:?}, expected exactly [0]")]
    SceneRoots { roots: Vec<usize> },

    #[error("Node {node} combines a matrix with scale/rotation/translation")]
    ConflictingTransform { node: usize },

    #[error("Node {child} is listed as a child of both node {first} and node {second}")]
    DuplicateParent {
        child: usize,
        first: usize,
        second: usize,
    },

    #[error("Root node {root} is listed as a child of node {parent}")]
    CyclicHierarchy { root: usize, parent: usize },

    #[error(
        "Accessor {accessor} needs {required} bytes from offset {offset} but buffer view {view} is only {view_length} bytes long"
    )]
    /// `required` is `u64::MAX` when the byte count itself overflows.
    ViewOverrun {
        accessor: usize,
        view: usize,
        offset: u64,
        required: u64,
        view_length: u64,
    },

    #[error("Accessor {accessor} reads bytes {start}..{end} but the buffer is only {buffer_length} bytes long")]
    /// `start` and `end` are `u64::MAX` when they overflow.
    BufferOverrun {
        accessor: usize,
        start: u64,
        end: u64,
        buffer_length: u64,
    },

    #[error("Mesh {mesh} has {count} indices, which is not a multiple of 3")]
    IndexCount { mesh: usize, count: usize },

    #[error("Mesh {mesh} has {actual} {attribute} values for {expected} positions")]
    AttributeLength {
        mesh: usize,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Accessor {accessor} element {element} is not a valid {attribute} value")]
    ElementShape {
        accessor: usize,
        element: usize,
        attribute: &'static str,
    },

    #[error("Node {node} has a rotation quaternion {rotation:?} that cannot be normalized")]
    DegenerateRotation { node: usize, rotation: [f64; 4] },
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::ViewOverrun { .. } | ExtractError::BufferOverrun { .. } => {
                ErrorKind::Bounds
            }
            ExtractError::IndexCount { .. }
            | ExtractError::AttributeLength { .. }
            | ExtractError::ElementShape { .. } => ErrorKind::Consistency,
            ExtractError::DegenerateRotation { .. } => ErrorKind::Degenerate,
            _ => ErrorKind::Schema,
        }
    }
}
