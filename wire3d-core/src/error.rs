//! Error types for mesh loading and transform composition

/// Errors raised while loading a mesh description.
///
/// Any of these terminates the load; the partially filled mesh should be
/// discarded by the caller.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unexpected token `{token}` at line {line}, column {column}: {context}")]
    Format {
        line: usize,
        column: usize,
        token: String,
        context: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("mesh exceeds {limit} vertices; edge keys hold 16-bit indices")]
    TooManyVertices { limit: usize },
}

/// Errors raised by transform composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("rotation axis has zero length")]
    DegenerateAxis,
}
