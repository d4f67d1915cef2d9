use thiserror::Error;

use crate::ast::ShapeLabel;

/// Errors the satisfaction engine can report while resolving labels or
/// walking the schema. Evaluation failures themselves never surface as
/// `Err` — they are recorded as reasons on the parse trace and reported
/// through `is_valid`'s `(bool, reasons)` return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShexError {
    #[error("Shape: {0} not found in Schema")]
    UnknownShapeLabel(ShapeLabel),

    #[error("START node is not specified or is invalid")]
    UnknownStartShape,

    #[error("Triple patterns are not implemented")]
    TriplePatternsUnsupported,

    #[error("BNODE shape labels are not supported")]
    BlankShapeRefUnsupported,

    #[error("triple expression label {0} not found in Schema")]
    UnknownTripleExprLabel(ShapeLabel),
}
