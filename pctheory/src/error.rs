// Error type shared by every fallible operation in the engine.
//
// All conditions are local and recoverable: nothing in the engine aborts
// the process. Pitch-class integers are never a source of error since they
// are reduced modulo 12 on construction.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcError {
    /// `SetClass::load_from_name` got an identifier that is neither a known
    /// Forte name nor a bracketed prime form.
    #[error("invalid set-class name: {0:?}")]
    InvalidSetClassName(String),

    /// Transformation lookup by a name the registry does not contain.
    #[error("unknown operator: {0:?}")]
    UnknownOperator(String),

    /// An invariance matrix row is not a length-12 bijection.
    #[error("degenerate row: {reason}")]
    DegenerateRow { reason: String },

    /// A prime form with no entry in the name tables. Indicates a broken
    /// table rather than bad input.
    #[error("no name table entry for prime form {0}")]
    UnnamedSetClass(String),

    /// Engine configuration JSON failed to parse or validate.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PcError>;
