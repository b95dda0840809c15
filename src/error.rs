use thiserror::Error;

#[derive(Debug, Error)]
pub enum SedError {
    #[error("cannot allocate a {rows}x{cols} distance table")]
    AllocationFailure { rows: usize, cols: usize },

    /// The worst-case distance (`first + second`) does not fit in a `Distance`.
    #[error("sequences of length {first} and {second} exceed the representable distance range")]
    SequenceTooLong { first: usize, second: usize },

    #[error("malformed token '{token}' on line {line}")]
    MalformedToken { token: String, line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
