/// Core error type for the inkline analyzer.
///
/// Every variant is fatal: a malformed or semantically invalid input program
/// aborts the current walk and is surfaced to the caller unchanged. Nothing
/// is retried or swallowed — a partially substituted or partially classified
/// program is not a safe basis for display.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported construct at line {line}: {construct}")]
    Unsupported { line: usize, construct: String },

    #[error("unbound identifier `{0}`")]
    UnboundIdentifier(String),

    #[error("array index {index} out of range (length {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("malformed parameter string: {0}")]
    Params(String),

    #[error("evaluation error: {0}")]
    Eval(String),
}
