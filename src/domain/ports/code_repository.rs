//! CodeRepository port - source of deployable contract code

/// Deployable code blob for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCode {
    /// Code identifier (the artifact's `code_id`)
    pub id: String,
    /// `0x`-prefixed hex creation bytecode
    pub bytecode: String,
    /// `sha256:`-prefixed fingerprint of the bytecode, for logs and audits
    pub fingerprint: String,
}

/// Code repository errors
#[derive(Debug)]
pub enum CodeError {
    NotFound { id: String, path: String },
    InvalidHex { id: String, detail: String },
    Io(std::io::Error),
}

impl std::fmt::Display for CodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeError::NotFound { id, path } => {
                write!(f, "no code for '{id}' (looked in {path})")
            }
            CodeError::InvalidHex { id, detail } => {
                write!(f, "code for '{id}' is not valid hex: {detail}")
            }
            CodeError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CodeError {}

impl From<std::io::Error> for CodeError {
    fn from(err: std::io::Error) -> Self {
        CodeError::Io(err)
    }
}

/// Abstract repository resolving a code identifier to deployable bytecode
pub trait CodeRepository {
    fn load(&self, id: &str) -> Result<ContractCode, CodeError>;
}
