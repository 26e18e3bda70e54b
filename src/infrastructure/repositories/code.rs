//! Directory-backed code repository
//!
//! Resolves a code identifier to `<code_dir>/<id>.hex`, a hex dump of the
//! artifact's creation bytecode. The fingerprint goes into logs so operators
//! can tie a deployment back to the exact blob that was submitted.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::domain::ports::{CodeError, CodeRepository, ContractCode};

/// Loads creation bytecode from a directory of `.hex` files
#[derive(Debug, Clone)]
pub struct DirCodeRepository {
    root: PathBuf,
}

impl DirCodeRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CodeRepository for DirCodeRepository {
    fn load(&self, id: &str) -> Result<ContractCode, CodeError> {
        let path = self.root.join(format!("{id}.hex"));
        if !path.exists() {
            return Err(CodeError::NotFound {
                id: id.to_string(),
                path: path.display().to_string(),
            });
        }

        let raw = std::fs::read_to_string(&path)?;
        let compact: String = raw.split_whitespace().collect();
        let hex = compact.strip_prefix("0x").unwrap_or(&compact);

        if hex.is_empty() {
            return Err(CodeError::InvalidHex {
                id: id.to_string(),
                detail: "file is empty".to_string(),
            });
        }
        if hex.len() % 2 != 0 {
            return Err(CodeError::InvalidHex {
                id: id.to_string(),
                detail: "odd number of hex digits".to_string(),
            });
        }
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CodeError::InvalidHex {
                id: id.to_string(),
                detail: format!("unexpected character '{bad}'"),
            });
        }

        let bytecode = format!("0x{}", hex.to_ascii_lowercase());
        let fingerprint = format!("sha256:{:x}", Sha256::digest(bytecode.as_bytes()));

        Ok(ContractCode {
            id: id.to_string(),
            bytecode,
            fingerprint,
        })
    }
}
