#![deny(unsafe_code)]

use std::path::{Component, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StandardsError;

pub const REQUIRED_ROLES: &[&str] = &["messages", "fields", "rules"];

pub const OPTIONAL_ROLES: &[&str] = &["ucp_rules"];

const ALLOWED_KINDS: &[&str] = &["csv", "toml", "other"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

/// Releases the bundled tables were taken from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    pub swift_mt: String,
    pub ucp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub role: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ManifestFile {
    pub fn is_known_role(&self) -> bool {
        REQUIRED_ROLES.contains(&self.role.as_str()) || OPTIONAL_ROLES.contains(&self.role.as_str())
    }

    /// Check the entry on its own and return its path relative to the standards directory.
    pub fn check(&self) -> Result<PathBuf, StandardsError> {
        if !self.is_known_role() {
            return Err(StandardsError::InvalidManifest {
                message: format!("unknown role '{}' for {}", self.role, self.path),
            });
        }
        if !ALLOWED_KINDS.contains(&self.kind.as_str()) {
            return Err(StandardsError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", self.kind, self.path),
            });
        }
        self.check_sha256()?;
        self.relative_path()
    }

    fn check_sha256(&self) -> Result<(), StandardsError> {
        if self.sha256.len() != 64 || !self.sha256.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StandardsError::InvalidSha256 {
                path: PathBuf::from(&self.path),
                message: format!("expected 64 hex characters, got {:?}", self.sha256),
            });
        }
        Ok(())
    }

    /// Relative, `/`-separated and confined to the standards directory.
    pub fn relative_path(&self) -> Result<PathBuf, StandardsError> {
        let path = PathBuf::from(&self.path);
        let problem = if self.path.contains('\\') {
            Some("use '/' separators")
        } else if path.is_absolute() || self.path.starts_with('/') {
            Some("must be relative")
        } else if path.components().any(|c| matches!(c, Component::ParentDir)) {
            Some("must stay inside the standards directory")
        } else {
            None
        };
        match problem {
            Some(message) => Err(StandardsError::InvalidPath {
                path,
                message: message.to_string(),
            }),
            None => Ok(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, sha256: &str) -> ManifestFile {
        ManifestFile {
            path: path.to_string(),
            sha256: sha256.to_string(),
            kind: "csv".to_string(),
            role: "fields".to_string(),
            notes: None,
        }
    }

    const SHA: &str = "0123456789abcdef0123456789abcdef0123456789ABCDEF0123456789abcdef";

    #[test]
    fn well_formed_entry_passes() {
        let path = entry("swift/fields.csv", SHA).check().unwrap();
        assert_eq!(path, PathBuf::from("swift/fields.csv"));
    }

    #[test]
    fn short_or_non_hex_sha_is_rejected() {
        let non_hex = SHA.replace('0', "g");
        for sha in ["abc", non_hex.as_str()] {
            let error = entry("swift/fields.csv", sha).check().unwrap_err();
            assert!(matches!(error, StandardsError::InvalidSha256 { .. }), "{error}");
        }
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for path in ["/etc/passwd", "../fields.csv", "swift/../../x.csv", "swift\\fields.csv"] {
            let error = entry(path, SHA).relative_path().unwrap_err();
            assert!(matches!(error, StandardsError::InvalidPath { .. }), "{path}: {error}");
        }
    }

    #[test]
    fn unknown_role_and_kind_are_rejected() {
        let mut file = entry("swift/fields.csv", SHA);
        file.role = "glossary".to_string();
        assert!(matches!(file.check(), Err(StandardsError::InvalidManifest { .. })));

        let mut file = entry("swift/fields.csv", SHA);
        file.kind = "xlsx".to_string();
        assert!(matches!(file.check(), Err(StandardsError::InvalidManifest { .. })));
    }
}
