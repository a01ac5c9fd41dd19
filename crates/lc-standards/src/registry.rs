#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use lc_format::FormatCache;
use lc_model::{
    ClassificationRule, FieldDefinition, FieldRule, MessageSchema, normalize_message_type,
};
use tracing::{debug, info};

use crate::csv::fields::parse_fields_csv;
use crate::csv::messages::parse_messages_csv;
use crate::csv::rules::parse_rules_csv;
use crate::csv::ucp_rules::parse_ucp_rules_csv;
use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::manifest::{Manifest, ManifestFile, REQUIRED_ROLES};

pub const MANIFEST_SCHEMA: &str = "lc-checker.standards-manifest";

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub manifest_pins: crate::manifest::Pins,
    pub file_count: usize,
    pub message_type_count: usize,
    pub field_count: usize,
    pub rule_count: usize,
    pub ucp_rule_count: usize,
}

/// Message schemas and the UCP rule table, loaded from a verified
/// standards directory. Immutable once built.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    pub manifest: Manifest,
    pub files: Vec<ManifestFile>,
    schemas: BTreeMap<String, MessageSchema>,
    ucp_rules: Vec<ClassificationRule>,
}

impl SchemaRegistry {
    /// Verify every manifest file by hash, parse the tables and compile
    /// every field format into `cache`. Nothing is returned unless the
    /// whole directory is valid.
    pub fn verify_and_load(
        standards_dir: &Path,
        cache: &FormatCache,
    ) -> Result<(Self, VerifySummary), StandardsError> {
        let manifest = load_manifest(&standards_dir.join("manifest.toml"))?;

        validate_manifest(&manifest, standards_dir)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        for file in &files {
            verify_file(standards_dir, file)?;
        }
        debug!(files = files.len(), "standards files verified");

        let messages_path = resolve_role_path(standards_dir, &files, "messages")?;
        let fields_path = resolve_role_path(standards_dir, &files, "fields")?;
        let rules_path = resolve_role_path(standards_dir, &files, "rules")?;

        let messages = parse_messages_csv(&messages_path)?;
        let fields = parse_fields_csv(&fields_path)?;
        let rules = parse_rules_csv(&rules_path)?;
        let rule_count = rules.len();

        let mut schemas: BTreeMap<String, MessageSchema> = messages
            .into_iter()
            .map(|meta| {
                (
                    meta.message_type.clone(),
                    MessageSchema {
                        message_type: meta.message_type,
                        name: meta.name,
                        version: meta.version,
                        fields: Vec::new(),
                    },
                )
            })
            .collect();

        for row in fields {
            let schema = schemas.get_mut(&row.message_type).ok_or_else(|| {
                StandardsError::UndefinedMessageType {
                    path: fields_path.clone(),
                    message_type: row.message_type.clone(),
                }
            })?;
            schema.fields.push(row.definition);
        }

        for row in rules {
            if let FieldRule::CrossField(cross) = &row.rule {
                schemas
                    .get(&row.message_type)
                    .and_then(|schema| schema.field(&cross.other_tag))
                    .ok_or_else(|| StandardsError::UndefinedField {
                        path: rules_path.clone(),
                        message_type: row.message_type.clone(),
                        tag: cross.other_tag.clone(),
                    })?;
            }
            let field = schemas
                .get_mut(&row.message_type)
                .and_then(|schema| field_mut(&mut schema.fields, &row.tag))
                .ok_or_else(|| StandardsError::UndefinedField {
                    path: rules_path.clone(),
                    message_type: row.message_type.clone(),
                    tag: row.tag.clone(),
                })?;
            field.rules.push(row.rule);
        }

        for schema in schemas.values_mut() {
            check_schema(schema, cache)?;
        }

        let ucp_rules = match resolve_optional_role_path(standards_dir, &files, "ucp_rules") {
            Some(path) => parse_ucp_rules_csv(&path)?,
            None => Vec::new(),
        };

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            manifest_pins: manifest.pins.clone(),
            file_count: files.len(),
            message_type_count: schemas.len(),
            field_count: schemas.values().map(MessageSchema::len).sum(),
            rule_count,
            ucp_rule_count: ucp_rules.len(),
        };
        info!(
            dir = %standards_dir.display(),
            message_types = summary.message_type_count,
            fields = summary.field_count,
            rules = summary.rule_count,
            "standards loaded"
        );

        Ok((
            Self {
                manifest,
                files,
                schemas,
                ucp_rules,
            },
            summary,
        ))
    }

    /// Schema for a message type; accepts `700` or `MT700`.
    pub fn get_schema(&self, message_type: &str) -> Result<&MessageSchema, StandardsError> {
        let code = normalize_message_type(message_type);
        self.schemas
            .get(&code)
            .ok_or(StandardsError::UnknownMessageType { message_type: code })
    }

    /// Field definitions of a message type in sequence order.
    pub fn list_fields(&self, message_type: &str) -> Result<&[FieldDefinition], StandardsError> {
        self.get_schema(message_type)
            .map(|schema| schema.fields.as_slice())
    }

    pub fn message_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &MessageSchema> {
        self.schemas.values()
    }

    /// The UCP 600 classification table, empty when the manifest has no `ucp_rules` role.
    pub fn ucp_rules(&self) -> &[ClassificationRule] {
        &self.ucp_rules
    }
}

fn field_mut<'a>(fields: &'a mut [FieldDefinition], tag: &str) -> Option<&'a mut FieldDefinition> {
    fields.iter_mut().find(|f| f.tag.eq_ignore_ascii_case(tag))
}

/// Sort by sequence, reject duplicate tags and sequences, and compile every
/// format so that a bad specification fails the load.
fn check_schema(schema: &mut MessageSchema, cache: &FormatCache) -> Result<(), StandardsError> {
    schema.fields.sort_by_key(|f| f.sequence);

    let mut tags = BTreeSet::new();
    for field in &schema.fields {
        if !tags.insert(field.tag.as_str()) {
            return Err(StandardsError::DuplicateTag {
                message_type: schema.message_type.clone(),
                tag: field.tag.clone(),
            });
        }
    }

    for pair in schema.fields.windows(2) {
        if pair[0].sequence == pair[1].sequence {
            return Err(StandardsError::DuplicateSequence {
                message_type: schema.message_type.clone(),
                sequence: pair[0].sequence,
                first: pair[0].tag.clone(),
                second: pair[1].tag.clone(),
            });
        }
    }

    for field in &schema.fields {
        cache
            .get_or_compile(&field.format_spec)
            .map_err(|source| StandardsError::Format {
                message_type: schema.message_type.clone(),
                tag: field.tag.clone(),
                source,
            })?;
    }

    debug!(
        message_type = %schema.message_type,
        fields = schema.fields.len(),
        "schema checked"
    );
    Ok(())
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, standards_dir: &Path) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(StandardsError::DuplicateRole {
                role: file.role.clone(),
            });
        }

        let path = file.check()?;
        manifest_paths.insert(normalize_path(&path));
    }

    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(StandardsError::MissingRole {
                role: role.to_string(),
            });
        }
    }

    for path in list_files_under(standards_dir)? {
        if path == Path::new("manifest.toml") {
            continue;
        }
        if !manifest_paths.contains(&normalize_path(&path)) {
            return Err(StandardsError::UnexpectedFile {
                path: standards_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(standards_dir: &Path, file: &ManifestFile) -> Result<(), StandardsError> {
    let full_path = standards_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn resolve_role_path(
    standards_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, StandardsError> {
    resolve_optional_role_path(standards_dir, files, role).ok_or_else(|| {
        StandardsError::MissingRole {
            role: role.to_string(),
        }
    })
}

fn resolve_optional_role_path(
    standards_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Option<PathBuf> {
    files
        .iter()
        .find(|f| f.role == role)
        .map(|f| standards_dir.join(&f.path))
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>, StandardsError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| StandardsError::io(&dir, e))? {
            let entry = entry.map_err(|e| StandardsError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| StandardsError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }

    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in p.components() {
        if !matches!(c, Component::CurDir) {
            out.push(c.as_os_str());
        }
    }
    out
}
