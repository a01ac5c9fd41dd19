#![deny(unsafe_code)]

use crate::manifest::{ManifestFile, Pins};
use crate::registry::{SchemaRegistry, VerifySummary};

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
    pub counts: DoctorCounts,
    pub message_types: Vec<MessageTypeSummary>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorCounts {
    pub files: usize,
    pub message_types: usize,
    pub fields: usize,
    pub rules: usize,
    pub ucp_rules: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageTypeSummary {
    pub message_type: String,
    pub name: String,
    pub version: String,
    pub fields: usize,
    pub mandatory: usize,
}

impl DoctorReport {
    pub fn from_verify_summary(summary: &VerifySummary, registry: &SchemaRegistry) -> Self {
        Self {
            schema: "lc-checker.standards-doctor".to_string(),
            schema_version: 1,
            pins: summary.manifest_pins.clone(),
            files: registry.files.clone(),
            counts: DoctorCounts {
                files: summary.file_count,
                message_types: summary.message_type_count,
                fields: summary.field_count,
                rules: summary.rule_count,
                ucp_rules: summary.ucp_rule_count,
            },
            message_types: registry
                .schemas()
                .map(|schema| MessageTypeSummary {
                    message_type: schema.message_type.clone(),
                    name: schema.name.clone(),
                    version: schema.version.clone(),
                    fields: schema.len(),
                    mandatory: schema.mandatory_tags().count(),
                })
                .collect(),
        }
    }
}
