//! Entry point binding a registry snapshot to the format cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use lc_format::FormatCache;
use lc_model::{MessageSchema, MessageValidationResult, ValidationErrorKind, ValidationResult};
use lc_standards::{RegistryHandle, SchemaRegistry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembler::{self, Assembly};
use crate::error::{Result, ValidateError};
use crate::field;
use crate::parser;

/// One message of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message_type: String,
    pub fields: BTreeMap<String, String>,
}

/// A parsed text block together with its validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMessage {
    pub fields: BTreeMap<String, String>,
    pub validation: MessageValidationResult,
}

/// Validates and builds messages against one registry snapshot.
///
/// The snapshot is fixed for the validator's lifetime; a registry reload is
/// picked up by creating a new validator.
#[derive(Debug, Clone)]
pub struct MessageValidator {
    registry: Arc<SchemaRegistry>,
    cache: Arc<FormatCache>,
}

impl MessageValidator {
    pub fn new(registry: Arc<SchemaRegistry>, cache: Arc<FormatCache>) -> Self {
        Self { registry, cache }
    }

    pub fn from_handle(handle: &RegistryHandle) -> Self {
        Self::new(handle.snapshot(), Arc::clone(handle.cache()))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn get_schema(&self, message_type: &str) -> Result<&MessageSchema> {
        Ok(self.registry.get_schema(message_type)?)
    }

    /// Validate a single field value outside of a message.
    pub fn validate_field(
        &self,
        message_type: &str,
        tag: &str,
        value: Option<&str>,
    ) -> Result<ValidationResult> {
        let schema = self.get_schema(message_type)?;
        let Some(definition) = schema.field(tag.trim()) else {
            return Ok(ValidationResult::fail(
                tag,
                ValidationErrorKind::UnknownField,
                format!("field {tag} is not defined for MT{}", schema.message_type),
            ));
        };
        let format = self
            .cache
            .get_or_compile(&definition.format_spec)
            .map_err(|source| ValidateError::Format {
                tag: definition.tag.clone(),
                source,
            })?;
        Ok(field::validate_field(definition, &format, value))
    }

    pub fn validate_message(
        &self,
        message_type: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<MessageValidationResult> {
        let schema = self.get_schema(message_type)?;
        assembler::validate_message(schema, &self.cache, values)
    }

    pub fn construct_message(
        &self,
        message_type: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<Assembly> {
        let schema = self.get_schema(message_type)?;
        let assembly = assembler::assemble(schema, &self.cache, values)?;
        if let Assembly::Constructed(message) = &assembly {
            info!(
                message_type = %message.message_type_code,
                fields = message.field_count,
                "message constructed"
            );
        }
        Ok(assembly)
    }

    /// Read a text block and validate the fields found in it.
    pub fn parse_message(&self, message_type: &str, text: &str) -> Result<ParsedMessage> {
        let schema = self.get_schema(message_type)?;
        let fields = parser::parse_message(text)?;
        let validation = assembler::validate_message(schema, &self.cache, &fields)?;
        Ok(ParsedMessage { fields, validation })
    }

    /// Validate many messages in parallel; results keep the input order.
    pub fn validate_batch(
        &self,
        requests: &[MessageRequest],
    ) -> Vec<Result<MessageValidationResult>> {
        requests
            .par_iter()
            .map(|request| self.validate_message(&request.message_type, &request.fields))
            .collect()
    }
}
