use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lc_compare::{ComparisonConfig, RuleTable, compare_document_set};
use lc_model::{DiscrepancyReport, DocumentSet, Severity};
use lc_standards::{DoctorReport, RegistryHandle, VerifySummary};
use lc_validate::{Assembly, MessageRequest, MessageValidator};
use rayon::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, info_span};

use lc_cli::config::AppConfig;

use crate::cli::{CompareArgs, ConstructArgs, ParseArgs, SchemaArgs, ValidateArgs};
use crate::summary::{
    print_doctor, print_parsed, print_report, print_schema, print_validation,
};

/// Settings shared by every subcommand.
pub struct RunContext {
    pub config: AppConfig,
    pub standards_dir: PathBuf,
    pub json: bool,
}

/// Input of `validate`: one field map, or a batch of typed requests.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ValidateInput {
    Batch(Vec<MessageRequest>),
    Single(BTreeMap<String, String>),
}

pub fn run_standards_verify(ctx: &RunContext) -> Result<i32> {
    let (handle, summary) = load_standards(&ctx.standards_dir)?;
    let report = DoctorReport::from_verify_summary(&summary, &handle.snapshot());
    if ctx.json {
        print_json(&report)?;
    } else {
        print_doctor(&report, &summary.standards_dir);
    }
    Ok(0)
}

pub fn run_schema(ctx: &RunContext, args: &SchemaArgs) -> Result<i32> {
    let validator = validator(ctx)?;
    let schema = validator.get_schema(&args.message_type)?;
    if ctx.json {
        print_json(schema)?;
    } else {
        print_schema(schema);
    }
    Ok(0)
}

pub fn run_validate(ctx: &RunContext, args: &ValidateArgs) -> Result<i32> {
    let validator = validator(ctx)?;
    let requests = match read_json::<ValidateInput>(&args.input)? {
        ValidateInput::Batch(requests) => requests,
        ValidateInput::Single(fields) => {
            let message_type = args
                .message_type
                .clone()
                .context("--message-type is required for a single field map")?;
            vec![MessageRequest {
                message_type,
                fields,
            }]
        }
    };

    let mut validations = Vec::with_capacity(requests.len());
    for (request, result) in requests.iter().zip(validator.validate_batch(&requests)) {
        validations.push(result.with_context(|| format!("validate MT{}", request.message_type))?);
    }
    info!(messages = validations.len(), "validated messages");

    if ctx.json {
        print_json(&validations)?;
    } else {
        for validation in &validations {
            print_validation(validation);
        }
    }
    Ok(if validations.iter().all(|v| v.is_valid) { 0 } else { 1 })
}

pub fn run_construct(ctx: &RunContext, args: &ConstructArgs) -> Result<i32> {
    let validator = validator(ctx)?;
    let fields: BTreeMap<String, String> = read_json(&args.input)?;
    let assembly = validator.construct_message(&args.message_type, &fields)?;

    if let (Assembly::Constructed(message), Some(path)) = (&assembly, &args.output) {
        fs::write(path, &message.serialized_text)
            .with_context(|| format!("write {}", path.display()))?;
    }

    if ctx.json {
        print_json(&assembly)?;
    } else {
        match &assembly {
            Assembly::Constructed(message) if args.output.is_none() => {
                println!("{}", message.serialized_text);
            }
            Assembly::Constructed(message) => println!(
                "MT{}: {} of {} fields written",
                message.message_type_code, message.field_count, message.total_fields
            ),
            Assembly::Rejected(validation) => print_validation(validation),
        }
    }
    Ok(if assembly.is_constructed() { 0 } else { 1 })
}

pub fn run_parse(ctx: &RunContext, args: &ParseArgs) -> Result<i32> {
    let validator = validator(ctx)?;
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let parsed = validator
        .parse_message(&args.message_type, &text)
        .with_context(|| format!("parse {}", args.input.display()))?;

    if ctx.json {
        print_json(&parsed)?;
    } else {
        print_parsed(&parsed);
    }
    Ok(if parsed.validation.is_valid { 0 } else { 1 })
}

pub fn run_compare(ctx: &RunContext, args: &CompareArgs) -> Result<i32> {
    let comparison = ComparisonConfig {
        strip_punctuation: ctx.config.comparison.strip_punctuation || args.strip_punctuation,
        ..ctx.config.comparison.clone()
    };
    let table = rule_table(ctx)?;

    let sets = args
        .inputs
        .iter()
        .map(|path| read_json::<DocumentSet>(path))
        .collect::<Result<Vec<_>>>()?;

    let reports: Vec<DiscrepancyReport> = sets
        .par_iter()
        .map(|set| {
            let span = info_span!("compare", document_set = %set.id);
            let _guard = span.enter();
            compare_document_set(set, &comparison, &table)
        })
        .collect();

    if ctx.json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    let threshold = Severity::from(args.fail_on);
    let failed = reports
        .iter()
        .any(|report| report.count_at_least(threshold) > 0 || !report.classification_gaps.is_empty());
    Ok(if failed { 1 } else { 0 })
}

fn load_standards(dir: &Path) -> Result<(RegistryHandle, VerifySummary)> {
    RegistryHandle::load(dir).with_context(|| format!("load standards from {}", dir.display()))
}

fn validator(ctx: &RunContext) -> Result<MessageValidator> {
    let (handle, _) = load_standards(&ctx.standards_dir)?;
    Ok(MessageValidator::from_handle(&handle))
}

fn rule_table(ctx: &RunContext) -> Result<RuleTable> {
    if !ctx.config.classification.use_standards_table {
        return Ok(RuleTable::ucp600());
    }
    let (handle, _) = load_standards(&ctx.standards_dir)?;
    Ok(ctx.config.rule_table(&handle.snapshot()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
