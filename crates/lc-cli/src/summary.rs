use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use lc_model::{DiscrepancyReport, MessageSchema, MessageValidationResult, Severity};
use lc_standards::DoctorReport;
use lc_validate::ParsedMessage;

pub fn print_doctor(report: &DoctorReport, standards_dir: &Path) {
    println!("Standards: {}", standards_dir.display());
    println!("SWIFT MT: {}  UCP: {}", report.pins.swift_mt, report.pins.ucp);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Message"),
        header_cell("Name"),
        header_cell("Version"),
        header_cell("Fields"),
        header_cell("Mandatory"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in &report.message_types {
        table.add_row(vec![
            code_cell(&format!("MT{}", summary.message_type)),
            Cell::new(&summary.name),
            Cell::new(&summary.version),
            Cell::new(summary.fields),
            Cell::new(summary.mandatory),
        ]);
    }
    println!("{table}");
    println!(
        "Verified {} files: {} fields, {} rules, {} UCP rules",
        report.counts.files, report.counts.fields, report.counts.rules, report.counts.ucp_rules
    );
}

pub fn print_schema(schema: &MessageSchema) {
    println!("MT{} {} ({})", schema.message_type, schema.name, schema.version);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Seq"),
        header_cell("Tag"),
        header_cell("Name"),
        header_cell("Format"),
        header_cell("M/O"),
        header_cell("Allowed values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in &schema.fields {
        let allowed = field
            .allowed_values
            .as_ref()
            .map(|values| values.iter().cloned().collect::<Vec<_>>().join(" | "));
        table.add_row(vec![
            Cell::new(field.sequence),
            code_cell(&field.tag),
            Cell::new(&field.name),
            Cell::new(field.format_spec.replace('\n', "\\n")),
            if field.is_mandatory {
                Cell::new("M").add_attribute(Attribute::Bold)
            } else {
                dim_cell("O")
            },
            allowed.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_validation(result: &MessageValidationResult) {
    let status = if result.is_valid { "valid" } else { "INVALID" };
    println!(
        "MT{}: {status} ({} errors)",
        result.message_type,
        result.error_count()
    );
    if result.is_valid {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tag"),
        header_cell("Error"),
        header_cell("Message"),
        header_cell("Expected"),
        header_cell("Actual"),
    ]);
    apply_issue_table_style(&mut table);
    for field in result.errors() {
        table.add_row(vec![
            code_cell(&field.tag),
            field
                .error_kind
                .map_or_else(|| dim_cell("-"), |kind| Cell::new(kind).fg(Color::Red)),
            Cell::new(field.message.as_deref().unwrap_or_default()),
            optional_cell(field.expected.as_deref()),
            optional_cell(field.actual.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_parsed(parsed: &ParsedMessage) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Tag"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (tag, value) in &parsed.fields {
        table.add_row(vec![code_cell(tag), Cell::new(value)]);
    }
    println!("{table}");
    print_validation(&parsed.validation);
}

pub fn print_report(report: &DiscrepancyReport) {
    println!("Document set: {}", report.document_set_id);
    if report.is_clean() {
        println!("No discrepancies");
        return;
    }

    let mut discrepancies: Vec<_> = report.discrepancies.iter().collect();
    discrepancies.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Rule"),
        header_cell("Field"),
        header_cell("Expected"),
        header_cell("Actual"),
        header_cell("Description"),
        header_cell("Recommendation"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for discrepancy in discrepancies {
        table.add_row(vec![
            severity_cell(discrepancy.severity),
            Cell::new(&discrepancy.rule_reference),
            code_cell(&discrepancy.field_name),
            Cell::new(&discrepancy.expected_value),
            Cell::new(&discrepancy.actual_value),
            Cell::new(&discrepancy.description),
            Cell::new(&discrepancy.recommendation),
        ]);
    }
    println!("{table}");

    if !report.classification_gaps.is_empty() {
        eprintln!("Unclassified mismatches:");
        for gap in &report.classification_gaps {
            eprintln!("- {gap}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(15)),
            ColumnConstraint::UpperBoundary(Width::Percentage(15)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::Critical => Cell::new(label).fg(Color::Red).add_attribute(Attribute::Bold),
        Severity::High => Cell::new(label).fg(Color::Red),
        Severity::Medium => Cell::new(label).fg(Color::Yellow),
        Severity::Low => Cell::new(label).fg(Color::DarkGrey),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn code_cell(code: &str) -> Cell {
    Cell::new(code).fg(Color::Blue).add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value.replace('\n', "\\n")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
