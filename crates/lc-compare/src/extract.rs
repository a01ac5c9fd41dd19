//! Mapping raw extracted fields onto logical fields.
//!
//! Extraction keys vary by document type: the credit is keyed by MT700 tags
//! (or their descriptive names), presented documents by snake-case labels.
//! Keys are matched case-insensitively, with spaces and hyphens read as `_`.

use std::collections::BTreeMap;

use lc_model::{Document, DocumentType, LogicalField};

use crate::values::party_name;

/// Keys that may carry the credit's amount tolerance (field 39A).
const TOLERANCE_KEYS: &[&str] = &["39a", "tolerance", "percentage_credit_amount_tolerance"];

const PORT_OF_LOADING: &[&str] = &["port_of_loading", "loading_port"];
const PORT_OF_DISCHARGE: &[&str] = &["port_of_discharge", "discharge_port"];
const GOODS: &[&str] = &["description_of_goods", "goods_description", "goods", "description"];
const CREDIT_NUMBER: &[&str] = &["credit_number", "lc_number", "lc_reference", "documentary_credit_number"];
const QUANTITY: &[&str] = &["quantity", "total_quantity"];

/// Raw keys that carry `field` on a document of `document_type`.
pub fn aliases(document_type: DocumentType, field: LogicalField) -> &'static [&'static str] {
    use DocumentType as D;
    use LogicalField as F;

    match (document_type, field) {
        (D::Credit, F::Amount) => &["32b", "amount", "credit_amount"],
        (D::Credit, F::ExpiryDate) => &["31d", "expiry_date", "date_of_expiry"],
        (D::Credit, F::LatestShipmentDate) => &["44c", "latest_shipment_date", "latest_date_of_shipment"],
        (D::Credit, F::IssueDate) => &["31c", "issue_date", "date_of_issue"],
        (D::Credit, F::Beneficiary) => &["59", "beneficiary"],
        (D::Credit, F::Applicant) => &["50", "applicant"],
        (D::Credit, F::GoodsDescription) => &["45a", "description_of_goods", "goods_description"],
        (D::Credit, F::PortOfLoading) => &["44e", "port_of_loading"],
        (D::Credit, F::PortOfDischarge) => &["44f", "port_of_discharge"],
        (D::Credit, F::CreditNumber) => &["20", "credit_number", "documentary_credit_number"],
        (D::Credit, F::ShipmentDate | F::Quantity) => &[],

        (D::CommercialInvoice, F::Amount) => &["amount", "invoice_amount", "total_amount", "total"],
        (D::CommercialInvoice, F::IssueDate) => &["invoice_date", "issue_date", "date"],
        (D::CommercialInvoice, F::Beneficiary) => &["beneficiary", "seller", "exporter"],
        (D::CommercialInvoice, F::Applicant) => &["applicant", "buyer", "importer"],

        (D::BillOfLading, F::ShipmentDate) => {
            &["shipped_on_board_date", "on_board_date", "shipment_date", "shipping_date", "date_of_shipment"]
        }
        (D::BillOfLading, F::IssueDate) => &["issue_date", "bl_date", "date"],

        (D::InsuranceDocument, F::IssueDate) => &["issue_date", "date"],
        (D::InsuranceDocument, F::ShipmentDate) => &["shipment_date"],

        (D::PackingList, F::IssueDate) => &["issue_date", "date"],
        (D::PackingList, F::Beneficiary) => &["beneficiary", "seller", "exporter"],

        (D::Draft, F::Amount) => &["amount", "draft_amount"],
        (D::Draft, F::IssueDate) => &["issue_date", "date"],

        (D::CertificateOfOrigin, F::IssueDate) => &["issue_date", "date"],
        (D::CertificateOfOrigin, F::Beneficiary) => &["exporter", "beneficiary"],

        (_, F::PortOfLoading) => PORT_OF_LOADING,
        (_, F::PortOfDischarge) => PORT_OF_DISCHARGE,
        (D::Draft, F::GoodsDescription | F::Quantity) => &[],
        (_, F::GoodsDescription) => GOODS,
        (_, F::Quantity) => QUANTITY,
        (_, F::CreditNumber) => CREDIT_NUMBER,
        _ => &[],
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn lookup<'a>(document: &'a Document, keys: &[&str]) -> Option<&'a str> {
    // First matching alias wins; aliases are listed most specific first.
    keys.iter().find_map(|alias| {
        document
            .extracted_fields
            .iter()
            .find(|(key, _)| normalize_key(key) == *alias)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty())
    })
}

/// Logical fields stated on a document, with their raw values.
///
/// Party fields keep only the name line, so the account and address lines of
/// MT700 fields 50 and 59 do not take part in comparison.
pub fn extract(document: &Document) -> BTreeMap<LogicalField, String> {
    LogicalField::ALL
        .into_iter()
        .filter_map(|field| {
            let raw = lookup(document, aliases(document.document_type, field))?;
            let value = match field {
                LogicalField::Beneficiary | LogicalField::Applicant => party_name(raw),
                _ => raw.trim(),
            };
            (!value.is_empty()).then(|| (field, value.to_string()))
        })
        .collect()
}

/// The credit's tolerance field, if stated.
pub fn tolerance(document: &Document) -> Option<&str> {
    if !document.document_type.is_credit() {
        return None;
    }
    lookup(document, TOLERANCE_KEYS)
}
