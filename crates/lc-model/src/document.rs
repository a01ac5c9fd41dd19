use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of trade document presented under a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// The documentary credit itself (MT700 field map or its text).
    #[serde(alias = "mt700", alias = "letter_of_credit", alias = "lc")]
    Credit,
    #[serde(alias = "invoice")]
    CommercialInvoice,
    #[serde(alias = "bl", alias = "transport_document")]
    BillOfLading,
    #[serde(alias = "insurance", alias = "insurance_certificate")]
    InsuranceDocument,
    PackingList,
    #[serde(alias = "bill_of_exchange")]
    Draft,
    CertificateOfOrigin,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Credit => "credit",
            DocumentType::CommercialInvoice => "commercial_invoice",
            DocumentType::BillOfLading => "bill_of_lading",
            DocumentType::InsuranceDocument => "insurance_document",
            DocumentType::PackingList => "packing_list",
            DocumentType::Draft => "draft",
            DocumentType::CertificateOfOrigin => "certificate_of_origin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Credit => "Documentary credit",
            DocumentType::CommercialInvoice => "Commercial invoice",
            DocumentType::BillOfLading => "Bill of lading",
            DocumentType::InsuranceDocument => "Insurance document",
            DocumentType::PackingList => "Packing list",
            DocumentType::Draft => "Draft",
            DocumentType::CertificateOfOrigin => "Certificate of origin",
        }
    }

    pub fn is_credit(&self) -> bool {
        matches!(self, DocumentType::Credit)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "credit" | "mt700" | "letter_of_credit" | "lc" => Ok(DocumentType::Credit),
            "commercial_invoice" | "invoice" => Ok(DocumentType::CommercialInvoice),
            "bill_of_lading" | "bl" | "transport_document" => Ok(DocumentType::BillOfLading),
            "insurance_document" | "insurance" | "insurance_certificate" => {
                Ok(DocumentType::InsuranceDocument)
            }
            "packing_list" => Ok(DocumentType::PackingList),
            "draft" | "bill_of_exchange" => Ok(DocumentType::Draft),
            "certificate_of_origin" => Ok(DocumentType::CertificateOfOrigin),
            _ => Err(ModelError::UnknownDocumentType(s.to_string())),
        }
    }
}

/// A document with the fields an ingestion step extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub document_type: DocumentType,
    /// Document number as printed (invoice number, B/L number, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Raw field name (or SWIFT tag) to value.
    #[serde(default)]
    pub extracted_fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            reference: None,
            extracted_fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extracted_fields.insert(name.into(), value.into());
        self
    }
}

/// Documents presented together under one credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub id: String,
    pub lc_reference: String,
    pub documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new(id: impl Into<String>, lc_reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lc_reference: lc_reference.into(),
            documents: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Index of the governing credit, if the set contains one.
    pub fn credit_index(&self) -> Option<usize> {
        self.documents
            .iter()
            .position(|d| d.document_type.is_credit())
    }
}

/// Points at one document of a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Position in the document set.
    pub index: usize,
    pub document_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl DocumentRef {
    pub fn of(index: usize, document: &Document) -> Self {
        Self {
            index,
            document_type: document.document_type,
            reference: document.reference.clone(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "{} {}", self.document_type, reference),
            None => write!(f, "{} (#{})", self.document_type, self.index + 1),
        }
    }
}

/// Category of a logical field; drives comparison and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Amount,
    Date,
    PartyName,
    GoodsDescription,
    Quantity,
    Place,
    Reference,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 7] = [
        FieldCategory::Amount,
        FieldCategory::Date,
        FieldCategory::PartyName,
        FieldCategory::GoodsDescription,
        FieldCategory::Quantity,
        FieldCategory::Place,
        FieldCategory::Reference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Amount => "amount",
            FieldCategory::Date => "date",
            FieldCategory::PartyName => "party_name",
            FieldCategory::GoodsDescription => "goods_description",
            FieldCategory::Quantity => "quantity",
            FieldCategory::Place => "place",
            FieldCategory::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        FieldCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

/// Closed set of logical fields the comparator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Amount,
    ShipmentDate,
    LatestShipmentDate,
    ExpiryDate,
    IssueDate,
    Beneficiary,
    Applicant,
    GoodsDescription,
    Quantity,
    PortOfLoading,
    PortOfDischarge,
    CreditNumber,
}

impl LogicalField {
    pub const ALL: [LogicalField; 12] = [
        LogicalField::Amount,
        LogicalField::ShipmentDate,
        LogicalField::LatestShipmentDate,
        LogicalField::ExpiryDate,
        LogicalField::IssueDate,
        LogicalField::Beneficiary,
        LogicalField::Applicant,
        LogicalField::GoodsDescription,
        LogicalField::Quantity,
        LogicalField::PortOfLoading,
        LogicalField::PortOfDischarge,
        LogicalField::CreditNumber,
    ];

    pub fn category(&self) -> FieldCategory {
        match self {
            LogicalField::Amount => FieldCategory::Amount,
            LogicalField::ShipmentDate
            | LogicalField::LatestShipmentDate
            | LogicalField::ExpiryDate
            | LogicalField::IssueDate => FieldCategory::Date,
            LogicalField::Beneficiary | LogicalField::Applicant => FieldCategory::PartyName,
            LogicalField::GoodsDescription => FieldCategory::GoodsDescription,
            LogicalField::Quantity => FieldCategory::Quantity,
            LogicalField::PortOfLoading | LogicalField::PortOfDischarge => FieldCategory::Place,
            LogicalField::CreditNumber => FieldCategory::Reference,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Amount => "amount",
            LogicalField::ShipmentDate => "shipment_date",
            LogicalField::LatestShipmentDate => "latest_shipment_date",
            LogicalField::ExpiryDate => "expiry_date",
            LogicalField::IssueDate => "issue_date",
            LogicalField::Beneficiary => "beneficiary",
            LogicalField::Applicant => "applicant",
            LogicalField::GoodsDescription => "goods_description",
            LogicalField::Quantity => "quantity",
            LogicalField::PortOfLoading => "port_of_loading",
            LogicalField::PortOfDischarge => "port_of_discharge",
            LogicalField::CreditNumber => "credit_number",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogicalField::Amount => "amount",
            LogicalField::ShipmentDate => "shipment date",
            LogicalField::LatestShipmentDate => "latest shipment date",
            LogicalField::ExpiryDate => "expiry date",
            LogicalField::IssueDate => "issue date",
            LogicalField::Beneficiary => "beneficiary name",
            LogicalField::Applicant => "applicant name",
            LogicalField::GoodsDescription => "description of goods",
            LogicalField::Quantity => "quantity",
            LogicalField::PortOfLoading => "port of loading",
            LogicalField::PortOfDischarge => "port of discharge",
            LogicalField::CreditNumber => "credit number",
        }
    }

    /// Fields whose values must agree wherever two documents both state them.
    pub fn must_agree(&self) -> bool {
        !matches!(
            self,
            LogicalField::IssueDate | LogicalField::LatestShipmentDate | LogicalField::ExpiryDate
        )
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
