//! Pairwise comparison of the documents in a set.

use std::collections::{BTreeMap, BTreeSet};

use lc_model::{
    CandidateMismatch, DocumentRef, DocumentSet, FieldCategory, LogicalField, MismatchKind,
};
use tracing::{debug, warn};

use crate::config::ComparisonConfig;
use crate::extract::{extract, tolerance};
use crate::values::{Tolerance, normalize_text, parse_amount, parse_date, parse_quantity, parse_tolerance};

/// Date fields bounded by a later date on another document.
const DATE_BOUNDS: [(LogicalField, LogicalField); 3] = [
    (LogicalField::ShipmentDate, LogicalField::LatestShipmentDate),
    (LogicalField::ShipmentDate, LogicalField::ExpiryDate),
    (LogicalField::IssueDate, LogicalField::ExpiryDate),
];

/// Compare every pair of documents in `set`, in set order.
///
/// Pure with respect to its inputs: the same set and config always give the
/// same mismatches in the same order.
pub fn compare(set: &DocumentSet, config: &ComparisonConfig) -> Vec<CandidateMismatch> {
    let mut comparison = Comparison::new(set, config);
    for a in 0..set.documents.len() {
        for b in a + 1..set.documents.len() {
            comparison.pair(a, b);
        }
    }
    debug!(
        document_set = %set.id,
        documents = set.documents.len(),
        mismatches = comparison.found.len(),
        "compared document set"
    );
    comparison.found
}

struct Comparison<'a> {
    set: &'a DocumentSet,
    config: &'a ComparisonConfig,
    fields: Vec<BTreeMap<LogicalField, String>>,
    tolerance: Option<Tolerance>,
    found: Vec<CandidateMismatch>,
}

impl<'a> Comparison<'a> {
    fn new(set: &'a DocumentSet, config: &'a ComparisonConfig) -> Self {
        let tolerance = set
            .credit_index()
            .and_then(|index| tolerance(&set.documents[index]))
            .and_then(|raw| {
                let parsed = parse_tolerance(raw);
                if parsed.is_none() {
                    warn!(document_set = %set.id, value = raw, "ignoring unreadable credit tolerance");
                }
                parsed
            });

        Self {
            set,
            config,
            fields: set.documents.iter().map(extract).collect(),
            tolerance,
            found: Vec::new(),
        }
    }

    fn is_credit(&self, index: usize) -> bool {
        self.set.documents[index].document_type.is_credit()
    }

    fn pair(&mut self, a: usize, b: usize) {
        for field in LogicalField::ALL {
            if !field.must_agree() {
                continue;
            }
            let (Some(value_a), Some(value_b)) = (self.get(a, field), self.get(b, field)) else {
                continue;
            };
            self.same_field(field, a, &value_a, b, &value_b);
        }

        // Each unreadable date is reported once per pair.
        let mut unreadable: BTreeSet<(usize, LogicalField)> = BTreeSet::new();
        for (x, y) in [(a, b), (b, a)] {
            for (field, bound) in DATE_BOUNDS {
                let (Some(date), Some(limit)) = (self.get(x, field), self.get(y, bound)) else {
                    continue;
                };
                match (parse_date(&date), parse_date(&limit)) {
                    (Some(d), Some(l)) if d > l => {
                        self.push(field, bound, MismatchKind::LaterThan, (x, &date), (y, &limit), false);
                    }
                    (Some(_), Some(_)) => {}
                    (parsed, _) => {
                        let culprit = if parsed.is_none() { (x, field) } else { (y, bound) };
                        if unreadable.insert(culprit) {
                            self.push(field, bound, MismatchKind::Unreadable, (x, &date), (y, &limit), false);
                        }
                    }
                }
            }
        }
    }

    fn get(&self, index: usize, field: LogicalField) -> Option<String> {
        self.fields[index].get(&field).cloned()
    }

    fn same_field(&mut self, field: LogicalField, a: usize, value_a: &str, b: usize, value_b: &str) {
        let side_a = (a, value_a);
        let side_b = (b, value_b);
        match field.category() {
            FieldCategory::Amount => self.amounts(field, side_a, side_b),
            FieldCategory::Date => match (parse_date(value_a), parse_date(value_b)) {
                (Some(x), Some(y)) => self.unless_equal(field, x, y, side_a, side_b),
                _ => self.push(field, field, MismatchKind::Unreadable, side_a, side_b, false),
            },
            FieldCategory::Quantity => match (parse_quantity(value_a), parse_quantity(value_b)) {
                (Some(x), Some(y)) => self.unless_equal(field, x, y, side_a, side_b),
                _ => self.push(field, field, MismatchKind::Unreadable, side_a, side_b, false),
            },
            FieldCategory::PartyName
            | FieldCategory::GoodsDescription
            | FieldCategory::Place
            | FieldCategory::Reference => self.texts(field, side_a, side_b),
        }
    }

    fn amounts(&mut self, field: LogicalField, side_a: (usize, &str), side_b: (usize, &str)) {
        let (Some(x), Some(y)) = (parse_amount(side_a.1), parse_amount(side_b.1)) else {
            self.push(field, field, MismatchKind::Unreadable, side_a, side_b, false);
            return;
        };

        if matches!((&x.currency, &y.currency), (Some(cx), Some(cy)) if cx != cy) {
            self.push(field, field, MismatchKind::Differs, side_a, side_b, false);
            return;
        }

        let credit_a = self.is_credit(side_a.0);
        let credit_b = self.is_credit(side_b.0);
        if credit_a != credit_b {
            // The credit amount is a ceiling, not a target.
            let (credit, presented) = if credit_a { (&x, &y) } else { (&y, &x) };
            let ceiling = match self.tolerance {
                Some(tolerance) => tolerance.ceiling(credit.value),
                None => Some(credit.value),
            };
            match ceiling {
                Some(ceiling) if presented.value > ceiling => {
                    self.push(field, field, MismatchKind::ExceedsCredit, side_a, side_b, false);
                }
                Some(_) => {}
                None => self.push(field, field, MismatchKind::Unreadable, side_a, side_b, false),
            }
        } else if x.value != y.value {
            self.push(field, field, MismatchKind::Differs, side_a, side_b, false);
        }
    }

    fn texts(&mut self, field: LogicalField, side_a: (usize, &str), side_b: (usize, &str)) {
        if normalize_text(side_a.1, false) == normalize_text(side_b.1, false) {
            return;
        }
        let equivalent = self.config.has_equivalence()
            && self.config.canonical(side_a.1) == self.config.canonical(side_b.1);
        self.push(field, field, MismatchKind::Differs, side_a, side_b, equivalent);
    }

    fn unless_equal<T: PartialEq>(
        &mut self,
        field: LogicalField,
        x: T,
        y: T,
        side_a: (usize, &str),
        side_b: (usize, &str),
    ) {
        if x != y {
            self.push(field, field, MismatchKind::Differs, side_a, side_b, false);
        }
    }

    fn push(
        &mut self,
        field: LogicalField,
        counterpart: LogicalField,
        kind: MismatchKind,
        (a, value_a): (usize, &str),
        (b, value_b): (usize, &str),
        equivalent_variant: bool,
    ) {
        self.found.push(CandidateMismatch {
            field,
            counterpart,
            kind,
            document_a: DocumentRef::of(a, &self.set.documents[a]),
            value_a: value_a.to_string(),
            document_b: DocumentRef::of(b, &self.set.documents[b]),
            value_b: value_b.to_string(),
            equivalent_variant,
        });
    }
}
