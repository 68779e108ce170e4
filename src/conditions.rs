// Condition-matching engine.
//
// Every statistic in the catalogue is a conjunction of conditions over one
// record, evaluated per record in a single pass. The same predicates drive
// both the counts and the drill-down listings.
use crate::types::{Field, JobSeeker};
use crate::util::{months_between, parse_date_safe};
use chrono::NaiveDate;

/// Comparison applied to a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    Equals(String),
    NotEquals(String),
    /// Satisfied when the field value is none of the listed codes. Used for
    /// fields with more than one "already compliant" code.
    NotIn(Vec<String>),
}

/// One predicate over a single record field.
///
/// Absent fields read as the empty string, so `Equals("")` matches records
/// where the field is empty or was never present in the export. That blank
/// state is meaningful (e.g. "no goal in job plan") and must stay
/// distinguishable from a real code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: Field,
    pub test: Test,
}

impl Condition {
    pub fn equals(field: Field, value: &str) -> Self {
        Condition {
            field,
            test: Test::Equals(value.to_string()),
        }
    }

    pub fn not_equals(field: Field, value: &str) -> Self {
        Condition {
            field,
            test: Test::NotEquals(value.to_string()),
        }
    }

    pub fn not_in(field: Field, values: &[&str]) -> Self {
        Condition {
            field,
            test: Test::NotIn(values.iter().map(|v| v.to_string()).collect()),
        }
    }

    /// Case-sensitive exact comparison against the typed field accessor.
    pub fn matches(&self, record: &JobSeeker) -> bool {
        let actual = record.field(self.field);
        match &self.test {
            Test::Equals(expected) => actual == expected,
            Test::NotEquals(expected) => actual != expected,
            Test::NotIn(set) => !set.iter().any(|v| v == actual),
        }
    }
}

/// Count records where `field == value`.
pub fn count_by_column(data: &[JobSeeker], field: Field, value: &str) -> usize {
    data.iter().filter(|r| r.field(field) == value).count()
}

/// Count records satisfying every condition (logical AND, no OR support).
pub fn count_by_conditions(data: &[JobSeeker], conditions: &[Condition]) -> usize {
    data.iter()
        .filter(|r| conditions.iter().all(|c| c.matches(r)))
        .count()
}

/// The matching subset, in input order.
pub fn filter_by_conditions<'a>(data: &'a [JobSeeker], conditions: &[Condition]) -> Vec<&'a JobSeeker> {
    data.iter()
        .filter(|r| conditions.iter().all(|c| c.matches(r)))
        .collect()
}

/// Whether the record's WE12 end date is more than 3 calendar months before
/// `today`.
///
/// Month arithmetic only; the day of month never enters the comparison. A
/// missing or unparseable date resolves to "not expired" — the loader
/// reports how many such dates it saw, but the check itself never fails.
pub fn we12_expired(record: &JobSeeker, today: NaiveDate) -> bool {
    match parse_date_safe(Some(record.we12_end_date.as_str())) {
        Some(end_date) => months_between(end_date, today) > 3,
        None => false,
    }
}
