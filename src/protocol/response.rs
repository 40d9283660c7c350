//! Response definitions
//!
//! The parsed form of a data or notification line.

use serde::Serialize;

use super::record::{parse_record, Record};

/// The parsed content of one line.
///
/// Collapsed by record count: nothing, a single record, or a list. Callers
/// must handle all three shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    #[default]
    Empty,
    Single(Record),
    Many(Vec<Record>),
}

impl Response {
    /// All records as a slice, whatever the shape
    pub fn records(&self) -> &[Record] {
        match self {
            Response::Empty => &[],
            Response::Single(record) => std::slice::from_ref(record),
            Response::Many(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            Response::Empty => Vec::new(),
            Response::Single(record) => vec![record],
            Response::Many(records) => records,
        }
    }

    pub fn first(&self) -> Option<&Record> {
        self.records().first()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    fn from_records(mut records: Vec<Record>) -> Self {
        match records.len() {
            0 => Response::Empty,
            1 => Response::Single(records.remove(0)),
            _ => Response::Many(records),
        }
    }
}

/// Parse a line body (leading keyword already removed) into records
pub fn parse_response(line: &str) -> Response {
    let records = line
        .split('|')
        .map(parse_record)
        .filter(|record| !record.is_empty())
        .collect();
    Response::from_records(records)
}
