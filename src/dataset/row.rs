//! Rows and row sets
//!
//! A row stores its values positionally; names come from the schema the row
//! set carries. Serialization emits one JSON object per row with keys in
//! schema order.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::schema::Schema;
use super::value::{Value, NULL};

/// One data row and its zero-based position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    position: u64,
    values: Vec<Value>,
}

impl Row {
    pub fn new(position: u64, values: Vec<Value>) -> Self {
        Self { position, values }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }
}

/// Ordered rows conforming to one schema
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    schema: Schema,
    rows: Vec<Row>,
}

impl RowSet {
    /// An empty result typed to the schema's columns
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    /// Value of a named column in every row, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.schema.position(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).unwrap_or(&NULL))
                .collect(),
        )
    }
}

struct Record<'a> {
    schema: &'a Schema,
    row: &'a Row,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.schema.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (idx, name) in columns.iter().enumerate() {
            map.serialize_entry(name, self.row.get(idx).unwrap_or(&NULL))?;
        }
        map.end()
    }
}

impl Serialize for RowSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                schema: &self.schema,
                row,
            })?;
        }
        seq.end()
    }
}
