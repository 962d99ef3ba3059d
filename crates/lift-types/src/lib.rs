//! Shared types for the relational view of a LIFT lexicon.
//!
//! Records are built while a document is decomposed and keep the kind of
//! every field next to its data: a [`Value::Text`] is a single cell, a
//! [`Value::List`] is a multi-valued cell that is joined with the configured
//! separator only when the record set is flattened into a [`Table`].
//!
//! ```rust
//! use lift_types::{Record, Table, Value};
//!
//! let mut rec = Record::new();
//! rec.insert("ID", "e1");
//! rec.insert("Gramm", vec!["v".to_string(), "n".to_string()]);
//! let table = Table::from_records("morphemes", &[rec], "; ");
//! assert_eq!(table.cell(0, "Gramm"), Some("v; n"));
//! ```

use std::fmt;

/// Whether a field holds one value or an ordered list of values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    Scalar,
    Multi,
}

/// A single field value, tagged with its kind at the point it is produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Text(_) => FieldKind::Scalar,
            Value::List(_) => FieldKind::Multi,
        }
    }

    /// Render the value as one output cell, joining lists with `separator`.
    pub fn render(&self, separator: &str) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::List(items) => items.join(separator),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::Text(_) => None,
            Value::List(items) => Some(items),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Ordered column → value map. Insertion order is the column order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place or appending a new column.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value of `key`, if present and not a list.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// Rename a column while keeping its position. Returns `false` if `from`
    /// is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if self.get(from).is_none() {
            return false;
        }
        if from != to {
            self.fields.retain(|(k, _)| k != to);
        }
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == from) {
            slot.0 = to.to_string();
        }
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rec = Record::new();
        rec.extend(iter);
        rec
    }
}

/// Flattened output table: every cell is a plain string. The kind of each
/// column survives flattening so writers can describe joined cells.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    kinds: Vec<FieldKind>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Flatten records into a table.
    ///
    /// Columns are the union of all record keys in order of first appearance.
    /// Lists are joined with `separator`; cells a record does not carry are
    /// filled with an empty string. A column is multi-valued if any record
    /// holds a list under it.
    pub fn from_records(name: impl Into<String>, records: &[Record], separator: &str) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut kinds: Vec<FieldKind> = Vec::new();
        for rec in records {
            for (key, value) in rec.iter() {
                match columns.iter().position(|c| c == key) {
                    Some(idx) => {
                        if value.kind() == FieldKind::Multi {
                            kinds[idx] = FieldKind::Multi;
                        }
                    }
                    None => {
                        columns.push(key.to_string());
                        kinds.push(value.kind());
                    }
                }
            }
        }

        let rows = records
            .iter()
            .map(|rec| {
                columns
                    .iter()
                    .map(|col| {
                        rec.get(col)
                            .map(|v| v.render(separator))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            kinds,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_kind(&self, name: &str) -> Option<FieldKind> {
        self.column_index(name).map(|idx| self.kinds[idx])
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Set `column` to `value` on every row, appending the column if it is new.
    /// The column becomes scalar.
    pub fn set_column(&mut self, column: &str, value: &str) {
        match self.column_index(column) {
            Some(idx) => {
                self.kinds[idx] = FieldKind::Scalar;
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.columns.push(column.to_string());
                self.kinds.push(FieldKind::Scalar);
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Index of the first row whose `column` equals `value`.
    pub fn find_row(&self, column: &str, value: &str) -> Option<usize> {
        let idx = self.column_index(column)?;
        self.rows.iter().position(|row| row[idx] == value)
    }
}

/// An entry that is a formal variant of another entry, keyed by the main
/// entry's identity in the variant index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantDescriptor {
    pub id: String,
    pub form: String,
    pub morph_type: String,
}

/// Split a joined multi-valued cell back into its values.
///
/// Inverse of [`Value::render`] for lists whose items do not contain
/// `separator`. An empty cell yields no values.
pub fn split_cell<'a>(cell: &'a str, separator: &str) -> Vec<&'a str> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(separator).collect()
}
