//! Package converted tables as a CLDF Dictionary dataset.
//!
//! The dataset lives in `<output>/cldf/` and consists of `entries.csv`,
//! `senses.csv`, `examples.csv` (when the lexicon has examples) and a CSVW
//! `metadata.json` describing them. Columns are projected from the
//! converter's tables onto the CLDF Dictionary module's standard columns.
//! Validating the dataset is left to external CLDF tooling.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lift_tables::Tables;
use lift_tables::assemble::LANGUAGE_ID;
use lift_types::{FieldKind, Record, Table};
use serde::Serialize;
use tracing::info;

use crate::writer::write_table_as;

const CSVW_CONTEXT: &str = "http://www.w3.org/ns/csvw";
const TERMS: &str = "http://cldf.clld.org/v1.0/terms.rdf#";
pub const METADATA_FILE: &str = "metadata.json";

/// One output column and where its values come from.
struct ColumnMap {
    name: &'static str,
    property: &'static str,
    source: Source,
}

enum Source {
    Column(&'static str),
    /// First non-empty cell among the source columns whose name starts with
    /// the prefix, checked row by row.
    Prefixed(&'static str),
    Constant(String),
}

struct Component {
    url: &'static str,
    table: &'static str,
    columns: Vec<ColumnMap>,
}

#[derive(Serialize)]
struct Metadata {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "dc:conformsTo")]
    conforms_to: String,
    tables: Vec<TableMetadata>,
}

#[derive(Serialize)]
struct TableMetadata {
    url: String,
    #[serde(rename = "dc:conformsTo")]
    conforms_to: String,
    #[serde(rename = "tableSchema")]
    table_schema: TableSchema,
}

#[derive(Serialize)]
struct TableSchema {
    columns: Vec<ColumnMetadata>,
    #[serde(rename = "primaryKey")]
    primary_key: Vec<String>,
}

#[derive(Serialize)]
struct ColumnMetadata {
    name: String,
    #[serde(rename = "propertyUrl")]
    property_url: String,
    datatype: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    separator: Option<String>,
}

/// Write the CLDF dataset for `tables` below `output_dir` and return the
/// dataset directory.
pub fn write_dictionary_dataset(
    tables: &Tables,
    output_dir: &Path,
    separator: &str,
) -> Result<PathBuf> {
    let cldf_dir = output_dir.join("cldf");
    fs::create_dir_all(&cldf_dir).with_context(|| format!("create {}", cldf_dir.display()))?;

    let language = tables
        .morphemes
        .cell(0, LANGUAGE_ID)
        .unwrap_or_default()
        .to_string();

    let mut components = vec![
        (
            Component {
                url: "entries.csv",
                table: "EntryTable",
                columns: vec![
                    column("ID", "id", Source::Column("ID")),
                    column("Language_ID", "languageReference", Source::Column(LANGUAGE_ID)),
                    column("Headword", "headword", Source::Column("Name")),
                    column("Part_Of_Speech", "partOfSpeech", Source::Column("Gramm")),
                ],
            },
            &tables.morphemes,
        ),
        (
            Component {
                url: "senses.csv",
                table: "SenseTable",
                columns: vec![
                    column("ID", "id", Source::Column("ID")),
                    column("Description", "description", Source::Column("Description")),
                    column("Entry_ID", "entryReference", Source::Column("Entry_ID")),
                ],
            },
            &tables.senses,
        ),
    ];
    if let Some(examples) = &tables.examples {
        components.push((
            Component {
                url: "examples.csv",
                table: "ExampleTable",
                columns: vec![
                    column("ID", "id", Source::Column("ID")),
                    column("Language_ID", "languageReference", Source::Constant(language)),
                    column("Primary_Text", "primaryText", Source::Column("Form")),
                    column(
                        "Translated_Text",
                        "translatedText",
                        Source::Prefixed("translation-"),
                    ),
                ],
            },
            examples,
        ));
    }

    let mut metadata = Metadata {
        context: CSVW_CONTEXT,
        conforms_to: format!("{TERMS}Dictionary"),
        tables: Vec::new(),
    };
    for (component, source) in &components {
        let projected = project(source, &component.columns);
        let stem = component.url.trim_end_matches(".csv");
        write_table_as(&cldf_dir, stem, &projected)?;
        metadata.tables.push(describe(component, source, separator));
    }

    let metadata_path = cldf_dir.join(METADATA_FILE);
    let file = File::create(&metadata_path)
        .with_context(|| format!("create {}", metadata_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &metadata)
        .with_context(|| format!("write {}", metadata_path.display()))?;

    info!(
        "wrote CLDF dictionary with {} tables to {}",
        metadata.tables.len(),
        cldf_dir.display()
    );
    Ok(cldf_dir)
}

fn column(name: &'static str, property: &'static str, source: Source) -> ColumnMap {
    ColumnMap {
        name,
        property,
        source,
    }
}

fn project(source: &Table, columns: &[ColumnMap]) -> Table {
    let indices: Vec<Vec<usize>> = columns
        .iter()
        .map(|c| match &c.source {
            Source::Column(name) => source.column_index(name).into_iter().collect(),
            Source::Prefixed(prefix) => source
                .columns()
                .iter()
                .enumerate()
                .filter(|(_, n)| n.starts_with(prefix))
                .map(|(i, _)| i)
                .collect(),
            Source::Constant(_) => Vec::new(),
        })
        .collect();

    let records: Vec<Record> = source
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(&indices)
                .map(|(c, idx)| {
                    let value = match &c.source {
                        Source::Constant(v) => v.clone(),
                        _ => idx
                            .iter()
                            .map(|&i| row[i].as_str())
                            .find(|cell| !cell.is_empty())
                            .unwrap_or_default()
                            .to_string(),
                    };
                    (c.name, value)
                })
                .collect()
        })
        .collect();

    let mut table = Table::from_records(source.name(), &records, "");
    // Keep the header complete even when there are no rows.
    for c in columns {
        if table.column_index(c.name).is_none() {
            table.set_column(c.name, "");
        }
    }
    table
}

/// Multi-valued source columns carry the cell separator in their schema.
fn describe(component: &Component, source: &Table, separator: &str) -> TableMetadata {
    TableMetadata {
        url: component.url.to_string(),
        conforms_to: format!("{TERMS}{}", component.table),
        table_schema: TableSchema {
            columns: component
                .columns
                .iter()
                .map(|c| ColumnMetadata {
                    name: c.name.to_string(),
                    property_url: format!("{TERMS}{}", c.property),
                    datatype: "string",
                    separator: match &c.source {
                        Source::Column(name) => source.column_kind(name) == Some(FieldKind::Multi),
                        _ => false,
                    }
                    .then(|| separator.to_string()),
                })
                .collect(),
            primary_key: vec!["ID".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, rows: &[&[(&str, &str)]]) -> Table {
        let records: Vec<Record> = rows
            .iter()
            .map(|r| r.iter().copied().collect())
            .collect();
        Table::from_records(name, &records, "; ")
    }

    #[test]
    fn projects_columns_with_fallbacks() {
        let examples = table(
            "dictionary_examples",
            &[&[
                ("ID", "e1-0"),
                ("Form", "taka ni"),
                ("note-literal-es", "corre"),
                ("translation-free-translation-en", "he runs"),
            ]],
        );
        let cols = vec![
            column("ID", "id", Source::Column("ID")),
            column("Language_ID", "languageReference", Source::Constant("cux".into())),
            column("Primary_Text", "primaryText", Source::Column("Form")),
            column("Translated_Text", "translatedText", Source::Prefixed("translation-")),
            column("Comment", "comment", Source::Column("absent")),
        ];
        let projected = project(&examples, &cols);
        assert_eq!(
            projected.columns(),
            &["ID", "Language_ID", "Primary_Text", "Translated_Text", "Comment"]
        );
        assert_eq!(
            projected.rows()[0],
            vec!["e1-0", "cux", "taka ni", "he runs", ""]
        );
    }

    #[test]
    fn translation_falls_back_to_later_language() {
        let examples = table(
            "dictionary_examples",
            &[
                &[("ID", "e1-0"), ("translation-en", "he runs"), ("translation-pt", "ele corre")],
                &[("ID", "e1-1"), ("translation-pt", "ele salta")],
            ],
        );
        let cols = vec![column("Translated_Text", "translatedText", Source::Prefixed("translation-"))];
        let projected = project(&examples, &cols);
        assert_eq!(
            projected.column("Translated_Text"),
            Some(vec!["he runs", "ele salta"])
        );
    }

    #[test]
    fn separator_follows_column_kind() {
        let mut rec = Record::new();
        rec.insert("ID", "m1");
        rec.insert("Gramm", vec!["v".to_string(), "n".to_string()]);
        let morphemes = Table::from_records("morphemes", &[rec], " | ");
        let component = Component {
            url: "entries.csv",
            table: "EntryTable",
            columns: vec![
                column("ID", "id", Source::Column("ID")),
                column("Part_Of_Speech", "partOfSpeech", Source::Column("Gramm")),
            ],
        };
        let described = describe(&component, &morphemes, " | ");
        let separators: Vec<_> = described
            .table_schema
            .columns
            .iter()
            .map(|c| c.separator.as_deref())
            .collect();
        assert_eq!(separators, vec![None, Some(" | ")]);
    }

    #[test]
    fn empty_table_keeps_header() {
        let empty = Table::from_records("senses", &[], "; ");
        let cols = vec![column("ID", "id", Source::Column("ID"))];
        assert_eq!(project(&empty, &cols).columns(), &["ID"]);
    }
}
