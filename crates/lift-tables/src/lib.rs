//! Convert LIFT lexicons into relational tables.
//!
//! A LIFT document is a tree of `<entry>` elements, each with senses (glosses,
//! definitions, examples), a primary form set (`<lexical-unit>`) and optional
//! `<variant>` form sets. This crate decomposes it into four flat tables:
//!
//! - **morphemes**: one row per main entry (`ID`, `Gramm`, `Type`, `Form`,
//!   `Name`, `Parameter_ID`, `Meaning`, `Language_ID`, other gloss and
//!   definition columns);
//! - **morphs**: one row per concrete form, including forms of entries that
//!   are variants of another entry;
//! - **senses**: `ID`, `Description`, `Entry_ID`;
//! - **dictionary_examples**: only when the lexicon has examples.
//!
//! The conversion runs in three phases over the parsed tree:
//! [`VariantIndex::build`] removes variant entries and files them under their
//! main entry, [`EntryDecomposer`] turns each remaining entry into records,
//! and [`assemble`] resolves languages and flattens records into [`Table`]s.
//!
//! # Example
//! ```no_run
//! use lift_tables::{ConvertConfig, LiftDocument, LoadMode};
//!
//! # fn main() -> Result<(), lift_tables::ConvertError> {
//! let lift = LiftDocument::load_with_mode("dictionary.lift", LoadMode::Mmap)?;
//! let config = ConvertConfig::load("cldf-config.yaml")?;
//! let tables = lift.convert(&config)?;
//! for table in tables.iter() {
//!     println!("{}: {} rows", table.name(), table.len());
//! }
//! # Ok(()) }
//! ```

pub mod assemble;
pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod examples;
pub mod forms;
pub mod meaning;
pub mod slug;
pub mod variants;

pub use assemble::{Languages, Tables, assemble};
pub use config::ConvertConfig;
pub use document::{Element, LiftDocument, LoadMode};
pub use entry::{Decomposed, EntryDecomposer};
pub use error::{ConvertError, Result};
pub use lift_types::{FieldKind, Record, Table, Value, VariantDescriptor, split_cell};
pub use variants::VariantIndex;

use roxmltree::Document;
use tracing::info;

/// Run the full conversion over a parsed document.
pub fn convert(doc: &Document<'_>, config: &ConvertConfig) -> Result<Tables> {
    let root = Element::root(doc);
    let (variants, entries) = VariantIndex::build(root.descendants_named("entry"))?;
    let languages = Languages::resolve(&entries, config);

    let decomposer = EntryDecomposer::new(&variants, config.separator());
    let mut decomposed = Decomposed::default();
    for entry in &entries {
        decomposer.decompose(*entry, &mut decomposed)?;
    }
    info!(
        "decomposed {} entries into {} morphs, {} senses, {} examples",
        decomposed.morphemes.len(),
        decomposed.morphs.len(),
        decomposed.senses.len(),
        decomposed.examples.len()
    );

    Ok(assemble(decomposed, &languages, config))
}

impl LiftDocument {
    /// Parse and convert this document.
    pub fn convert(&self, config: &ConvertConfig) -> Result<Tables> {
        let doc = self.parse()?;
        convert(&doc, config)
    }
}
