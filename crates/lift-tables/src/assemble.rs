//! Final pass over the accumulated records: language resolution, the
//! canonical `Meaning` column, and flattening into output tables.

use lift_types::Table;
use tracing::{info, warn};

use crate::config::ConvertConfig;
use crate::document::Element;
use crate::entry::Decomposed;
use crate::meaning::gloss_key;

pub const MEANING: &str = "Meaning";
pub const LANGUAGE_ID: &str = "Language_ID";

/// Object and meaning language codes for one conversion.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Languages {
    pub object: Option<String>,
    pub meaning: Option<String>,
}

impl Languages {
    /// Take both codes from `config`, inferring the missing ones from the
    /// first main entries that carry them.
    pub fn resolve(entries: &[Element<'_, '_>], config: &ConvertConfig) -> Self {
        let object = config.obj_lg.clone().or_else(|| {
            let lang = entries.iter().find_map(|e| object_language(*e))?;
            info!("assuming [{lang}] to be the object language");
            Some(lang.to_string())
        });
        let meaning = config.gloss_lg.clone().or_else(|| {
            let lang = entries.iter().find_map(|e| meaning_language(*e))?;
            info!("using [{lang}] as the main meta language ('{MEANING}' column)");
            Some(lang.to_string())
        });
        Self { object, meaning }
    }
}

fn object_language<'a>(entry: Element<'a, '_>) -> Option<&'a str> {
    entry.first_descendant("form")?.lang()
}

/// Language of the entry's first gloss, else of its first definition form.
fn meaning_language<'a>(entry: Element<'a, '_>) -> Option<&'a str> {
    if let Some(gloss) = entry.first_descendant("gloss") {
        return gloss.lang();
    }
    entry
        .first_descendant("definition")?
        .first_descendant("form")?
        .lang()
}

/// Output tables of one conversion.
#[derive(Clone, Debug)]
pub struct Tables {
    pub morphemes: Table,
    pub morphs: Table,
    pub senses: Table,
    /// Present only when at least one example was found.
    pub examples: Option<Table>,
}

impl Tables {
    /// Tables in write order, skipping an absent example table.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        [&self.morphs, &self.morphemes, &self.senses]
            .into_iter()
            .chain(self.examples.as_ref())
    }
}

/// Rename the meaning-language gloss column, stamp the language identifier
/// and flatten every record set into a table.
pub fn assemble(decomposed: Decomposed, languages: &Languages, config: &ConvertConfig) -> Tables {
    let Decomposed {
        mut morphemes,
        mut morphs,
        senses,
        examples,
    } = decomposed;

    let meaning_column = languages.meaning.as_deref().map(gloss_key);
    if meaning_column.is_none() {
        warn!("no meaning language found; no '{MEANING}' column will be produced");
    }
    let language_id = config
        .language_id
        .clone()
        .or_else(|| languages.object.clone())
        .unwrap_or_else(|| {
            warn!("no object language found; leaving {LANGUAGE_ID} empty");
            String::new()
        });

    if let Some(column) = meaning_column.as_deref() {
        for record in morphemes.iter_mut().chain(morphs.iter_mut()) {
            record.rename(column, MEANING);
        }
    }

    let sep = config.separator();
    let mut morphemes = Table::from_records("morphemes", &morphemes, sep);
    let mut morphs = Table::from_records("morphs", &morphs, sep);
    morphemes.set_column(LANGUAGE_ID, &language_id);
    morphs.set_column(LANGUAGE_ID, &language_id);

    Tables {
        morphemes,
        morphs,
        senses: Table::from_records("senses", &senses, sep),
        examples: (!examples.is_empty())
            .then(|| Table::from_records("dictionary_examples", &examples, sep)),
    }
}
