//! Gloss and definition extraction for a single sense.

use lift_types::{Record, Value};
use tracing::warn;

use crate::document::Element;

/// Multi-valued fields accumulated across all senses of one entry.
///
/// Keys keep the order in which they were first declared or pushed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fields {
    values: Vec<(String, Vec<String>)>,
}

impl Fields {
    /// Make sure `key` exists, even if nothing is ever pushed under it.
    pub fn declare(&mut self, key: &str) {
        if self.get(key).is_none() {
            self.values.push((key.to_string(), Vec::new()));
        }
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, items)) => items.push(value),
            None => self.values.push((key.to_string(), vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    /// Copy every field into `record` as a list value.
    pub fn apply_to(&self, record: &mut Record) {
        for (key, items) in &self.values {
            record.insert(key.as_str(), Value::List(items.clone()));
        }
    }
}

pub fn gloss_key(lang: &str) -> String {
    format!("gloss_{lang}")
}

pub fn definition_key(lang: &str) -> String {
    format!("definition_{lang}")
}

/// Collect a sense's glosses and definitions into `fields` and return its
/// display text.
///
/// Definitions win over glosses; with neither, a warning is logged and the
/// description is empty.
pub fn resolve_meaning(
    sense: Element<'_, '_>,
    fields: &mut Fields,
    entry_id: &str,
    separator: &str,
) -> String {
    let mut glosses = Vec::new();
    for gloss in sense.descendants_named("gloss") {
        let text = gloss.text();
        match gloss.lang() {
            Some(lang) => fields.push(&gloss_key(lang), text.clone()),
            None => warn!("gloss without language in entry {entry_id}"),
        }
        glosses.push(text);
    }

    let mut definitions = Vec::new();
    for definition in sense.descendants_named("definition") {
        for form in definition.descendants_named("form") {
            let text = form.text();
            match form.lang() {
                Some(lang) => fields.push(&definition_key(lang), text.clone()),
                None => warn!("definition form without language in entry {entry_id}"),
            }
            definitions.push(text);
        }
    }

    if !definitions.is_empty() {
        return definitions.join(separator);
    }
    if !glosses.is_empty() {
        return glosses.join(separator);
    }
    warn!("no definition or gloss for entry {entry_id}");
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LiftDocument;

    fn with_sense<F: FnOnce(Element<'_, '_>)>(sense_xml: &str, f: F) {
        let lift = LiftDocument::from_string(format!("<lift><entry guid=\"e1\">{sense_xml}</entry></lift>"));
        let doc = lift.parse().unwrap();
        let sense = Element::root(&doc)
            .first_descendant("sense")
            .expect("sense in snippet");
        f(sense);
    }

    #[test]
    fn definitions_take_precedence() {
        with_sense(
            r#"<sense id="s1">
                 <gloss lang="en"><text>run</text></gloss>
                 <definition><form lang="en"><text>move fast on foot</text></form>
                             <form lang="fr"><text>aller vite</text></form></definition>
               </sense>"#,
            |sense| {
                let mut fields = Fields::default();
                let desc = resolve_meaning(sense, &mut fields, "e1", "; ");
                assert_eq!(desc, "move fast on foot; aller vite");
                assert_eq!(fields.get("gloss_en"), Some(&["run".to_string()][..]));
                assert_eq!(
                    fields.get("definition_fr"),
                    Some(&["aller vite".to_string()][..])
                );
            },
        );
    }

    #[test]
    fn glosses_are_joined_without_definitions() {
        with_sense(
            r#"<sense id="s1">
                 <gloss lang="en"><text>run</text></gloss>
                 <gloss lang="fr"><text>courir</text></gloss>
               </sense>"#,
            |sense| {
                let mut fields = Fields::default();
                assert_eq!(resolve_meaning(sense, &mut fields, "e1", " / "), "run / courir");
                assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["gloss_en", "gloss_fr"]);
            },
        );
    }

    #[test]
    fn empty_sense_resolves_to_empty_string() {
        with_sense(r#"<sense id="s1"/>"#, |sense| {
            let mut fields = Fields::default();
            fields.declare("Parameter_ID");
            assert_eq!(resolve_meaning(sense, &mut fields, "e1", "; "), "");
            assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["Parameter_ID"]);
        });
    }

    #[test]
    fn accumulates_across_senses() {
        let mut fields = Fields::default();
        fields.push("gloss_en", "to run");
        fields.push("gloss_en", "to jump");
        let mut rec = Record::new();
        fields.apply_to(&mut rec);
        assert_eq!(
            rec.get("gloss_en").and_then(Value::as_list),
            Some(&["to run".to_string(), "to jump".to_string()][..])
        );
    }
}
