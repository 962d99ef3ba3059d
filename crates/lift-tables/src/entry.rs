//! Per-entry decomposition into sense, example, morph and morpheme records.

use lift_types::{Record, Value};
use tracing::debug;

use crate::document::Element;
use crate::error::{ConvertError, Result};
use crate::examples::flatten_examples;
use crate::forms::extract_forms;
use crate::meaning::{Fields, resolve_meaning};
use crate::variants::VariantIndex;

pub const MORPH_TYPE: &str = "morph-type";
pub const PARAMETER_ID: &str = "Parameter_ID";

/// Stable identity of an entry: its `guid`, else its `id`.
pub fn entry_identity<'a>(entry: Element<'a, '_>) -> Result<&'a str> {
    entry
        .attr("guid")
        .or_else(|| entry.attr("id"))
        .ok_or_else(|| ConvertError::missing("entry", "guid", "<unknown>"))
}

/// Records gathered from all decomposed entries, in document order.
#[derive(Debug, Default)]
pub struct Decomposed {
    pub morphemes: Vec<Record>,
    pub morphs: Vec<Record>,
    pub senses: Vec<Record>,
    pub examples: Vec<Record>,
}

pub struct EntryDecomposer<'c> {
    variants: &'c VariantIndex,
    separator: &'c str,
}

impl<'c> EntryDecomposer<'c> {
    pub fn new(variants: &'c VariantIndex, separator: &'c str) -> Self {
        Self {
            variants,
            separator,
        }
    }

    /// Decompose one main entry, appending its records to `out`.
    ///
    /// Only direct `<sense>` children are visited. Fails when the entry or
    /// one of its `<variant>` form sets has no morph-type trait, or when the
    /// entry ends up without any form.
    pub fn decompose(&self, entry: Element<'_, '_>, out: &mut Decomposed) -> Result<()> {
        let entry_id = entry_identity(entry)?;
        let morph_type = entry
            .trait_value(MORPH_TYPE)
            .ok_or_else(|| ConvertError::missing("entry", "morph-type trait", entry_id))?;

        let mut gramm = Vec::new();
        let mut fields = Fields::default();
        fields.declare(PARAMETER_ID);

        for sense in entry.children_named("sense") {
            gramm.extend(
                sense
                    .descendants_named("grammatical-info")
                    .filter_map(|g| g.attr("value"))
                    .map(str::to_string),
            );
            let sense_id = sense
                .attr("id")
                .ok_or_else(|| ConvertError::missing("sense", "id", entry_id))?;
            fields.push(PARAMETER_ID, sense_id);

            let description = resolve_meaning(sense, &mut fields, entry_id, self.separator);
            let mut record = Record::new();
            record.insert("ID", sense_id);
            record.insert("Description", description);
            record.insert("Entry_ID", entry_id);
            out.senses.push(record);

            flatten_examples(sense, &mut out.examples, entry_id);
        }

        let mut morphs = Vec::new();
        let mut counter = 0;
        if let Some(unit) = entry.first_child("lexical-unit") {
            counter = extract_forms(unit, entry_id, morph_type, &fields, &mut morphs, counter);
        }
        for variant in entry.children_named("variant") {
            let variant_type = variant
                .trait_value(MORPH_TYPE)
                .ok_or_else(|| ConvertError::missing("variant", "morph-type trait", entry_id))?;
            counter = extract_forms(variant, entry_id, variant_type, &fields, &mut morphs, counter);
        }
        for variant in self.variants.variants_of(entry_id) {
            let mut morph = Record::new();
            morph.insert("ID", variant.id.as_str());
            morph.insert("Form", variant.form.as_str());
            morph.insert("Type", variant.morph_type.as_str());
            morph.insert("Morpheme_ID", entry_id);
            fields.apply_to(&mut morph);
            morphs.push(morph);
        }

        let name = morphs
            .first()
            .and_then(|m| m.text("Form"))
            .ok_or_else(|| ConvertError::MissingForm {
                entry: entry_id.to_string(),
            })?
            .to_string();
        let forms: Vec<String> = morphs
            .iter()
            .filter_map(|m| m.text("Form"))
            .map(str::to_string)
            .collect();

        let mut morpheme = Record::new();
        morpheme.insert("ID", entry_id);
        morpheme.insert("Gramm", Value::List(gramm));
        morpheme.insert("Type", morph_type);
        morpheme.insert("Form", Value::List(forms));
        morpheme.insert("Name", name);
        fields.apply_to(&mut morpheme);

        debug!("entry {} -> {} morphs", entry_id, morphs.len());
        out.morphemes.push(morpheme);
        out.morphs.extend(morphs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LiftDocument;

    const ENTRY: &str = r#"<lift>
  <entry id="taka_e1" guid="e1">
    <lexical-unit><form lang="cux"><text>taka</text></form></lexical-unit>
    <trait name="morph-type" value="stem"/>
    <variant>
      <form lang="cux"><text>tak</text></form>
      <trait name="morph-type" value="bound stem"/>
    </variant>
    <sense id="s1">
      <grammatical-info value="v"/>
      <gloss lang="en"><text>to run</text></gloss>
      <example><form lang="cux"><text>taka ni</text></form></example>
      <sense id="s1.1"><gloss lang="en"><text>to hurry</text></gloss></sense>
    </sense>
    <sense id="s2">
      <grammatical-info value="n"/>
      <gloss lang="en"><text>a run</text></gloss>
    </sense>
  </entry>
</lift>"#;

    fn decompose(xml: &str, variants: &VariantIndex) -> Result<Decomposed> {
        let lift = LiftDocument::from_string(xml);
        let doc = lift.parse()?;
        let decomposer = EntryDecomposer::new(variants, "; ");
        let mut out = Decomposed::default();
        for entry in Element::root(&doc).children_named("entry") {
            decomposer.decompose(entry, &mut out)?;
        }
        Ok(out)
    }

    #[test]
    fn builds_one_morpheme_per_entry() {
        let out = decompose(ENTRY, &VariantIndex::default()).unwrap();
        assert_eq!(out.morphemes.len(), 1);
        let morpheme = &out.morphemes[0];
        assert_eq!(morpheme.text("ID"), Some("e1"));
        assert_eq!(morpheme.text("Name"), Some("taka"));
        assert_eq!(morpheme.text("Type"), Some("stem"));
        assert_eq!(morpheme.get("Form").unwrap().render("; "), "taka; tak");
        assert_eq!(morpheme.get("Gramm").unwrap().render("; "), "v; n");
        assert_eq!(
            morpheme.get(PARAMETER_ID).unwrap().render("; "),
            "s1; s2"
        );
        assert_eq!(
            morpheme.keys().collect::<Vec<_>>(),
            vec!["ID", "Gramm", "Type", "Form", "Name", "Parameter_ID", "gloss_en"]
        );
    }

    #[test]
    fn does_not_visit_nested_senses() {
        let out = decompose(ENTRY, &VariantIndex::default()).unwrap();
        let ids: Vec<_> = out.senses.iter().map(|s| s.text("ID").unwrap()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert_eq!(out.senses[1].text("Description"), Some("a run"));
        assert_eq!(out.senses[0].text("Entry_ID"), Some("e1"));
        assert_eq!(out.examples.len(), 1);
    }

    #[test]
    fn morphs_carry_type_and_accumulated_fields() {
        let out = decompose(ENTRY, &VariantIndex::default()).unwrap();
        assert_eq!(out.morphs.len(), 2);
        assert_eq!(out.morphs[1].text("ID"), Some("e1-1"));
        assert_eq!(out.morphs[1].text("Type"), Some("bound stem"));
        assert_eq!(
            out.morphs[0].get("gloss_en").unwrap().render("; "),
            "to run; to hurry; a run"
        );
    }

    #[test]
    fn folds_indexed_variants_into_morphs() {
        let xml = r#"<lift>
  <entry guid="e1">
    <lexical-unit><form lang="cux"><text>taka</text></form></lexical-unit>
    <trait name="morph-type" value="stem"/>
  </entry>
  <entry id="tok_e2" guid="e2">
    <lexical-unit><form lang="cux"><text>tok</text></form></lexical-unit>
    <trait name="morph-type" value="stem"/>
    <relation ref="taka_e1"><trait name="variant-type" value="Free Variant"/></relation>
  </entry>
</lift>"#;
        let lift = LiftDocument::from_string(xml);
        let doc = lift.parse().unwrap();
        let (variants, mains) =
            VariantIndex::build(Element::root(&doc).children_named("entry")).unwrap();
        assert_eq!(mains.len(), 1);

        let decomposer = EntryDecomposer::new(&variants, "; ");
        let mut out = Decomposed::default();
        decomposer.decompose(mains[0], &mut out).unwrap();
        assert_eq!(out.morphs.len(), 2);
        assert_eq!(out.morphs[1].text("ID"), Some("tok-e2"));
        assert_eq!(out.morphs[1].text("Morpheme_ID"), Some("e1"));
        assert_eq!(out.morphemes[0].get("Form").unwrap().render("; "), "taka; tok");
    }

    #[test]
    fn missing_morph_type_is_fatal() {
        let err = decompose(
            r#"<lift><entry guid="e9"><lexical-unit><form lang="x"><text>a</text></form></lexical-unit></entry></lift>"#,
            &VariantIndex::default(),
        )
        .unwrap_err();
        match err {
            ConvertError::MissingAttribute { element, entry, .. } => {
                assert_eq!(element, "entry");
                assert_eq!(entry, "e9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn variant_form_set_needs_morph_type() {
        let err = decompose(
            r#"<lift><entry guid="e9"><trait name="morph-type" value="stem"/>
               <lexical-unit><form lang="x"><text>a</text></form></lexical-unit>
               <variant><form lang="x"><text>b</text></form></variant></entry></lift>"#,
            &VariantIndex::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::MissingAttribute { ref element, .. } if element == "variant"));
    }

    #[test]
    fn entry_without_forms_is_rejected() {
        let err = decompose(
            r#"<lift><entry guid="e9"><trait name="morph-type" value="stem"/></entry></lift>"#,
            &VariantIndex::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::MissingForm { .. }));
    }
}
