//! Morph records from a form set (`<lexical-unit>` or `<variant>`).

use lift_types::Record;

use crate::document::Element;
use crate::meaning::Fields;

/// Emit one morph per `<form>` of `form_set`, numbering from `counter`.
///
/// The counter is shared by every form set of an entry so morph ids stay
/// unique within it; the next free value is returned.
pub fn extract_forms(
    form_set: Element<'_, '_>,
    entry_id: &str,
    morph_type: &str,
    fields: &Fields,
    morphs: &mut Vec<Record>,
    mut counter: usize,
) -> usize {
    for form in form_set.children_named("form") {
        let mut morph = Record::new();
        morph.insert("ID", format!("{entry_id}-{counter}"));
        morph.insert("Form", form.text());
        morph.insert("Type", morph_type);
        morph.insert("Morpheme_ID", entry_id);
        fields.apply_to(&mut morph);
        morphs.push(morph);
        counter += 1;
    }
    counter
}
