//! Flatten a sense's `<example>` blocks into one record per example.

use lift_types::Record;
use tracing::warn;

use crate::document::Element;
use crate::slug::slugify;

/// Append one record per example of `sense` to `out`.
///
/// Example ids are `<entry_id>-<n>` with `n` counting from zero within the
/// sense. The `<form>` child is the example text; every other child
/// contributes a `<role>-<type>-<lang>` column from its nested form. Attributes
/// of the example element are copied as-is.
pub fn flatten_examples(sense: Element<'_, '_>, out: &mut Vec<Record>, entry_id: &str) {
    for (count, example) in sense.descendants_named("example").enumerate() {
        let mut record = Record::new();
        record.insert("ID", format!("{entry_id}-{count}"));

        for child in example.children() {
            if child.role() == "form" {
                record.insert("Form", child.text());
                continue;
            }
            match child.first_descendant("form") {
                Some(form) => match form.lang() {
                    Some(lang) => record.insert(column_name(child, lang), form.text()),
                    None => warn!(
                        "entry {entry_id} has an example <{}> form without language",
                        child.role()
                    ),
                },
                None => warn!("entry {entry_id} has empty examples"),
            }
        }

        for (name, value) in example.attrs() {
            record.insert(name, value);
        }
        out.push(record);
    }
}

fn column_name(child: Element<'_, '_>, lang: &str) -> String {
    match child.attr("type").map(slugify) {
        Some(sub_type) if !sub_type.is_empty() => {
            format!("{}-{}-{}", child.role(), sub_type, lang)
        }
        _ => format!("{}-{}", child.role(), lang),
    }
}
