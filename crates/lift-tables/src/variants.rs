//! Pre-pass over all entries: entries that are variants of another entry are
//! taken out of the main iteration and indexed under the main entry's identity.

use std::collections::{HashMap, HashSet};

use lift_types::VariantDescriptor;
use tracing::{debug, info, warn};

use crate::document::Element;
use crate::entry::{MORPH_TYPE, entry_identity};
use crate::error::{ConvertError, Result};
use crate::slug::slugify;

const VARIANT_TYPE: &str = "variant-type";

/// Variant descriptors keyed by the identity of the entry they belong to.
///
/// Built once per conversion and read-only afterwards.
#[derive(Debug, Default)]
pub struct VariantIndex {
    by_main: HashMap<String, Vec<VariantDescriptor>>,
}

impl VariantIndex {
    /// Index variant entries and return the remaining main entries in
    /// document order.
    pub fn build<'a, 'input: 'a>(
        entries: impl IntoIterator<Item = Element<'a, 'input>>,
    ) -> Result<(Self, Vec<Element<'a, 'input>>)> {
        let mut index = VariantIndex::default();
        let mut mains = Vec::new();

        for entry in entries {
            let refs = main_references(entry);
            if refs.is_empty() {
                mains.push(entry);
                continue;
            }
            let descriptor = describe_variant(entry)?;
            for main_id in refs {
                debug!("variant {} filed under entry {}", descriptor.id, main_id);
                index
                    .by_main
                    .entry(main_id.to_string())
                    .or_default()
                    .push(descriptor.clone());
            }
        }

        let known: HashSet<&str> = mains.iter().filter_map(|e| entry_identity(*e).ok()).collect();
        for (main_id, variant) in index.unresolved(&known) {
            warn!(
                "variant {} ({}) refers to unknown entry {}; it will not appear in the output",
                variant.id, variant.form, main_id
            );
        }
        info!(
            "indexed {} variants under {} entries, {} main entries remain",
            index.len(),
            index.by_main.len(),
            mains.len()
        );

        Ok((index, mains))
    }

    /// Descriptors filed under `main_id`, in document order.
    pub fn variants_of(&self, main_id: &str) -> &[VariantDescriptor] {
        self.by_main
            .get(main_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Descriptors whose main entry is not among `known` identities.
    pub fn unresolved<'s>(
        &'s self,
        known: &'s HashSet<&str>,
    ) -> impl Iterator<Item = (&'s str, &'s VariantDescriptor)> {
        let mut keys: Vec<&String> = self
            .by_main
            .keys()
            .filter(|k| !known.contains(k.as_str()))
            .collect();
        keys.sort();
        keys.into_iter().flat_map(move |k| {
            self.by_main[k]
                .iter()
                .map(move |variant| (k.as_str(), variant))
        })
    }

    /// Total number of descriptors.
    pub fn len(&self) -> usize {
        self.by_main.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_main.is_empty()
    }
}

/// Main-entry identities referenced by this entry's variant relations.
///
/// References look like `<headword>_<guid>`; the identity is the part after
/// the last underscore. Each identity is listed once, in first-seen order.
fn main_references<'a>(entry: Element<'a, '_>) -> Vec<&'a str> {
    let mut refs = Vec::new();
    for main_id in entry
        .descendants_named("relation")
        .filter(|rel| rel.has_trait(VARIANT_TYPE))
        .filter_map(|rel| rel.attr("ref"))
        .filter(|r| !r.is_empty())
        .map(|r| r.rsplit('_').next().unwrap_or(r))
    {
        if !refs.contains(&main_id) {
            refs.push(main_id);
        }
    }
    refs
}

fn describe_variant(entry: Element<'_, '_>) -> Result<VariantDescriptor> {
    let identity = entry_identity(entry)?;
    let id = slugify(entry.attr("id").unwrap_or(identity));
    let form = entry
        .first_descendant("form")
        .map(|f| f.text())
        .ok_or_else(|| ConvertError::MissingForm {
            entry: identity.to_string(),
        })?;
    let morph_type = entry
        .trait_value(MORPH_TYPE)
        .ok_or_else(|| ConvertError::missing("entry", "morph-type trait", identity))?;
    Ok(VariantDescriptor {
        id,
        form,
        morph_type: morph_type.to_string(),
    })
}
