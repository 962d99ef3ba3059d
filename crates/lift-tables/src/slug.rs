use deunicode::deunicode;

/// Transliterate `text` to ASCII, lowercase it and collapse every run of
/// non-alphanumeric characters into a single `-`, trimming dashes at both
/// ends.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for ch in ascii.chars().map(|c| c.to_ascii_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("Free Translation"), "free-translation");
        assert_eq!(slugify("  lit. -- gloss "), "lit-gloss");
        assert_eq!(slugify("taka_6a0c5a3e"), "taka-6a0c5a3e");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn transliterates_accented_letters() {
        assert_eq!(slugify("Tradução livre"), "traducao-livre");
        assert_eq!(slugify("niño_ÆB1"), "nino-aeb1");
    }
}
