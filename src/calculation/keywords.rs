//! Case-insensitive keyword matching over free text.

/// True when `text` contains any non-empty keyword, ignoring case.
pub(crate) fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let haystack = text.to_uppercase();
    keywords.iter().any(|k| {
        let needle = k.as_ref().trim().to_uppercase();
        !needle.is_empty() && haystack.contains(&needle)
    })
}

/// True when `text` contains `token` as a whole word, ignoring case.
///
/// Words are split on anything that is not a letter or digit, so `LPI+CTE`
/// holds both `LPI` and `CTE`, while `NOT` does not hold `OT`.
pub(crate) fn has_token(text: &str, token: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case(token))
}
