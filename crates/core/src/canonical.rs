//! Whitespace normalization for IDL declaration text.
//!
//! Every line is run through [`canonicalize`] before the grammar looks at
//! it, so type names such as `const char *` and `const char*` compare equal
//! and the declarator splitters never see irregular spacing.

/// Rewrites applied until the text stops changing.
const REWRITES: &[(&str, &str)] = &[
    (" *", "*"),
    ("* ", "*"),
    (" ,", ","),
    (", ", ","),
    ("  ", " "),
    ("\t", " "),
];

/// Normalize `text` to its canonical spelling.
///
/// Applies [`REWRITES`] to a fixed point, then trims surrounding
/// whitespace. The result is idempotent: canonicalizing it again yields the
/// same string.
pub fn canonicalize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        for (from, to) in REWRITES {
            next = next.replace(from, to);
        }
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}
