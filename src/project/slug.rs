/// Slug derivation for project URLs

use unicode_normalization::UnicodeNormalization;

/// Maximum slug length stored for a project
pub const MAX_SLUG_LEN: usize = 50;

/// Slugs that would shadow fixed routes
pub const RESERVED_SLUGS: &[&str] = &["add", "healthz", "static"];

/// Convert a project name into a URL slug.
///
/// Decomposes with NFKD and keeps only the ASCII part (so "Ōsaka" becomes "osaka"
/// and the "ﬁ" ligature becomes "fi"), drops anything that is not a letter, digit,
/// underscore, hyphen or whitespace, collapses whitespace/hyphen runs into a single
/// `-` and trims separators from both ends. May return an empty string.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
    }
    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// True when `candidate` matches the URL slug converter: `[-a-zA-Z0-9_]+`
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}
