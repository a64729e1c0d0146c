/// Derives the store key for a title
///
/// Lowercases ASCII letters, collapses every run of characters outside
/// `[a-z0-9]` into one `-` and drops separators at either end. The result
/// may be empty.
///
/// # Examples
///
/// ```
/// use reel_harvest::slugify;
///
/// assert_eq!(slugify("The Matrix: Reloaded!"), "the-matrix-reloaded");
/// assert_eq!(slugify("  --  "), "");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
