/// Split a comma-separated category field into trimmed, non-empty tokens.
///
/// Order is preserved and duplicates are kept, since the author typed them.
///
/// # Examples
///
/// ```
/// use calendrift_util::strings::split_categories;
///
/// assert_eq!(split_categories(" food, travel ,,"), vec!["food", "travel"]);
/// assert!(split_categories("  ").is_empty());
/// ```
pub fn split_categories(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
