//! `Link` response header parsing.

/// The `rel="next"` target of a `Link` header, if any.
///
/// ```text
/// <https://api.github.com/search/repositories?q=x&page=2>; rel="next",
/// <https://api.github.com/search/repositories?q=x&page=5>; rel="last"
/// ```
pub fn next_page_link(header: &str) -> Option<&str> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target.strip_prefix('<')?.strip_suffix('>')
    })
}
