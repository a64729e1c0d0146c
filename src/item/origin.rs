use url::Url;

/// Rewrites a root-relative URL against the site origin
///
/// Only values starting with `/` are rewritten; anything else is returned
/// unchanged. Protocol-relative values (`//cdn.example/x.jpg`) take the
/// origin's scheme.
///
/// ```
/// use reel_harvest::item::absolutize;
/// use url::Url;
///
/// let base = Url::parse("https://vegavinc.com").unwrap();
/// assert_eq!(absolutize("/img/a.jpg", &base), "https://vegavinc.com/img/a.jpg");
/// ```
pub fn absolutize(src: &str, base: &Url) -> String {
    let src = src.trim();

    if !src.starts_with('/') {
        return src.to_string();
    }

    match base.join(src) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), src),
    }
}
