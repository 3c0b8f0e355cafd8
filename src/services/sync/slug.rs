//! Slug resolution for incoming event references.
//!
//! The slug is the only identity the sync engine knows: two references that
//! resolve to the same slug are the same event.

use regex::Regex;

lazy_static::lazy_static! {
    static ref CONF42_SHORT_URL: Regex = Regex::new(r"^([a-zA-Z]+)(\d{4})$").unwrap();
}

/// Path segment that marks a link into the platform's own CFP pages.
const CFP_LINK_MARKER: &str = "/e/";

/// Source prefix derived from the first label of a base URL's host.
///
/// `https://sreday.com` -> `sreday`. Returns an empty string for unparseable URLs.
pub fn site_prefix(base_url: &str) -> String {
    url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .and_then(|host| {
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            host.split('.').next().map(|s| s.to_lowercase())
        })
        .unwrap_or_default()
}

/// Build a slug from a source prefix and a reference path.
///
/// A leading `./` and trailing `/` are stripped; an empty prefix yields the bare path.
/// Absolute URLs contribute their path segments joined with `-`. A reference
/// with no usable path yields an empty slug, never a bare `"{prefix}-"`.
pub fn make_slug(prefix: &str, path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = match url::Url::parse(trimmed) {
        Ok(url) => url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .unwrap_or_default(),
        Err(_) => {
            let relative = trimmed.strip_prefix("./").unwrap_or(trimmed);
            relative
                .trim_start_matches('/')
                .trim_end_matches('/')
                .to_string()
        }
    };

    if trimmed.is_empty() {
        String::new()
    } else if prefix.is_empty() {
        trimmed
    } else {
        format!("{}-{}", prefix, trimmed)
    }
}

/// Extract a pre-claimed slug from a link to the platform's `/e/{slug}` page.
pub fn slug_from_cfp_link(link: &str) -> Option<String> {
    let idx = link.rfind(CFP_LINK_MARKER)?;
    let rest = &link[idx + CFP_LINK_MARKER.len()..];
    let slug = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if slug.is_empty() || slug.contains('/') {
        return None;
    }
    Some(slug.to_string())
}

/// Resolve the slug of a family-catalog reference. A CFP link-back wins over the path.
pub fn resolve_slug(prefix: &str, path: &str, cfp_link: Option<&str>) -> String {
    cfp_link
        .and_then(slug_from_cfp_link)
        .unwrap_or_else(|| make_slug(prefix, path))
}

/// Split a conf42 short identifier such as `golang2026` into `("golang", 2026)`.
pub fn parse_conf42_short_url(short_url: &str) -> Option<(String, i32)> {
    let caps = CONF42_SHORT_URL.captures(short_url.trim())?;
    let topic = caps.get(1)?.as_str().to_lowercase();
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((topic, year))
}

/// Slug of a conf42 entry, or an empty string when the identifier has the wrong shape.
pub fn conf42_slug(short_url: &str) -> String {
    match parse_conf42_short_url(short_url) {
        Some((topic, year)) => format!("conf42-{}-{}", topic, year),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_slug_trims_path() {
        assert_eq!(make_slug("sreday", "./2026-london-q1/"), "sreday-2026-london-q1");
        assert_eq!(make_slug("", "2026-london"), "2026-london");
        assert_eq!(make_slug("llmday", "/2026-paris/"), "llmday-2026-paris");
    }

    #[test]
    fn make_slug_without_path_is_empty() {
        assert_eq!(make_slug("sreday", ""), "");
        assert_eq!(make_slug("sreday", "   "), "");
        assert_eq!(make_slug("sreday", "./"), "");
        assert_eq!(make_slug("", "/"), "");
        assert_eq!(resolve_slug("sreday", " ", None), "");
    }

    #[test]
    fn absolute_urls_use_their_path() {
        assert_eq!(
            make_slug("sreday", "https://meetup.com/sre-london/"),
            "sreday-sre-london"
        );
        assert_eq!(
            make_slug("sreday", "https://meetup.com/groups/sre-london/2026"),
            "sreday-groups-sre-london-2026"
        );
        assert_eq!(make_slug("sreday", "https://meetup.com/"), "");
    }

    #[test]
    fn site_prefix_from_host() {
        assert_eq!(site_prefix("https://sreday.com"), "sreday");
        assert_eq!(site_prefix("https://www.conf42.com/"), "conf42");
        assert_eq!(site_prefix("not a url"), "");
    }

    #[test]
    fn cfp_link_extraction() {
        assert_eq!(
            slug_from_cfp_link("https://cfp.example.com/e/sreday-2026-london/"),
            Some("sreday-2026-london".to_string())
        );
        assert_eq!(
            slug_from_cfp_link("https://cfp.example.com/e/abc?ref=x"),
            Some("abc".to_string())
        );
        assert_eq!(slug_from_cfp_link("https://cfp.example.com/e/"), None);
        assert_eq!(slug_from_cfp_link("https://sessionize.com/sreday"), None);
    }

    #[test]
    fn cfp_link_wins_over_path() {
        let link = Some("https://cfp.example.com/e/claimed-slug");
        assert_eq!(resolve_slug("sreday", "./2026-london/", link), "claimed-slug");
        assert_eq!(
            resolve_slug("sreday", "./2026-london/", link),
            resolve_slug("sreday", "./2026-london/", link)
        );
        assert_eq!(resolve_slug("sreday", "./2026-london/", None), "sreday-2026-london");
        assert_eq!(
            resolve_slug("sreday", "./2026-london/", Some("https://elsewhere.org/cfp")),
            "sreday-2026-london"
        );
    }

    #[test]
    fn conf42_slug_shapes() {
        assert_eq!(conf42_slug("golang2026"), "conf42-golang-2026");
        assert_eq!(conf42_slug("GoLang2026"), "conf42-golang-2026");
        assert_eq!(conf42_slug("golang-2026"), "");
        assert_eq!(conf42_slug("2026"), "");
        assert_eq!(conf42_slug("golang26"), "");
    }
}
