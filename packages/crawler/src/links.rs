//! Same-domain link filtering.

use std::collections::HashSet;

use url::Url;

/// Hosts containing any of these substrings are never crawled.
const SOCIAL_DOMAINS: [&str; 10] = [
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "t.me",
    "wa.me",
    "pinterest.com",
    "reddit.com",
    "discord.com",
];

/// Filter raw hrefs down to deduplicated, same-host, non-social absolute URLs.
///
/// Hrefs may be relative; they are resolved against `base`. Hrefs that fail
/// to resolve are skipped. Output order is not guaranteed.
pub fn filter_links(base: &Url, hrefs: &[String]) -> Vec<String> {
    let base_host = base.host_str().unwrap_or("");

    let filtered: HashSet<String> = hrefs
        .iter()
        .filter_map(|href| base.join(href).ok())
        .filter(|resolved| {
            let host = resolved.host_str().unwrap_or("");
            if SOCIAL_DOMAINS.iter().any(|domain| host.contains(domain)) {
                return false;
            }
            host == base_host
        })
        .map(|resolved| resolved.to_string())
        .collect();

    filtered.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/about").unwrap()
    }

    #[test]
    fn keeps_only_same_host_links() {
        let hrefs = vec![
            "https://example.com/pricing".to_string(),
            "https://other.org/page".to_string(),
            "/contact".to_string(),
        ];

        let links = filter_links(&base(), &hrefs);

        assert_eq!(links.len(), 2);
        for link in &links {
            assert_eq!(Url::parse(link).unwrap().host_str(), Some("example.com"));
        }
    }

    #[test]
    fn drops_social_media_hosts() {
        let hrefs = vec![
            "https://www.facebook.com/example".to_string(),
            "https://twitter.com/example".to_string(),
            "https://t.me/example".to_string(),
            "https://example.com/team".to_string(),
        ];

        let links = filter_links(&base(), &hrefs);

        assert_eq!(links, vec!["https://example.com/team".to_string()]);
    }

    #[test]
    fn deduplicates_resolved_urls() {
        let hrefs = vec![
            "/contact".to_string(),
            "https://example.com/contact".to_string(),
            "/contact".to_string(),
        ];

        let links = filter_links(&base(), &hrefs);

        assert_eq!(links, vec!["https://example.com/contact".to_string()]);
    }

    #[test]
    fn malformed_hrefs_do_not_poison_the_batch() {
        let hrefs = vec![
            "http://[invalid".to_string(),
            "https://example.com/ok".to_string(),
        ];

        let links = filter_links(&base(), &hrefs);

        assert_eq!(links, vec!["https://example.com/ok".to_string()]);
    }

    #[test]
    fn resolves_relative_hrefs_against_base() {
        let hrefs = vec!["team".to_string()];

        let links = filter_links(&base(), &hrefs);

        assert_eq!(links, vec!["https://example.com/team".to_string()]);
    }
}
