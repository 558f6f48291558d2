//! Turns raw catalog names into filesystem-safe, dash-separated tokens and
//! assigns each item its download URL.

use regex::Regex;
use std::sync::LazyLock;

use super::{CatalogClient, VodItem};

/// Punctuation removed from names before dash-separation. The HTML entity
/// form of `&` shows up verbatim in some provider catalogs, so it is
/// dropped as a whole token before the single characters.
const STRIPPED_SYMBOLS: &[char] = &[
    '&', ':', ';', ',', '_', '|', '!', '?', '(', ')', '[', ']', '{', '}', '<', '>', '*', '^', '$',
    '#', '@', '+', '=', '~', '`', '%', '"', '\'', '\\', '/', '.',
];

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Sanitize a display name into a filesystem-safe token.
///
/// Strips the literal `prefix_filter` from the front of the name, removes
/// the fixed punctuation set, collapses whitespace runs into single dashes
/// and drops any dashes left at the start.
pub fn sanitize_name(raw: &str, prefix_filter: &str) -> String {
    let mut name = raw.to_string();

    if !prefix_filter.is_empty() {
        if let Some(stripped) = name.strip_prefix(prefix_filter) {
            name = stripped.to_string();
        }
    }
    let mut name = name.trim().to_string();

    name = name.replace("&amp;", "");
    name.retain(|c| !STRIPPED_SYMBOLS.contains(&c));

    let name = WHITESPACE_RUNS.replace_all(&name, "-");
    name.trim_start_matches('-').to_string()
}

/// Assign download URLs and sanitized names to every item, in place.
pub fn normalize(items: &mut [VodItem], client: &CatalogClient, prefix_filter: &str) {
    for item in items.iter_mut() {
        item.download_url = Some(client.download_url(item));
        item.name = sanitize_name(&item.name, prefix_filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_sanitize_removes_symbols() {
        assert_eq!(
            sanitize_name("Movie & Name: With; Symbols,", ""),
            "Movie-Name-With-Symbols"
        );
    }

    #[test]
    fn test_sanitize_strips_prefix() {
        assert_eq!(
            sanitize_name("FilterPrefix Movie Name", "FilterPrefix"),
            "Movie-Name"
        );
    }

    #[test]
    fn test_sanitize_prefix_only_matches_start() {
        assert_eq!(
            sanitize_name("Movie FilterPrefix Name", "FilterPrefix"),
            "Movie-FilterPrefix-Name"
        );
    }

    #[test]
    fn test_sanitize_html_entity_ampersand() {
        assert_eq!(sanitize_name("Salt &amp; Pepper", ""), "Salt-Pepper");
    }

    #[test]
    fn test_sanitize_strips_leading_dashes() {
        assert_eq!(sanitize_name("- Movie", ""), "Movie");
        assert_eq!(sanitize_name(": Movie", ""), "Movie");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_name("Movie   Name\t Two", ""), "Movie-Name-Two");
    }

    #[test]
    fn test_normalize_assigns_urls_and_names() {
        let client = CatalogClient::new(&ProviderConfig {
            base_url: "http://provider.example.com".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
        })
        .unwrap();

        let mut items = vec![VodItem {
            name: "VOD: Some Movie".to_string(),
            stream_id: 9,
            container_extension: "mp4".to_string(),
            download_url: None,
        }];

        normalize(&mut items, &client, "VOD:");

        assert_eq!(items[0].name, "Some-Movie");
        assert_eq!(
            items[0].download_url.as_deref(),
            Some("http://provider.example.com/movie/user/secret/9.mp4")
        );
    }
}
