use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized absolute URL identifying one likable item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemLink(String);

impl ItemLink {
    /// Normalizes a raw href: trims surrounding whitespace and drops any fragment.
    /// Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let without_fragment = match trimmed.find('#') {
            Some(pos) => &trimmed[..pos],
            None => trimmed,
        };
        if without_fragment.is_empty() {
            return None;
        }
        Some(Self(without_fragment.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated collection of links produced by one scrape.
///
/// Backed by an ordered set so iteration is reproducible, but callers that need
/// an order (persistence, filtering) ask for it explicitly via [`LinkSet::sorted`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkSet {
    links: BTreeSet<ItemLink>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the link was not already present.
    pub fn insert(&mut self, link: ItemLink) -> bool {
        self.links.insert(link)
    }

    pub fn contains(&self, link: &ItemLink) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemLink> {
        self.links.iter()
    }

    /// Lexicographically ascending copy of the links.
    pub fn sorted(&self) -> Vec<ItemLink> {
        self.links.iter().cloned().collect()
    }
}

impl FromIterator<ItemLink> for LinkSet {
    fn from_iter<T: IntoIterator<Item = ItemLink>>(iter: T) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a ItemLink;
    type IntoIter = std::collections::btree_set::Iter<'a, ItemLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

/// Describes the target site: how to recognize item links while scraping and
/// which URLs may be handed to the downloader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Substring every scraped item href must contain.
    pub domain_marker: String,
    /// First path segment of the viewer's own pages (e.g. `/you/library`).
    pub self_token: String,
    pub canonical_scheme: String,
    pub canonical_host: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            domain_marker: "soundcloud.com".to_string(),
            self_token: "you".to_string(),
            canonical_scheme: "https".to_string(),
            canonical_host: "soundcloud.com".to_string(),
        }
    }
}

impl SiteProfile {
    /// Dispatch-time acceptance check: `{scheme}://{host}/` followed by a
    /// non-empty path, no whitespace anywhere, and a parseable URL.
    pub fn is_dispatchable(&self, link: &ItemLink) -> bool {
        let raw = link.as_str();
        if raw.chars().any(char::is_whitespace) {
            return false;
        }
        let prefix = format!("{}://{}/", self.canonical_scheme, self.canonical_host);
        let Some(rest) = raw.strip_prefix(prefix.as_str()) else {
            return false;
        };
        if rest.is_empty() {
            return false;
        }
        url::Url::parse(raw).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(raw: &str) -> ItemLink {
        ItemLink::normalize(raw).unwrap()
    }

    #[test]
    fn normalize_trims_and_drops_fragment() {
        assert_eq!(
            link("  https://soundcloud.com/a/b#comments \n").as_str(),
            "https://soundcloud.com/a/b"
        );
        assert!(ItemLink::normalize("   ").is_none());
        assert!(ItemLink::normalize("#top").is_none());
    }

    #[test]
    fn dispatchable_requires_canonical_prefix_and_path() {
        let site = SiteProfile::default();
        assert!(site.is_dispatchable(&link("https://soundcloud.com/artist/track")));
        assert!(!site.is_dispatchable(&link("https://soundcloud.com/")));
        assert!(!site.is_dispatchable(&link("http://soundcloud.com/artist/track")));
        assert!(!site.is_dispatchable(&link("https://evil.com/soundcloud.com/a/b")));
        assert!(!site.is_dispatchable(&link("https://soundcloud.com.evil.com/a/b")));
        assert!(!site.is_dispatchable(&link("https://soundcloud.com/artist/my track")));
    }

    #[test]
    fn link_set_deduplicates() {
        let set: LinkSet = ["https://x/b", "https://x/a", "https://x/b"]
            .into_iter()
            .map(link)
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.sorted(),
            vec![link("https://x/a"), link("https://x/b")]
        );
    }
}
