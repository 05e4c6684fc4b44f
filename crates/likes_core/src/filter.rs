use crate::{ItemLink, LinkSet};

/// Keywords excluded by default: long-form content and non-track pages.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "mix",
    "set",
    "podcast",
    "dj",
    "hour",
    "live",
    "sessions",
    "/sets/",
    "/likes/",
    "/reposts/",
    "playlist",
    "comments",
    "followers",
    "following",
    "/tags/",
];

/// Ordered, case-insensitive substring exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    keywords: Vec<String>,
}

impl FilterRules {
    /// Keywords are lowercased and trimmed; empty ones are dropped since they
    /// would match everything.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword (in rule order) contained in the lowercased link.
    pub fn first_match(&self, link: &ItemLink) -> Option<&str> {
        let lowered = link.as_str().to_lowercase();
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDE_KEYWORDS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub link: ItemLink,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    /// Surviving links, lexicographically ascending.
    pub kept: Vec<ItemLink>,
    pub excluded: Vec<Exclusion>,
}

impl FilterOutcome {
    /// Share of `total` links that survived, in percent. Zero for an empty scrape.
    pub fn kept_percent(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.kept.len() as f64 / total as f64 * 100.0
        }
    }
}

pub fn filter_links(links: &LinkSet, rules: &FilterRules) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for link in links.sorted() {
        match rules.first_match(&link) {
            Some(keyword) => outcome.excluded.push(Exclusion {
                keyword: keyword.to_string(),
                link,
            }),
            None => outcome.kept.push(link),
        }
    }
    outcome
}
