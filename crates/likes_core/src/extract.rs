use crate::{ItemLink, LinkSet, SiteProfile};

/// Minimum number of `/`-separated pieces in an item href:
/// `https:` / `` / host / user / item.
const MIN_SEGMENTS: usize = 5;
/// Index of the account segment (the one right after the host).
const ACCOUNT_SEGMENT: usize = 3;

/// Builds the candidate item set from the hrefs of a fully-loaded page.
///
/// Missing or empty hrefs are skipped silently, as are hrefs outside the
/// site, account/profile roots and the viewer's own pages.
pub fn extract_links<'a, I>(hrefs: I, site: &SiteProfile) -> LinkSet
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    hrefs
        .into_iter()
        .flatten()
        .filter_map(ItemLink::normalize)
        .filter(|link| is_item_link(link, site))
        .collect()
}

pub(crate) fn is_item_link(link: &ItemLink, site: &SiteProfile) -> bool {
    let raw = link.as_str();
    if !raw.contains(&site.domain_marker) {
        return false;
    }
    let segments: Vec<&str> = raw.split('/').collect();
    segments.len() >= MIN_SEGMENTS && segments[ACCOUNT_SEGMENT] != site.self_token
}
