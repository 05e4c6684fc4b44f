use likes_core::{extract_links, filter_links, FilterRules, ItemLink, LinkSet, SiteProfile};
use pretty_assertions::assert_eq;

fn link(raw: &str) -> ItemLink {
    ItemLink::normalize(raw).expect("non-empty link")
}

fn scraped_hrefs() -> Vec<Option<&'static str>> {
    vec![
        Some("https://soundcloud.com/artist-one/track-a"),
        Some("https://soundcloud.com/artist-one/DEEP-House-MIX-2020"),
        Some("https://soundcloud.com/artist-two/sets/summer"),
        Some("https://soundcloud.com/artist-two/track-b"),
        Some("https://soundcloud.com/artist-two/track-b"),
        Some("https://soundcloud.com/artist-two"),
        Some("https://soundcloud.com/you/likes"),
        Some("https://soundcloud.com/artist-three/podcast-episode-4"),
        Some("https://soundcloud.com/artist-three/followers"),
        Some("https://soundcloud.com/pages/cookies"),
        Some("https://twitter.com/artist/status/1"),
        Some("/relative/path/only"),
        None,
    ]
}

#[test]
fn extracted_links_never_include_roots_or_self_pages() {
    let site = SiteProfile::default();
    let links = extract_links(scraped_hrefs(), &site);

    for link in links.iter() {
        let segments: Vec<&str> = link.as_str().split('/').collect();
        assert!(segments.len() >= 5, "{link} is too shallow");
        assert_ne!(segments[3], site.self_token);
        assert!(link.as_str().contains(&site.domain_marker));
    }
    assert_eq!(links.len(), 7);
}

#[test]
fn exclusion_scenario_keeps_only_plain_track() {
    let links: LinkSet = [
        "https://soundcloud.com/artist/likes/x",
        "https://soundcloud.com/artist/track-a",
        "https://soundcloud.com/artist/track-b-mix",
    ]
    .into_iter()
    .map(link)
    .collect();
    let rules = FilterRules::new(["mix", "likes"]);

    let outcome = filter_links(&links, &rules);

    assert_eq!(outcome.kept, vec![link("https://soundcloud.com/artist/track-a")]);
    assert_eq!(outcome.excluded.len(), 2);
    let mix = outcome
        .excluded
        .iter()
        .find(|e| e.link.as_str().ends_with("track-b-mix"))
        .expect("mix exclusion");
    assert_eq!(mix.keyword, "mix");
}

#[test]
fn filter_is_case_insensitive_and_respects_rule_order() {
    let links: LinkSet = [link("https://soundcloud.com/a/Live-DJ-Set")].into_iter().collect();
    let rules = FilterRules::new(["  DJ ", "live", ""]);

    assert_eq!(rules.keywords(), &["dj".to_string(), "live".to_string()]);
    let outcome = filter_links(&links, &rules);
    assert!(outcome.kept.is_empty());
    assert_eq!(outcome.excluded[0].keyword, "dj");
}

#[test]
fn filter_output_is_sorted_bounded_and_clean() {
    let site = SiteProfile::default();
    let links = extract_links(scraped_hrefs(), &site);
    let rules = FilterRules::default();

    let outcome = filter_links(&links, &rules);

    assert!(outcome.kept.len() <= links.len());
    assert_eq!(outcome.kept.len() + outcome.excluded.len(), links.len());
    let mut sorted = outcome.kept.clone();
    sorted.sort();
    assert_eq!(outcome.kept, sorted);
    for kept in &outcome.kept {
        let lowered = kept.as_str().to_lowercase();
        for keyword in rules.keywords() {
            assert!(!lowered.contains(keyword.as_str()), "{kept} contains {keyword}");
        }
    }
    assert_eq!(
        outcome.kept,
        vec![
            link("https://soundcloud.com/artist-one/track-a"),
            link("https://soundcloud.com/artist-two/track-b"),
            link("https://soundcloud.com/pages/cookies"),
        ]
    );
}

#[test]
fn filter_is_idempotent_and_deterministic() {
    let site = SiteProfile::default();
    let rules = FilterRules::default();
    let links = extract_links(scraped_hrefs(), &site);

    let first = filter_links(&links, &rules);
    let again = filter_links(&first.kept.iter().cloned().collect(), &rules);
    assert_eq!(again.kept, first.kept);
    assert!(again.excluded.is_empty());

    let mut reversed = scraped_hrefs();
    reversed.reverse();
    let second = filter_links(&extract_links(reversed, &site), &rules);
    let render = |links: &[ItemLink]| {
        links
            .iter()
            .map(ItemLink::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(render(&first.kept), render(&second.kept));
}

#[test]
fn kept_percent_handles_empty_scrape() {
    let outcome = filter_links(&LinkSet::new(), &FilterRules::default());
    assert_eq!(outcome.kept_percent(0), 0.0);
}
