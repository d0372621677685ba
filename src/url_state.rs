//! Serialization of the filter state (plus the open recipe id) to and from
//! the query-style string kept in the URL fragment.
//!
//! Keys are `q`, `cat`, `tags` and `id`. A key is written only when it has a
//! value, so an empty state encodes to the empty string. Values use
//! `application/x-www-form-urlencoded` escaping, which is what browsers apply
//! to `URLSearchParams`.

use crate::FilterState;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SEARCH_KEY: &str = "q";
pub const CATEGORY_KEY: &str = "cat";
pub const TAGS_KEY: &str = "tags";
pub const ID_KEY: &str = "id";

const TAG_SEPARATOR: char = ',';

const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Everything the URL carries: the filter constraints and the open recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlState {
    pub filter: FilterState,
    pub id: Option<String>,
}

impl UrlState {
    pub fn new(filter: FilterState, id: Option<String>) -> Self {
        Self { filter, id }
    }

    /// Encodes the state; the result never starts with `#` or `?`.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::with_capacity(4);
        if !self.filter.search_display.is_empty() {
            pairs.push((SEARCH_KEY, self.filter.search_display.clone()));
        }
        if let Some(category) = self.filter.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push((CATEGORY_KEY, category.to_string()));
        }
        if !self.filter.tags.is_empty() {
            pairs.push((TAGS_KEY, join_tags(&self.filter.tags)));
        }
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            pairs.push((ID_KEY, id.to_string()));
        }
        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decodes a fragment or query string. Absent keys mean "no constraint";
    /// unknown keys are ignored and the first occurrence of a key wins.
    pub fn decode(input: &str) -> Self {
        let trimmed = input.strip_prefix(['#', '?']).unwrap_or(input);
        let mut search: Option<String> = None;
        let mut category: Option<String> = None;
        let mut tags: Option<String> = None;
        let mut id: Option<String> = None;

        for pair in trimmed.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(raw_key);
            let slot = match key.as_str() {
                SEARCH_KEY => &mut search,
                CATEGORY_KEY => &mut category,
                TAGS_KEY => &mut tags,
                ID_KEY => &mut id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(decode_component(raw_value));
            }
        }

        let mut filter = FilterState::new();
        filter.set_search(search.as_deref().unwrap_or_default());
        filter.category = category.filter(|c| !c.is_empty());
        filter.tags = tags.as_deref().map(split_tags).unwrap_or_default();
        Self {
            filter,
            id: id.filter(|id| !id.is_empty()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}

/// Joins tags for the `tags` value. A separator or `%` inside a tag is
/// percent-escaped so the list splits back into the same set.
pub fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter()
        .map(|tag| tag.replace('%', "%25").replace(TAG_SEPARATOR, "%2C"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`join_tags`]; empty segments are dropped.
pub fn split_tags(joined: &str) -> BTreeSet<String> {
    joined
        .split(TAG_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE)
        .to_string()
        .replace("%20", "+")
}

pub fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// What happened to the address bar after a fragment update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// The fragment already matched; nothing was touched.
    Unchanged,
    /// A new history entry was pushed and a hash change is observed.
    Pushed,
    /// The fragment was cleared in place; no history entry, no hash change.
    Replaced,
}

impl Navigation {
    pub fn fires_hash_change(self) -> bool {
        matches!(self, Navigation::Pushed)
    }
}

/// Address-bar model: the current fragment plus the history it produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    fragment: String,
    history: Vec<String>,
}

impl Location {
    pub fn new(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment).to_string();
        Self {
            history: vec![fragment.clone()],
            fragment,
        }
    }

    /// Current fragment without the leading `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn state(&self) -> UrlState {
        UrlState::decode(&self.fragment)
    }

    /// Number of history entries created since load, including the first.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Writes `state` into the fragment.
    pub fn set_state(&mut self, state: &UrlState) -> Navigation {
        self.set_fragment(state.encode())
    }

    pub fn set_fragment(&mut self, fragment: String) -> Navigation {
        if fragment == self.fragment {
            return Navigation::Unchanged;
        }
        if fragment.is_empty() {
            self.fragment.clear();
            if let Some(last) = self.history.last_mut() {
                last.clear();
            }
            return Navigation::Replaced;
        }
        self.history.push(fragment.clone());
        self.fragment = fragment;
        Navigation::Pushed
    }

    /// Externally driven change, e.g. the user editing the address or going back.
    pub fn assign(&mut self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment != self.fragment {
            self.history.push(fragment.to_string());
            self.fragment = fragment.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(search: &str, category: &str, tags: &[&str]) -> FilterState {
        FilterState::new()
            .with_search(search)
            .with_category(category)
            .with_tags(tags.iter().copied())
    }

    #[test]
    fn empty_state_encodes_to_empty_string() {
        assert_eq!(UrlState::default().encode(), "");
        assert_eq!(UrlState::decode(""), UrlState::default());
    }

    #[test]
    fn encodes_only_present_keys() {
        let url = UrlState::new(state("", "Efterrätt", &[]), None);
        assert_eq!(url.encode(), "cat=Efterr%C3%A4tt");
        let url = UrlState::new(state("panna kaka", "", &["snabb", "söt"]), Some("a".into()));
        assert_eq!(url.encode(), "q=panna+kaka&tags=snabb%2Cs%C3%B6t&id=a");
    }

    #[test]
    fn round_trip_preserves_state() {
        let cases = [
            state("Pannkakor", "Efterrätt", &["söt", "snabb"]),
            state("a+b & c=d", "", &[]),
            state("", "Förrätt & smått", &["100%", "#vego"]),
            state("  mixed Case  ", "", &["x"]),
            state("", "", &["salt, peppar", "söt", "50%2C"]),
        ];
        for filter in cases {
            let decoded = UrlState::decode(&UrlState::new(filter.clone(), None).encode());
            assert_eq!(decoded.filter.search_text, filter.search_text);
            assert_eq!(decoded.filter.search_display, filter.search_display);
            assert_eq!(decoded.filter.category, filter.category);
            assert_eq!(decoded.filter.tags, filter.tags);
        }
    }

    #[test]
    fn tag_order_does_not_matter() {
        let a = UrlState::decode("tags=söt,snabb");
        let b = UrlState::decode("tags=snabb,s%C3%B6t");
        assert_eq!(a.filter.tags, b.filter.tags);
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn separator_inside_tag_is_escaped() {
        let url = UrlState::new(state("", "", &["salt, peppar"]), None);
        assert_eq!(url.encode(), "tags=salt%252C+peppar");
        let decoded = UrlState::decode(&url.encode());
        assert_eq!(decoded.filter.tags.len(), 1);
        assert!(decoded.filter.tags.contains("salt, peppar"));
        assert_eq!(split_tags("100%,a"), BTreeSet::from(["100%".to_string(), "a".to_string()]));
    }

    #[test]
    fn decode_accepts_prefixes_and_ignores_noise() {
        let decoded = UrlState::decode("#q=+Soppa+&foo=bar&tags=a,,b&cat=&id=");
        assert_eq!(decoded.filter.search_display, "Soppa");
        assert_eq!(decoded.filter.search_text, "soppa");
        assert_eq!(decoded.filter.category, None);
        assert_eq!(decoded.filter.tags.len(), 2);
        assert_eq!(decoded.id, None);
        assert_eq!(UrlState::decode("?id=x").id.as_deref(), Some("x"));
    }

    #[test]
    fn first_occurrence_wins() {
        let decoded = UrlState::decode("cat=A&cat=B");
        assert_eq!(decoded.filter.category.as_deref(), Some("A"));
    }

    #[test]
    fn location_skips_identical_fragment() {
        let mut location = Location::new("#q=soppa");
        let same = UrlState::decode("q=soppa");
        assert_eq!(location.set_state(&same), Navigation::Unchanged);
        assert_eq!(location.history_len(), 1);
    }

    #[test]
    fn location_pushes_and_replaces() {
        let mut location = Location::new("");
        let with_id = UrlState::default().with_id("a");
        assert_eq!(location.set_state(&with_id), Navigation::Pushed);
        assert_eq!(location.fragment(), "id=a");
        assert_eq!(location.history_len(), 2);

        assert_eq!(location.set_state(&UrlState::default()), Navigation::Replaced);
        assert_eq!(location.fragment(), "");
        assert_eq!(location.history_len(), 2);
        assert!(!Navigation::Replaced.fires_hash_change());
    }
}
