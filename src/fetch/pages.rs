//! Page walking and year-scoped fetch logic

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use super::client::PageSource;
use super::error::FetchError;
use crate::record::Record;

/// Where the walk currently stands within one paginated fetch.
///
/// Each year-scoped sub-fetch starts from a fresh state rebuilt from the
/// original URL, so page position never leaks across years.
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// URL of the page to fetch next
    pub current_url: String,
    /// URL the walk started from
    pub original_url: String,
    /// Key holding the next-page URL, when link pagination is active
    pub link_field: Option<String>,
    /// 1-based page counter
    pub page: usize,
}

impl PaginationState {
    /// Start a walk at the given URL
    pub fn start(url: &str, link_field: Option<&str>) -> Self {
        Self {
            current_url: url.to_string(),
            original_url: url.to_string(),
            link_field: link_field.map(str::to_string),
            page: 1,
        }
    }

    /// Advance to the next page
    fn advance(self, next_url: String) -> Self {
        Self {
            current_url: next_url,
            page: self.page + 1,
            ..self
        }
    }
}

/// Inclusive year range for year-scoped fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// First year, inclusive
    pub start: u16,
    /// Last year, inclusive
    pub end: u16,
}

impl YearRange {
    /// The years to fetch, in descending order
    pub fn years_descending(&self) -> Vec<u16> {
        (self.start..=self.end).rev().collect()
    }

    /// Whether the range contains a year
    pub fn contains(&self, year: u16) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl FromStr for YearRange {
    type Err = FetchError;

    /// Parse `YYYY` or `YYYY-YYYY`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FetchError::InvalidYearRange(s.to_string());

        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (a, b),
            None => (s, s),
        };
        if start.len() != 4 || end.len() != 4 {
            return Err(invalid());
        }
        let start: u16 = start.parse().map_err(|_| invalid())?;
        let end: u16 = end.parse().map_err(|_| invalid())?;
        if start > end {
            return Err(invalid());
        }
        Ok(YearRange { start, end })
    }
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(19|20)\d\d").unwrap())
}

/// Find the first 4-digit year-like token (1900-2099) in a URL
pub fn embedded_year(url: &str) -> Option<u16> {
    year_regex()
        .find(url)
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract the record array under `list_field` from one page body
fn extract_records(
    body: &Value,
    list_field: &str,
    url: &str,
) -> Result<Vec<Record>, FetchError> {
    let entries = body
        .get(list_field)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::MissingListField {
            key: list_field.to_string(),
            url: url.to_string(),
        })?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let record = Record::from_json(entry).ok_or(FetchError::NonObjectRecord {
            url: url.to_string(),
            index,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Read the next-page URL from a page body.
///
/// An absent or null link field terminates the walk.
fn next_link(body: &Value, link_field: &str, url: &str) -> Result<Option<String>, FetchError> {
    match body.get(link_field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(next)) => Ok(Some(next.clone())),
        Some(_) => Err(FetchError::BadLinkField {
            key: link_field.to_string(),
            url: url.to_string(),
        }),
    }
}

/// Fetch every page reachable from `url`, in link order.
///
/// Without a link field this is a single GET. With one, each page's body
/// names the next page; records are appended page by page until the link is
/// absent or null. Any transport or parse failure aborts the whole call;
/// a silently truncated dataset is worse than no dataset.
pub fn fetch_all<S: PageSource>(
    source: &S,
    url: &str,
    list_field: &str,
    link_field: Option<&str>,
) -> Result<Vec<Record>, FetchError> {
    let mut state = PaginationState::start(url, link_field);
    let mut records = Vec::new();

    loop {
        let body = source.get_json(&state.current_url)?;
        let page_records = extract_records(&body, list_field, &state.current_url)?;
        debug!(
            page = state.page,
            records = page_records.len(),
            url = %state.current_url,
            "fetched page"
        );
        records.extend(page_records);

        let next = match &state.link_field {
            Some(key) => next_link(&body, key, &state.current_url)?,
            None => None,
        };
        match next {
            Some(next_url) => state = state.advance(next_url),
            None => break,
        }
    }

    info!(pages = state.page, records = records.len(), "fetch complete");
    Ok(records)
}

/// Fetch a full page walk for every year in the range, descending.
///
/// The URL must already embed a 4-digit year; each year's walk rebuilds its
/// page-one URL from `original_url` with only that token substituted. The
/// embedded year itself is always fetched, exactly once, even when it falls
/// outside the requested range (it anchors the current page-one URL).
pub fn fetch_year_scoped<S: PageSource>(
    source: &S,
    original_url: &str,
    range: YearRange,
    list_field: &str,
    link_field: Option<&str>,
) -> Result<Vec<(u16, Vec<Record>)>, FetchError> {
    let current_year =
        embedded_year(original_url).ok_or_else(|| FetchError::NoYearToken(original_url.to_string()))?;

    let mut years = range.years_descending();
    if !range.contains(current_year) {
        years.push(current_year);
    }
    info!(?years, "year-scoped fetch");

    let mut results = Vec::with_capacity(years.len());
    for year in years {
        let url = original_url.replacen(&current_year.to_string(), &year.to_string(), 1);
        let records = fetch_all(source, &url, list_field, link_field)?;
        info!(year, records = records.len(), "year fetched");
        results.push((year, records));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Page source serving canned bodies from a URL map
    struct FakeSource {
        pages: HashMap<String, Value>,
    }

    impl FakeSource {
        fn new(pages: Vec<(&str, Value)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(u, v)| (u.to_string(), v))
                    .collect(),
            }
        }
    }

    impl PageSource for FakeSource {
        fn get_json(&self, url: &str) -> Result<Value, FetchError> {
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_year_range_parse() {
        assert_eq!(
            "2015-2020".parse::<YearRange>().unwrap(),
            YearRange { start: 2015, end: 2020 }
        );
        assert_eq!(
            "2018".parse::<YearRange>().unwrap(),
            YearRange { start: 2018, end: 2018 }
        );
        assert!("20xx".parse::<YearRange>().is_err());
        assert!("2020-2015".parse::<YearRange>().is_err());
        assert!("15-20".parse::<YearRange>().is_err());
    }

    #[test]
    fn test_embedded_year() {
        assert_eq!(embedded_year("https://api.example.org/data?year=2018"), Some(2018));
        assert_eq!(embedded_year("https://api.example.org/1999/list"), Some(1999));
        assert_eq!(embedded_year("https://api.example.org/data"), None);
        // First token wins
        assert_eq!(embedded_year("https://x.org/2015/until/2020"), Some(2015));
    }

    #[test]
    fn test_fetch_single_page() {
        let source = FakeSource::new(vec![(
            "http://x/p1",
            serde_json::json!({"results": [{"id": 1}, {"id": 2}]}),
        )]);

        let records = fetch_all(&source, "http://x/p1", "results", None).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_fetch_follows_links_until_null() {
        let source = FakeSource::new(vec![
            (
                "http://x/p1",
                serde_json::json!({"results": [{"id": 1}], "next": "http://x/p2"}),
            ),
            (
                "http://x/p2",
                serde_json::json!({"results": [{"id": 2}], "next": "http://x/p3"}),
            ),
            (
                "http://x/p3",
                serde_json::json!({"results": [{"id": 3}], "next": null}),
            ),
        ]);

        let records = fetch_all(&source, "http://x/p1", "results", Some("next")).unwrap();
        let ids: Vec<_> = records
            .iter()
            .map(|r| r.get("id").cloned().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![
                crate::record::FieldValue::Integer(1),
                crate::record::FieldValue::Integer(2),
                crate::record::FieldValue::Integer(3),
            ]
        );
    }

    #[test]
    fn test_fetch_missing_list_field_fails() {
        let source = FakeSource::new(vec![("http://x/p1", serde_json::json!({"other": []}))]);
        let err = fetch_all(&source, "http://x/p1", "results", None).unwrap_err();
        assert!(matches!(err, FetchError::MissingListField { .. }));
    }

    #[test]
    fn test_fetch_unreachable_page_propagates() {
        let source = FakeSource::new(vec![(
            "http://x/p1",
            serde_json::json!({"results": [{"id": 1}], "next": "http://x/gone"}),
        )]);
        let err = fetch_all(&source, "http://x/p1", "results", Some("next")).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[test]
    fn test_year_scoped_descending_with_embedded_in_range() {
        let mut pages = Vec::new();
        for year in 2015..=2020 {
            pages.push((
                format!("http://x/data?year={year}"),
                serde_json::json!({"results": [{"year": year}]}),
            ));
        }
        let source = FakeSource {
            pages: pages.into_iter().collect(),
        };

        let range: YearRange = "2015-2020".parse().unwrap();
        let results =
            fetch_year_scoped(&source, "http://x/data?year=2018", range, "results", None).unwrap();

        let years: Vec<u16> = results.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![2020, 2019, 2018, 2017, 2016, 2015]);
    }

    #[test]
    fn test_year_scoped_embedded_outside_range_still_fetched() {
        let mut pages: HashMap<String, Value> = HashMap::new();
        for year in [2010u16, 2019, 2020] {
            pages.insert(
                format!("http://x/{year}/list"),
                serde_json::json!({"results": []}),
            );
        }
        let source = FakeSource { pages };

        let range: YearRange = "2019-2020".parse().unwrap();
        let results =
            fetch_year_scoped(&source, "http://x/2010/list", range, "results", None).unwrap();

        let years: Vec<u16> = results.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![2020, 2019, 2010]);
    }

    #[test]
    fn test_year_scoped_requires_token() {
        let source = FakeSource::new(vec![]);
        let range: YearRange = "2019-2020".parse().unwrap();
        let err =
            fetch_year_scoped(&source, "http://x/list", range, "results", None).unwrap_err();
        assert!(matches!(err, FetchError::NoYearToken(_)));
    }
}
