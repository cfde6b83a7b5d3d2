//! # Query Engine
//!
//! Turns a record collection plus a [`Query`] into the projection shown to
//! the user. The pipeline always runs in the same order:
//!
//! 1. **Filter** by category ([`CategoryFilter`]).
//! 2. **Sort** by a [`SortKey`]. Sorting is stable, so records that compare
//!    equal keep their stored order.
//! 3. **Search & highlight**: keep records whose searchable fields match the
//!    pattern and split those fields into [`MatchSegment`]s.
//!
//! Queries are pure: nothing is cached between calls and the input records
//! are never modified.
//!
//! ## Search Patterns
//!
//! Patterns are case-insensitive regular expressions. An empty pattern
//! matches everything. A pattern that fails to compile matches nothing:
//! a typo in the search box empties the table rather than showing
//! everything or failing the render.

use crate::error::Result;
use crate::model::Record;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sentinel accepted by [`CategoryFilter::parse`] to disable filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Record fields the search pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Description,
    Category,
}

impl SearchField {
    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            SearchField::Description => &record.description,
            SearchField::Category => &record.category,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchField::Description => "description",
            SearchField::Category => "category",
        }
    }
}

pub fn default_search_fields() -> Vec<SearchField> {
    vec![SearchField::Description, SearchField::Category]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    DescriptionAsc,
    DescriptionDesc,
    CategoryAsc,
    /// Keep stored order. Unknown sort names map here.
    Unsorted,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::AmountDesc,
        SortKey::AmountAsc,
        SortKey::DescriptionAsc,
        SortKey::DescriptionDesc,
        SortKey::CategoryAsc,
    ];

    /// Parses a sort name such as `amount-desc`. Unknown names yield
    /// [`SortKey::Unsorted`].
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == name)
            .unwrap_or_else(|| {
                tracing::debug!(sort = name, "unknown sort key, leaving records unsorted");
                SortKey::Unsorted
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::AmountDesc => "amount-desc",
            SortKey::AmountAsc => "amount-asc",
            SortKey::DescriptionAsc => "description-asc",
            SortKey::DescriptionDesc => "description-desc",
            SortKey::CategoryAsc => "category-asc",
            SortKey::Unsorted => "unsorted",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == *category,
        }
    }
}

/// What to show: search pattern, ordering, category filter and the fields
/// the pattern applies to. `Query::default()` is the reset state.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub search_pattern: String,
    pub sort_by: SortKey,
    pub filter_category: CategoryFilter,
    pub fields: Vec<SearchField>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search_pattern: String::new(),
            sort_by: SortKey::default(),
            filter_category: CategoryFilter::default(),
            fields: default_search_fields(),
        }
    }
}

impl Query {
    pub fn with_search(mut self, pattern: impl Into<String>) -> Self {
        self.search_pattern = pattern.into();
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_category(mut self, filter: CategoryFilter) -> Self {
        self.filter_category = filter;
        self
    }

    pub fn with_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.fields = fields;
        self
    }
}

/// A segment of text in a search match, either plain text or a matched term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSegment {
    Plain(String),
    Match(String),
}

/// A field's text split at pattern matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub segments: Vec<MatchSegment>,
}

impl Highlight {
    pub fn has_match(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, MatchSegment::Match(_)))
    }

    /// The original text, segments concatenated.
    pub fn text(&self) -> String {
        self.render("", "")
    }

    /// The text with every match wrapped in `open` / `close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                MatchSegment::Plain(text) => out.push_str(text),
                MatchSegment::Match(text) => {
                    out.push_str(open);
                    out.push_str(text);
                    out.push_str(close);
                }
            }
        }
        out
    }

    pub fn to_marked(&self) -> String {
        self.render("<mark>", "</mark>")
    }
}

pub type HighlightMap = BTreeMap<SearchField, Highlight>;

/// One row of the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit<'a> {
    pub record: &'a Record,
    /// Empty when no search pattern was given.
    pub highlighted: HighlightMap,
}

/// Compiles a search pattern case-insensitively. An empty pattern is `None`.
pub fn compile_pattern(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
    Ok(Some(re))
}

/// Runs the full filter → sort → search pipeline.
pub fn run<'a>(records: &'a [Record], query: &Query) -> Vec<QueryHit<'a>> {
    let mut selected: Vec<&Record> = records
        .iter()
        .filter(|r| query.filter_category.matches(r))
        .collect();
    sort_records(&mut selected, query.sort_by);
    search(selected, &query.search_pattern, &query.fields)
}

pub fn sort_records(records: &mut [&Record], sort_by: SortKey) {
    match sort_by {
        SortKey::DateDesc => records.sort_by(|a, b| b.calendar_date().cmp(&a.calendar_date())),
        SortKey::DateAsc => records.sort_by(|a, b| a.calendar_date().cmp(&b.calendar_date())),
        SortKey::AmountDesc => records.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortKey::AmountAsc => records.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        SortKey::DescriptionAsc => {
            records.sort_by(|a, b| locale_cmp(&a.description, &b.description))
        }
        SortKey::DescriptionDesc => {
            records.sort_by(|a, b| locale_cmp(&b.description, &a.description))
        }
        SortKey::CategoryAsc => records.sort_by(|a, b| locale_cmp(&a.category, &b.category)),
        SortKey::Unsorted => {}
    }
}

/// Case-folded comparison; strings equal after folding order lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

fn search<'a>(records: Vec<&'a Record>, pattern: &str, fields: &[SearchField]) -> Vec<QueryHit<'a>> {
    let re = match compile_pattern(pattern) {
        Ok(Some(re)) => re,
        Ok(None) => {
            return records
                .into_iter()
                .map(|record| QueryHit {
                    record,
                    highlighted: HighlightMap::new(),
                })
                .collect();
        }
        Err(err) => {
            tracing::debug!(pattern, error = %err, "search pattern does not compile, no matches");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter(|record| fields.iter().any(|f| re.is_match(f.value(record))))
        .map(|record| {
            let highlighted = fields
                .iter()
                .map(|f| (*f, highlight(f.value(record), &re)))
                .collect();
            QueryHit {
                record,
                highlighted,
            }
        })
        .collect()
}

/// Splits `text` at every non-empty match of `re`.
pub fn highlight(text: &str, re: &Regex) -> Highlight {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last {
            segments.push(MatchSegment::Plain(text[last..m.start()].to_string()));
        }
        segments.push(MatchSegment::Match(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(MatchSegment::Plain(text[last..].to_string()));
    }
    Highlight { segments }
}
