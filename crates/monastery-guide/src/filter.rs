//! Search and filter over monastery records.
//!
//! All predicates are combined with logical AND and the result is an
//! order-preserving subsequence of the input. There is no ranking.

use monastery_core::{District, Monastery, Sect};

/// Filter predicates. `None` fields are unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterQuery {
    pub search_text: Option<String>,
    pub sect: Option<Sect>,
    pub district: Option<District>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_sect(mut self, sect: Sect) -> Self {
        self.sect = Some(sect);
        self
    }

    pub fn with_district(mut self, district: District) -> Self {
        self.district = Some(district);
        self
    }

    /// A query with no active predicates matches every record.
    pub fn is_unconstrained(&self) -> bool {
        self.sect.is_none()
            && self.district.is_none()
            && self
                .search_text
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
    }
}

/// Case-insensitive substring match against name, sect, district, location
/// and description. Any matching field admits the record.
fn matches_search(monastery: &Monastery, term: &str) -> bool {
    monastery.name.to_lowercase().contains(term)
        || monastery.sect.name().to_lowercase().contains(term)
        || monastery.district.name().to_lowercase().contains(term)
        || monastery.location.to_lowercase().contains(term)
        || monastery.description.to_lowercase().contains(term)
}

/// Apply a filter query, preserving input order.
pub fn filter<'a>(records: &'a [Monastery], query: &FilterQuery) -> Vec<&'a Monastery> {
    let term = query
        .search_text
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let matched: Vec<&Monastery> = records
        .iter()
        .filter(|m| query.sect.is_none_or(|s| m.sect == s))
        .filter(|m| query.district.is_none_or(|d| m.district == d))
        .filter(|m| term.as_deref().is_none_or(|t| matches_search(m, t)))
        .collect();

    tracing::debug!(
        matched = matched.len(),
        total = records.len(),
        "filter applied"
    );
    matched
}
