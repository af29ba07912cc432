//! Approximate matching of queries against catalog entries.
//!
//! Each entry is keyed on its display `name` and its `raw_name`. A query is
//! compared against every key as an approximate substring: the score is the
//! smallest number of edits needed to make the query appear somewhere in the
//! key, divided by the query length. An optional proximity penalty favours
//! matches near the start of the key.

use serde::Serialize;

use crate::{
    catalog::CatalogEntry,
    error::{Error, Result},
    text_util,
};

/// Default acceptance threshold on the 0 (identical) to 1 (unrelated) scale.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Default minimum trimmed query length, in characters.
pub const DEFAULT_MIN_MATCH_LEN: usize = 2;

/// Tuning knobs for the matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherOptions {
    /// Highest score still accepted as a match.
    pub threshold: f64,
    /// Queries shorter than this accept no fuzzy matches.
    pub min_match_len: usize,
    /// When set, a match starting `k` characters into a key costs an extra
    /// `k / distance`. `None` scores all positions equally.
    pub distance: Option<usize>,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
            distance: None,
        }
    }
}

impl MatcherOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Config(format!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }
        if self.distance == Some(0) {
            return Err(Error::Config("distance must be positive".into()));
        }
        Ok(())
    }
}

/// A scored catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    /// 0 is a perfect match, 1 the weakest possible.
    pub score: f64,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: CatalogEntry,
    keys: [Vec<char>; 2],
}

/// Searchable snapshot of the catalog.
///
/// Built once; rebuild it when the catalog changes. Searching takes `&self`
/// so a shared index can be read from several threads at once.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
    options: MatcherOptions,
}

impl SearchIndex {
    /// Index `entries` with the default options.
    pub fn build(entries: &[CatalogEntry]) -> Self {
        Self::with_options(entries, MatcherOptions::default())
    }

    pub fn with_options(
        entries: &[CatalogEntry],
        options: MatcherOptions,
    ) -> Self {
        let entries = entries
            .iter()
            .map(|entry| IndexedEntry {
                keys: [
                    text_util::normalize(&entry.name),
                    text_util::normalize(&entry.raw_name),
                ],
                entry: entry.clone(),
            })
            .collect();
        Self { entries, options }
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().map(|e| &e.entry)
    }

    /// Rank entries against `query`, best first.
    ///
    /// Callers handle the empty query themselves (it means "everything").
    /// Ties keep catalog order.
    pub fn search(&self, query: &str) -> Vec<MatchResult> {
        if !text_util::has_alphanumeric(query) {
            return Vec::new();
        }

        let pattern = text_util::normalize(query);
        if pattern.len() < self.options.min_match_len {
            return Vec::new();
        }

        let mut results: Vec<MatchResult> = self
            .entries
            .iter()
            .filter_map(|indexed| {
                let score = indexed
                    .keys
                    .iter()
                    .map(|key| score_key(&pattern, key, self.options.distance))
                    .fold(1.0_f64, f64::min);
                (score <= self.options.threshold).then(|| MatchResult {
                    entry: indexed.entry.clone(),
                    score,
                })
            })
            .collect();

        // `sort_by` is stable, so equal scores stay in catalog order.
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }
}

/// Best alignment of a pattern inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Edits (insertions, deletions, substitutions) needed.
    pub errors: usize,
    /// Text offset where the aligned substring begins.
    pub start: usize,
}

/// Find the substring of `text` with the smallest edit distance to
/// `pattern`. The leftmost alignment wins among equals.
pub fn align(pattern: &[char], text: &[char]) -> Alignment {
    // Row i holds (cost, start) for pattern[..i] ending at each text offset.
    // Row 0 is free everywhere, which lets a match begin anywhere.
    let mut prev: Vec<(usize, usize)> = (0..=text.len()).map(|j| (0, j)).collect();
    let mut curr = vec![(0, 0); text.len() + 1];

    for (i, &pc) in pattern.iter().enumerate() {
        curr[0] = (i + 1, 0);
        for (j, &tc) in text.iter().enumerate() {
            let substitute = (prev[j].0 + usize::from(pc != tc), prev[j].1);
            let skip_pattern = (prev[j + 1].0 + 1, prev[j + 1].1);
            let skip_text = (curr[j].0 + 1, curr[j].1);
            curr[j + 1] = [substitute, skip_pattern, skip_text]
                .into_iter()
                .min()
                .unwrap_or(substitute);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let (errors, start) = prev.iter().copied().min().unwrap_or((pattern.len(), 0));
    Alignment { errors, start }
}

/// Score `pattern` against one key on the 0..=1 scale.
pub fn score_key(pattern: &[char], key: &[char], distance: Option<usize>) -> f64 {
    if pattern.is_empty() {
        return 1.0;
    }

    let alignment = align(pattern, key);
    let accuracy = alignment.errors as f64 / pattern.len() as f64;
    let proximity = match distance {
        Some(d) if d > 0 => alignment.start as f64 / d as f64,
        _ => 0.0,
    };

    (accuracy + proximity).min(1.0)
}
