use serde::Serialize;

use crate::{
    catalog::CatalogEntry,
    error::Result,
    fuzzy_index::{MatchResult, SearchIndex},
    text_util,
};

/// How a result came to be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Empty query: the whole catalog is listed.
    All,
    /// Scored by the fuzzy matcher.
    Fuzzy,
    /// Query too short to score; plain substring containment.
    Substring,
}

/// A ranked entry as presented to the user.
#[derive(Debug, Clone, Serialize)]
pub struct FinalResult {
    pub rank: usize,
    pub kind: MatchKind,
    /// Fuzzy score, present only for [`MatchKind::Fuzzy`].
    pub score: Option<f64>,
    pub name: String,
    pub raw_name: String,
    pub locator: String,
}

impl FinalResult {
    fn new(
        rank: usize,
        kind: MatchKind,
        score: Option<f64>,
        entry: &CatalogEntry,
    ) -> Self {
        Self {
            rank,
            kind,
            score,
            name: entry.name.clone(),
            raw_name: entry.raw_name.clone(),
            locator: entry.locator.clone(),
        }
    }

    pub fn entry(&self) -> CatalogEntry {
        CatalogEntry {
            name: self.name.clone(),
            locator: self.locator.clone(),
            raw_name: self.raw_name.clone(),
        }
    }
}

/// Apply the query policy and return matching entries, best first.
///
/// 1. Empty or whitespace-only query: every entry, in catalog order
/// 2. Query shorter than the minimum match length: substring containment
/// 3. Otherwise: fuzzy matching
pub fn filter_entries(index: &SearchIndex, query: &str) -> Vec<CatalogEntry> {
    execute_search(index, query)
        .iter()
        .map(FinalResult::entry)
        .collect()
}

/// Run the query policy of [`filter_entries`] and keep the scores.
pub fn execute_search(index: &SearchIndex, query: &str) -> Vec<FinalResult> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return index
            .entries()
            .enumerate()
            .map(|(i, e)| FinalResult::new(i + 1, MatchKind::All, None, e))
            .collect();
    }

    if trimmed.chars().count() < index.options().min_match_len {
        return index
            .entries()
            .filter(|e| {
                text_util::contains_ignore_case(&e.name, trimmed)
                    || text_util::contains_ignore_case(&e.raw_name, trimmed)
            })
            .enumerate()
            .map(|(i, e)| FinalResult::new(i + 1, MatchKind::Substring, None, e))
            .collect();
    }

    index
        .search(trimmed)
        .iter()
        .enumerate()
        .map(|(i, MatchResult { entry, score })| {
            FinalResult::new(i + 1, MatchKind::Fuzzy, Some(*score), entry)
        })
        .collect()
}

/// Heading over a result list: the full count when nothing is filtered out.
pub fn results_heading(shown: usize, total: usize) -> String {
    if shown == total {
        format!("All Scripts ({total})")
    } else {
        format!("Found {}", text_util::count_noun(shown, "script"))
    }
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[FinalResult], total: usize) {
    if total == 0 {
        println!("No scripts available.");
        return;
    }
    if results.is_empty() {
        println!("No scripts found.");
        return;
    }

    println!("{}", results_heading(results.len(), total));
    for r in results {
        match r.score {
            Some(score) => println!(
                "{:>3}. [{score:.3}] {}",
                r.rank,
                text_util::display_label(&r.name)
            ),
            None => {
                println!("{:>3}. {}", r.rank, text_util::display_label(&r.name))
            }
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    query: &'a str,
    result_count: usize,
    results: &'a [FinalResult],
}

/// Format results as JSON output.
pub fn format_json(results: &[FinalResult], query: &str) -> Result<()> {
    let report = JsonReport {
        query,
        result_count: results.len(),
        results,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

/// Format results as plain locators (one per line).
pub fn format_files(results: &[FinalResult]) {
    for r in results {
        println!("{}", r.locator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        SearchIndex::build(&[
            CatalogEntry::new("Intro_Lecture.pdf", "/s/Intro_Lecture.pdf"),
            CatalogEntry::new("Hamlet.pdf", "/s/Hamlet.pdf"),
            CatalogEntry::new("Macbeth.pdf", "/s/Macbeth.pdf"),
        ])
    }

    #[test]
    fn empty_query_lists_everything_in_order() {
        let results = execute_search(&index(), "   ");
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Intro_Lecture", "Hamlet", "Macbeth"]);
        assert!(results.iter().all(|r| r.kind == MatchKind::All));
        assert!(results.iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn single_character_falls_back_to_substring() {
        let results = execute_search(&index(), "H");
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Hamlet", "Macbeth"]);
        assert!(results.iter().all(|r| r.kind == MatchKind::Substring));
    }

    #[test]
    fn fuzzy_results_carry_scores_and_ranks() {
        let results = execute_search(&index(), "hamlet");
        assert_eq!(results[0].name, "Hamlet");
        assert_eq!(results[0].score, Some(0.0));
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.rank, i + 1);
            assert_eq!(r.kind, MatchKind::Fuzzy);
        }
    }

    #[test]
    fn filter_entries_returns_catalog_entries() {
        let entries = filter_entries(&index(), "intro");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].locator, "/s/Intro_Lecture.pdf");
        assert_eq!(entries[0].raw_name, "Intro_Lecture.pdf");
    }

    #[test]
    fn heading_distinguishes_filtered_lists() {
        assert_eq!(results_heading(3, 3), "All Scripts (3)");
        assert_eq!(results_heading(1, 3), "Found 1 script");
        assert_eq!(results_heading(2, 3), "Found 2 scripts");
    }

    #[test]
    fn json_serializes_kind_in_snake_case() {
        let results = execute_search(&index(), "");
        let value = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(value["kind"], "all");
        assert!(value["score"].is_null());
    }
}
