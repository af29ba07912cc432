use crate::{
    catalog::CatalogEntry,
    error::{Error, Result},
    fuzzy_index::SearchIndex,
    search,
};

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Browsing { filtered: Vec<CatalogEntry> },
    Viewing { entry: CatalogEntry },
}

/// Signal for the query input after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryInput {
    Keep,
    /// Clear any typed or transcribed text.
    Reset,
}

/// Mediates between the catalog listing and the open document.
#[derive(Debug, Clone)]
pub struct SelectionController {
    index: SearchIndex,
    state: Selection,
}

impl SelectionController {
    pub fn new(index: SearchIndex) -> Self {
        let state = Selection::Browsing {
            filtered: index.entries().cloned().collect(),
        };
        Self { index, state }
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn catalog_len(&self) -> usize {
        self.index.len()
    }

    /// The current listing, or `None` while a document is open.
    pub fn filtered(&self) -> Option<&[CatalogEntry]> {
        match &self.state {
            Selection::Browsing { filtered } => Some(filtered),
            Selection::Viewing { .. } => None,
        }
    }

    pub fn viewing(&self) -> Option<&CatalogEntry> {
        match &self.state {
            Selection::Viewing { entry } => Some(entry),
            Selection::Browsing { .. } => None,
        }
    }

    /// Re-filter the listing. Ignored while a document is open.
    pub fn on_query(&mut self, query: &str) {
        if let Selection::Browsing { filtered } = &mut self.state {
            *filtered = search::filter_entries(&self.index, query);
            tracing::debug!(query, matches = filtered.len(), "query applied");
        }
    }

    /// Open `entry`, which must be in the current listing.
    pub fn on_select(&mut self, entry: &CatalogEntry) -> Result<()> {
        let listed = match &self.state {
            Selection::Browsing { filtered } => filtered.contains(entry),
            Selection::Viewing { .. } => false,
        };

        if !listed {
            tracing::error!(
                name = %entry.name,
                "selected entry is not in the current results"
            );
            return Err(Error::NotInResults(entry.name.clone()));
        }

        tracing::debug!(name = %entry.name, "document selected");
        self.state = Selection::Viewing {
            entry: entry.clone(),
        };
        Ok(())
    }

    /// Return to the full catalog, discarding the previous query.
    pub fn on_back(&mut self) -> QueryInput {
        self.state = Selection::Browsing {
            filtered: self.index.entries().cloned().collect(),
        };
        QueryInput::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SelectionController {
        SelectionController::new(SearchIndex::build(&[
            CatalogEntry::new("Intro_Lecture.pdf", "/s/Intro_Lecture.pdf"),
            CatalogEntry::new("Hamlet.pdf", "/s/Hamlet.pdf"),
        ]))
    }

    #[test]
    fn starts_browsing_full_catalog() {
        let c = controller();
        assert_eq!(c.filtered().map(<[_]>::len), Some(2));
    }

    #[test]
    fn empty_query_restores_full_catalog() {
        let mut c = controller();
        c.on_query("hamlet");
        assert_eq!(c.filtered().map(<[_]>::len), Some(1));
        c.on_query("");
        assert_eq!(c.filtered().map(<[_]>::len), Some(2));
    }

    #[test]
    fn select_moves_to_viewing() {
        let mut c = controller();
        c.on_query("intro");
        let entry = c.filtered().unwrap()[0].clone();
        c.on_select(&entry).unwrap();
        assert_eq!(c.viewing(), Some(&entry));
        assert!(c.filtered().is_none());
    }

    #[test]
    fn selecting_filtered_out_entry_is_rejected() {
        let mut c = controller();
        let hamlet = CatalogEntry::new("Hamlet.pdf", "/s/Hamlet.pdf");
        c.on_query("intro");

        let err = c.on_select(&hamlet).unwrap_err();
        assert!(matches!(err, Error::NotInResults(_)));
        assert_eq!(c.filtered().map(<[_]>::len), Some(1));
    }

    #[test]
    fn query_is_ignored_while_viewing() {
        let mut c = controller();
        let entry = c.filtered().unwrap()[1].clone();
        c.on_select(&entry).unwrap();
        c.on_query("intro");
        assert_eq!(c.viewing(), Some(&entry));
    }

    #[test]
    fn back_always_shows_full_catalog() {
        let mut c = controller();
        c.on_query("hamlet");
        let entry = c.filtered().unwrap()[0].clone();
        c.on_select(&entry).unwrap();

        assert_eq!(c.on_back(), QueryInput::Reset);
        let all: Vec<_> = c.index().entries().cloned().collect();
        assert_eq!(c.state(), &Selection::Browsing { filtered: all });
    }
}
