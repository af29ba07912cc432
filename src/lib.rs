//! scriptview - find scripts in a local folder and page through them.
//!
//! Scripts are PDF files under a scripts directory. Names are matched with a
//! typo-tolerant approximate substring search, queries may be typed or
//! spoken, and a selected script opens in a paged viewer with bounded zoom.
//!
//! # Quick start
//!
//! ```no_run
//! use scriptview::{DataDir, DirectoryCatalog, SearchIndex, catalog, search};
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let entries = catalog::load_or_empty(&DirectoryCatalog::new(&data_dir));
//! let index = SearchIndex::build(&entries);
//!
//! for r in search::execute_search(&index, "hamlit") {
//!     println!("{} {} ({:?})", r.rank, r.name, r.score);
//! }
//! ```

pub mod browse;
pub mod catalog;
pub mod data_dir;
pub mod decoder;
pub mod doc_id;
pub mod error;
pub mod fuzzy_index;
pub mod search;
pub mod selection;
pub mod session;
pub mod text_util;
pub mod viewer;
pub mod voice;
pub mod walker;

pub use catalog::{CatalogEntry, CatalogProvider, DirectoryCatalog};
pub use data_dir::DataDir;
pub use decoder::{DocumentDecoder, PdfDecoder};
pub use doc_id::DocumentId;
pub use error::{Error, Result};
pub use fuzzy_index::{MatchResult, MatcherOptions, SearchIndex};
pub use session::{Effect, Session, SessionEvent};
pub use viewer::Viewer;
