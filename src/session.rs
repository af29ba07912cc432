//! The single-threaded event loop state.
//!
//! Every input (typed text, transcripts, button presses, resizes, decoder
//! results) arrives as a [`SessionEvent`]. [`Session::handle`] applies it and
//! returns the [`Effect`]s the caller must carry out, such as decoding a
//! document off the event thread.

use std::time::{Duration, Instant};

use crate::{
    catalog::CatalogEntry,
    doc_id::DocumentId,
    error::Error,
    search,
    selection::{QueryInput, SelectionController},
    text_util,
    viewer::{Delivery, DocumentStatus, Viewer},
    voice::{Transcript, VoiceController, VoiceError},
};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Typed query text.
    QueryChanged(String),
    Select(CatalogEntry),
    Back,
    NextPage,
    PreviousPage,
    ZoomIn,
    ZoomOut,
    Resize(u32),
    DocumentReady { generation: u64, page_count: i64 },
    DocumentFailed { generation: u64, reason: String },
    /// Microphone button.
    ToggleVoice,
    Speech { capture: u64, transcript: Transcript },
    VoiceFailed { capture: u64, error: VoiceError },
    VoiceEnded { capture: u64 },
}

/// Work the caller performs on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Decode `locator` and report back with `generation`.
    Decode { generation: u64, locator: String },
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_live(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) < NOTICE_TTL
    }
}

#[derive(Debug)]
pub struct Session {
    selection: SelectionController,
    viewer: Viewer,
    voice: VoiceController,
    query: String,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(
        selection: SelectionController,
        viewer: Viewer,
        voice: VoiceController,
    ) -> Self {
        Self {
            selection,
            viewer,
            voice,
            query: String::new(),
            notices: Vec::new(),
        }
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn voice(&self) -> &VoiceController {
        &self.voice
    }

    /// Text currently in the query input.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Notices still on screen at `now`.
    pub fn notices(&self, now: Instant) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.is_live(now))
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let now = Instant::now();
        self.notices.retain(|n| n.is_live(now));

        match event {
            SessionEvent::QueryChanged(text) => {
                self.apply_query(text);
                Vec::new()
            }
            SessionEvent::Select(entry) => self.select(&entry),
            SessionEvent::Back => {
                self.back();
                Vec::new()
            }
            SessionEvent::NextPage => self.viewer_op(Viewer::next_page),
            SessionEvent::PreviousPage => {
                self.viewer_op(Viewer::previous_page)
            }
            SessionEvent::ZoomIn => self.viewer_op(Viewer::zoom_in),
            SessionEvent::ZoomOut => self.viewer_op(Viewer::zoom_out),
            SessionEvent::Resize(width) => {
                self.viewer.on_viewport_resize(width);
                Vec::new()
            }
            SessionEvent::DocumentReady {
                generation,
                page_count,
            } => {
                match self.viewer.on_document_ready(generation, page_count) {
                    Ok(Delivery::Applied) => {
                        tracing::debug!(page_count, "document ready");
                    }
                    Ok(Delivery::Stale) => {}
                    Err(e) => self.notify(e.to_string()),
                }
                Vec::new()
            }
            SessionEvent::DocumentFailed { generation, reason } => {
                if self.viewer.on_document_failed(generation, reason.clone())
                    == Delivery::Applied
                {
                    tracing::warn!(reason = %reason, "document failed to load");
                }
                Vec::new()
            }
            SessionEvent::ToggleVoice => {
                if self.selection.viewing().is_none()
                    && let Err(e) = self.voice.toggle()
                {
                    self.notify(e.user_message());
                }
                Vec::new()
            }
            SessionEvent::Speech {
                capture,
                transcript,
            } => {
                if let Some(text) = self.voice.on_result(capture, transcript) {
                    self.apply_query(text);
                }
                Vec::new()
            }
            SessionEvent::VoiceFailed { capture, error } => {
                if let Some(error) = self.voice.on_error(capture, error) {
                    self.notify(error.user_message());
                }
                Vec::new()
            }
            SessionEvent::VoiceEnded { capture } => {
                self.voice.on_end(capture);
                Vec::new()
            }
        }
    }

    fn apply_query(&mut self, text: String) {
        if self.selection.viewing().is_some() {
            return;
        }
        self.selection.on_query(&text);
        self.query = text;
    }

    fn select(&mut self, entry: &CatalogEntry) -> Vec<Effect> {
        if let Err(e) = self.selection.on_select(entry) {
            self.notify(e.to_string());
            return Vec::new();
        }

        self.voice.stop();
        let generation = self.viewer.open(DocumentId::new(&entry.locator));
        vec![Effect::Decode {
            generation,
            locator: entry.locator.clone(),
        }]
    }

    fn back(&mut self) {
        if self.selection.viewing().is_none() {
            return;
        }
        self.viewer.close();
        if self.selection.on_back() == QueryInput::Reset {
            self.query.clear();
        }
    }

    fn viewer_op(
        &mut self,
        op: fn(&mut Viewer) -> crate::error::Result<()>,
    ) -> Vec<Effect> {
        if let Err(e) = op(&mut self.viewer) {
            tracing::debug!(error = %e, "viewer control ignored");
        }
        Vec::new()
    }

    fn notify(&mut self, message: String) {
        self.notices.push(Notice {
            message,
            raised_at: Instant::now(),
        });
    }

    /// Render the current screen as plain text.
    pub fn render(&self, now: Instant) -> String {
        let mut out = String::new();

        match self.selection.viewing() {
            Some(entry) => self.render_viewer(entry, &mut out),
            None => self.render_browser(&mut out),
        }

        for notice in self.notices(now) {
            out.push_str(&format!("! {}\n", notice.message));
        }
        out
    }

    fn render_browser(&self, out: &mut String) {
        out.push_str(&format!("Search: {}\n", self.query));
        if self.voice.is_listening() {
            out.push_str("Listening...\n");
        }

        let total = self.selection.catalog_len();
        let filtered = self.selection.filtered().unwrap_or_default();

        if total == 0 {
            out.push_str("No scripts available.\n");
            out.push_str("Add PDF files to the scripts folder to get started.\n");
        } else if filtered.is_empty() {
            out.push_str("No scripts found.\n");
            out.push_str("Try a different search term or check your voice input.\n");
        } else {
            out.push_str(&search::results_heading(filtered.len(), total));
            out.push('\n');
            for (i, entry) in filtered.iter().enumerate() {
                out.push_str(&format!("{:>3}. {}\n", i + 1, entry.label()));
            }
        }
    }

    fn render_viewer(&self, entry: &CatalogEntry, out: &mut String) {
        out.push_str("<- Back to Scripts\n");
        out.push_str(&format!("{}\n", entry.label()));

        match self.viewer.status() {
            Ok(DocumentStatus::Loading) => out.push_str("Loading PDF...\n"),
            Ok(DocumentStatus::Failed(reason)) => {
                out.push_str("Failed to load PDF file.\n");
                out.push_str(&format!("{reason}\n"));
            }
            Ok(DocumentStatus::Ready) => {
                let percent = self.viewer.zoom_percent().unwrap_or(100);
                let page = self.viewer.current_page().unwrap_or(1);
                let pages = self.viewer.page_count().unwrap_or(0);
                out.push_str(&format!(
                    "{} {percent}% {}   {} Page {page} of {pages} {}\n",
                    control("zoom-", self.viewer.can_zoom_out()),
                    control("zoom+", self.viewer.can_zoom_in()),
                    control("prev", self.viewer.can_go_previous()),
                    control("next", self.viewer.can_go_next()),
                ));
            }
            Err(e) => out.push_str(&format!("{e}\n")),
        }
    }
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}

/// Summary line for a decoder failure, used as the viewer's failure reason.
pub fn failure_reason(error: &Error) -> String {
    match error {
        Error::DocumentNotFound(_) => "Please check if the file exists.".into(),
        Error::DocumentCorrupt { reason, .. } => {
            format!("The file could not be read: {reason}")
        }
        other => other.to_string(),
    }
}

/// Count of results phrased for a status line.
pub fn result_summary(session: &Session) -> String {
    let shown = session.selection.filtered().map_or(0, <[_]>::len);
    text_util::count_noun(shown, "script")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fuzzy_index::SearchIndex,
        voice::{Capture, tests::RecordingCapture},
    };

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Intro_Lecture.pdf", "/s/Intro_Lecture.pdf"),
            CatalogEntry::new("Hamlet.pdf", "/s/Hamlet.pdf"),
        ]
    }

    fn session_with(capture: Capture, width: u32) -> Session {
        Session::new(
            SelectionController::new(SearchIndex::build(&entries())),
            Viewer::new(width),
            VoiceController::new(capture),
        )
    }

    fn session() -> Session {
        session_with(Capture::Unavailable, 1280)
    }

    fn open_hamlet(s: &mut Session) -> u64 {
        s.handle(SessionEvent::QueryChanged("hamlet".into()));
        let entry = s.selection().filtered().unwrap()[0].clone();
        match s.handle(SessionEvent::Select(entry)).as_slice() {
            [Effect::Decode { generation, locator }] => {
                assert_eq!(locator, "/s/Hamlet.pdf");
                *generation
            }
            other => panic!("expected one decode effect, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_shows_full_catalog() {
        let mut s = session();
        s.handle(SessionEvent::QueryChanged(String::new()));
        assert_eq!(s.selection().filtered().unwrap().len(), 2);
        assert!(s.render(Instant::now()).contains("All Scripts (2)"));
    }

    #[test]
    fn open_navigate_and_back() {
        let mut s = session();
        let generation = open_hamlet(&mut s);
        assert!(s.render(Instant::now()).contains("Loading PDF..."));

        s.handle(SessionEvent::NextPage);
        assert_eq!(s.viewer().current_page().unwrap(), 1);

        s.handle(SessionEvent::DocumentReady {
            generation,
            page_count: 5,
        });
        s.handle(SessionEvent::NextPage);
        assert_eq!(s.viewer().current_page().unwrap(), 2);
        assert!(s.render(Instant::now()).contains("Page 2 of 5"));

        s.handle(SessionEvent::Back);
        assert!(!s.viewer().is_open());
        assert_eq!(s.query(), "");
        assert_eq!(s.selection().filtered().unwrap().len(), 2);
    }

    #[test]
    fn stale_ready_after_reopen_is_dropped() {
        let mut s = session();
        let first = open_hamlet(&mut s);
        s.handle(SessionEvent::Back);
        let second = open_hamlet(&mut s);
        assert_ne!(first, second);

        s.handle(SessionEvent::DocumentReady {
            generation: first,
            page_count: 9,
        });
        assert_eq!(s.viewer().page_count().unwrap(), 0);
        assert_eq!(s.viewer().status().unwrap(), &DocumentStatus::Loading);
    }

    #[test]
    fn decode_failure_shows_failed_viewer() {
        let mut s = session();
        let generation = open_hamlet(&mut s);
        s.handle(SessionEvent::DocumentFailed {
            generation,
            reason: "Please check if the file exists.".into(),
        });
        let screen = s.render(Instant::now());
        assert!(screen.contains("Failed to load PDF file."));

        s.handle(SessionEvent::Back);
        assert!(s.selection().filtered().is_some());
    }

    #[test]
    fn selecting_stale_entry_raises_notice() {
        let mut s = session();
        s.handle(SessionEvent::QueryChanged("intro".into()));
        let hamlet = entries()[1].clone();
        let effects = s.handle(SessionEvent::Select(hamlet));
        assert!(effects.is_empty());
        assert!(!s.viewer().is_open());
        assert_eq!(s.notices(Instant::now()).count(), 1);
    }

    #[test]
    fn voice_unavailable_raises_transient_notice() {
        let mut s = session();
        s.handle(SessionEvent::ToggleVoice);
        let now = Instant::now();
        assert!(s.render(now).contains("not supported"));
        assert_eq!(s.notices(now + NOTICE_TTL).count(), 0);
    }

    #[test]
    fn spoken_query_filters_like_typed_query() {
        let mut s = session_with(
            Capture::Available(Box::new(RecordingCapture::default())),
            1280,
        );
        s.handle(SessionEvent::ToggleVoice);
        assert!(s.voice().is_listening());
        assert!(s.render(Instant::now()).contains("Listening..."));

        s.handle(SessionEvent::Speech {
            capture: 1,
            transcript: Transcript {
                text: "hamlet".into(),
                is_final: true,
            },
        });
        assert!(!s.voice().is_listening());
        assert_eq!(s.query(), "hamlet");
        assert_eq!(s.selection().filtered().unwrap().len(), 1);
    }

    #[test]
    fn voice_error_is_surfaced_not_fatal() {
        let mut s = session_with(
            Capture::Available(Box::new(RecordingCapture::default())),
            1280,
        );
        s.handle(SessionEvent::ToggleVoice);
        s.handle(SessionEvent::VoiceFailed {
            capture: 1,
            error: VoiceError::NoMicrophone,
        });
        assert!(!s.voice().is_listening());
        assert!(s.render(Instant::now()).contains("No microphone found."));

        s.handle(SessionEvent::ToggleVoice);
        assert!(s.voice().is_listening());
    }

    #[test]
    fn query_while_viewing_is_ignored() {
        let mut s = session();
        open_hamlet(&mut s);
        s.handle(SessionEvent::QueryChanged("intro".into()));
        assert_eq!(s.query(), "hamlet");
        assert!(s.viewer().is_open());
    }

    #[test]
    fn mobile_resize_resets_zoom() {
        let mut s = session();
        let generation = open_hamlet(&mut s);
        s.handle(SessionEvent::DocumentReady {
            generation,
            page_count: 2,
        });
        s.handle(SessionEvent::ZoomIn);
        s.handle(SessionEvent::Resize(400));
        assert!((s.viewer().scale().unwrap() - 0.667).abs() < 1e-3);
        assert!(s.render(Instant::now()).contains("67%"));
    }

    #[test]
    fn no_results_and_no_scripts_messages() {
        let mut s = session();
        s.handle(SessionEvent::QueryChanged("zzzz".into()));
        assert!(s.render(Instant::now()).contains("No scripts found."));

        let empty = Session::new(
            SelectionController::new(SearchIndex::build(&[])),
            Viewer::new(1280),
            VoiceController::new(Capture::Unavailable),
        );
        assert!(empty.render(Instant::now()).contains("No scripts available."));
    }

    #[test]
    fn failure_reason_wording() {
        assert_eq!(
            failure_reason(&Error::DocumentNotFound("x".into())),
            "Please check if the file exists."
        );
        assert!(
            failure_reason(&Error::DocumentCorrupt {
                locator: "x".into(),
                reason: "bad xref".into(),
            })
            .contains("bad xref")
        );
    }

    #[test]
    fn summary_counts_listing() {
        let mut s = session();
        assert_eq!(result_summary(&s), "2 scripts");
        s.handle(SessionEvent::QueryChanged("hamlet".into()));
        assert_eq!(result_summary(&s), "1 script");
    }
}
