//! Page and zoom state for the open document.
//!
//! Scales are held in millionths so that stepping in and back out lands on
//! exactly the same value.

use crate::{
    doc_id::DocumentId,
    error::{Error, Result},
};

pub const MIN_SCALE: f64 = 0.3;
pub const MAX_SCALE: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Viewports at most this wide use the mobile layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Page width the mobile fit-to-width scale is computed against.
pub const REFERENCE_PAGE_WIDTH_PX: f64 = 600.0;

const MICROS: f64 = 1_000_000.0;

fn to_micros(scale: f64) -> u32 {
    (scale * MICROS).round() as u32
}

const MIN_MICROS: u32 = 300_000;
const MAX_MICROS: u32 = 2_000_000;
const STEP_MICROS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Desktop,
    Mobile,
}

impl LayoutMode {
    pub fn for_width(width_px: u32) -> Self {
        if width_px <= MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Scale a freshly opened document starts at.
pub fn initial_scale_for(mode: LayoutMode, viewport_width_px: u32) -> f64 {
    match mode {
        LayoutMode::Desktop => 1.0,
        LayoutMode::Mobile => {
            (viewport_width_px as f64 / REFERENCE_PAGE_WIDTH_PX).min(1.0)
        }
    }
}

fn initial_micros(mode: LayoutMode, viewport_width_px: u32) -> u32 {
    to_micros(initial_scale_for(mode, viewport_width_px))
        .clamp(MIN_MICROS, MAX_MICROS)
}

/// Loading progress of the open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Loading,
    Ready,
    Failed(String),
}

/// What happened to an asynchronous result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// The result belonged to an earlier `open` and was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenDocument {
    document: DocumentId,
    status: DocumentStatus,
    page_count: u32,
    current_page: u32,
    scale_micros: u32,
}

/// Navigation and zoom for at most one open document.
#[derive(Debug, Clone)]
pub struct Viewer {
    viewport_width_px: u32,
    layout: LayoutMode,
    generation: u64,
    open: Option<OpenDocument>,
}

impl Viewer {
    pub fn new(viewport_width_px: u32) -> Self {
        Self {
            viewport_width_px,
            layout: LayoutMode::for_width(viewport_width_px),
            generation: 0,
            open: None,
        }
    }

    /// Start viewing `document`, replacing anything already open.
    ///
    /// Returns the generation tag that the matching ready or failure event
    /// must carry.
    pub fn open(&mut self, document: DocumentId) -> u64 {
        self.generation += 1;
        tracing::debug!(
            document = %document,
            generation = self.generation,
            "viewer opened"
        );
        self.open = Some(OpenDocument {
            document,
            status: DocumentStatus::Loading,
            page_count: 0,
            current_page: 1,
            scale_micros: initial_micros(self.layout, self.viewport_width_px),
        });
        self.generation
    }

    /// Record the page count reported by the decoder.
    pub fn on_document_ready(
        &mut self,
        generation: u64,
        page_count: i64,
    ) -> Result<Delivery> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale ready event");
            return Ok(Delivery::Stale);
        }
        let Some(doc) = self.open.as_mut() else {
            return Ok(Delivery::Stale);
        };
        if page_count < 0 {
            doc.status = DocumentStatus::Failed(format!(
                "reported {page_count} pages"
            ));
            return Err(Error::InvalidDocument(page_count));
        }

        doc.page_count = u32::try_from(page_count).unwrap_or(u32::MAX);
        doc.status = DocumentStatus::Ready;
        if doc.page_count >= 1 {
            doc.current_page = doc.current_page.clamp(1, doc.page_count);
        }
        Ok(Delivery::Applied)
    }

    /// Record that decoding failed. The viewer keeps the document shown in a
    /// failed state with navigation disabled.
    pub fn on_document_failed(
        &mut self,
        generation: u64,
        reason: impl Into<String>,
    ) -> Delivery {
        match self.open.as_mut() {
            Some(doc) if generation == self.generation => {
                doc.status = DocumentStatus::Failed(reason.into());
                doc.page_count = 0;
                doc.current_page = 1;
                Delivery::Applied
            }
            _ => Delivery::Stale,
        }
    }

    pub fn next_page(&mut self) -> Result<()> {
        let doc = self.active_mut()?;
        if doc.current_page < doc.page_count {
            doc.current_page += 1;
        }
        Ok(())
    }

    pub fn previous_page(&mut self) -> Result<()> {
        let doc = self.active_mut()?;
        if doc.page_count > 0 && doc.current_page > 1 {
            doc.current_page -= 1;
        }
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        let doc = self.active_mut()?;
        doc.scale_micros = (doc.scale_micros + STEP_MICROS).min(MAX_MICROS);
        Ok(())
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        let doc = self.active_mut()?;
        doc.scale_micros = doc
            .scale_micros
            .saturating_sub(STEP_MICROS)
            .max(MIN_MICROS);
        Ok(())
    }

    /// Track the viewport width. Entering the mobile layout resets the scale
    /// to fit-to-width, even over a manual zoom.
    pub fn on_viewport_resize(&mut self, width_px: u32) {
        let previous = self.layout;
        self.viewport_width_px = width_px;
        self.layout = LayoutMode::for_width(width_px);

        if self.layout == LayoutMode::Mobile
            && previous != LayoutMode::Mobile
            && let Some(doc) = self.open.as_mut()
        {
            doc.scale_micros = initial_micros(LayoutMode::Mobile, width_px);
            tracing::debug!(width_px, "entered mobile layout, zoom reset");
        }
    }

    /// Discard the open document. Pending events for it become stale.
    pub fn close(&mut self) {
        if self.open.take().is_some() {
            self.generation += 1;
            tracing::debug!(generation = self.generation, "viewer closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width_px
    }

    pub fn document(&self) -> Result<&DocumentId> {
        Ok(&self.active()?.document)
    }

    pub fn status(&self) -> Result<&DocumentStatus> {
        Ok(&self.active()?.status)
    }

    pub fn page_count(&self) -> Result<u32> {
        Ok(self.active()?.page_count)
    }

    pub fn current_page(&self) -> Result<u32> {
        Ok(self.active()?.current_page)
    }

    pub fn scale(&self) -> Result<f64> {
        Ok(self.active()?.scale_micros as f64 / MICROS)
    }

    /// Scale as a whole percentage, for display.
    pub fn zoom_percent(&self) -> Result<u32> {
        Ok((self.scale()? * 100.0).round() as u32)
    }

    pub fn can_go_next(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|d| d.current_page < d.page_count)
    }

    pub fn can_go_previous(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|d| d.page_count > 0 && d.current_page > 1)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|d| d.scale_micros < MAX_MICROS)
    }

    pub fn can_zoom_out(&self) -> bool {
        self.open
            .as_ref()
            .is_some_and(|d| d.scale_micros > MIN_MICROS)
    }

    fn active(&self) -> Result<&OpenDocument> {
        self.open.as_ref().ok_or(Error::NoActiveDocument)
    }

    fn active_mut(&mut self) -> Result<&mut OpenDocument> {
        self.open.as_mut().ok_or(Error::NoActiveDocument)
    }
}
