use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Supported paper formats. Serialized names match the stored column values
/// and the rendering backend's format identifiers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperFormat {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 10] = [
        PaperFormat::A0,
        PaperFormat::A1,
        PaperFormat::A2,
        PaperFormat::A3,
        PaperFormat::A4,
        PaperFormat::A5,
        PaperFormat::A6,
        PaperFormat::Letter,
        PaperFormat::Legal,
        PaperFormat::Tabloid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperFormat::A0 => "A0",
            PaperFormat::A1 => "A1",
            PaperFormat::A2 => "A2",
            PaperFormat::A3 => "A3",
            PaperFormat::A4 => "A4",
            PaperFormat::A5 => "A5",
            PaperFormat::A6 => "A6",
            PaperFormat::Letter => "Letter",
            PaperFormat::Legal => "Legal",
            PaperFormat::Tabloid => "Tabloid",
        }
    }

    /// Physical page size as (width, height) in millimetres, portrait.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperFormat::A0 => (841.0, 1189.0),
            PaperFormat::A1 => (594.0, 841.0),
            PaperFormat::A2 => (420.0, 594.0),
            PaperFormat::A3 => (297.0, 420.0),
            PaperFormat::A4 => (210.0, 297.0),
            PaperFormat::A5 => (148.0, 210.0),
            PaperFormat::A6 => (105.0, 148.0),
            PaperFormat::Letter => (216.0, 279.0),
            PaperFormat::Legal => (216.0, 356.0),
            PaperFormat::Tabloid => (279.0, 432.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        }
    }
}

/// Body padding in millimetres. Named "padding" internally but presented as
/// "page margins" in user-facing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PagePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PagePadding {
    /// Floor negative values at zero.
    pub fn clamped(self) -> Self {
        Self {
            top: self.top.max(0.0),
            right: self.right.max(0.0),
            bottom: self.bottom.max(0.0),
            left: self.left.max(0.0),
        }
    }
}

/// Resolved page settings used when producing preview CSS. The content model
/// itself stores only presence/absence; resolution against renderer defaults
/// happens at the call site that needs concrete values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageSettings {
    pub format: PaperFormat,
    pub orientation: PageOrientation,
    pub padding: PagePadding,
}

impl PageSettings {
    /// Emit an `@page` block plus a body reset for in-browser previews.
    pub fn to_css(&self) -> String {
        format!(
            "@page {{\n  size: {} {};\n  margin: {}mm {}mm {}mm {}mm;\n}}\n\nbody {{\n  margin: 0;\n  padding: 0;\n}}",
            self.format.as_str(),
            self.orientation.as_str(),
            self.padding.top,
            self.padding.right,
            self.padding.bottom,
            self.padding.left,
        )
    }
}

/// Errors raised by content validation, before any store access.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// The complete renderable payload of a template.
///
/// A template owns at most one live content value; every save replaces the
/// whole payload (last write wins, no history). Layout fields are optional
/// and carry no defaults here - absence means "use the renderer's default",
/// so this model never diverges from the backend's own defaulting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateContent {
    /// Markup body. Required; the only mandatory field.
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_format: Option<PaperFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_orientation: Option<PageOrientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_padding: Option<PagePadding>,
    /// Suppresses page-break pagination: one continuous canvas. The renderer
    /// ignores the fixed page height of `paper_format` while this is set.
    #[serde(default)]
    pub infinite_mode: bool,
    /// Schema-less sample data for preview rendering only. Never required
    /// for a save or a production render.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl TemplateContent {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: None,
            paper_format: None,
            page_orientation: None,
            page_padding: None,
            infinite_mode: false,
            data: Map::new(),
        }
    }

    /// Check the payload before it reaches the store. `html` must be present
    /// and non-blank; everything else is optional.
    ///
    /// Whitespace-only markup is treated as missing. This is deliberately
    /// stricter than only rejecting the empty string: a template whose body
    /// trims to nothing renders a blank page, so it gets caught here rather
    /// than at render time.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.html.trim().is_empty() {
            return Err(ContentError::MissingRequiredField("html"));
        }
        Ok(())
    }
}
