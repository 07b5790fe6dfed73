use crate::overlay::domain::viewport::{project, ViewportRect};
use crate::shared::constants::{STATUS_LABEL, STATUS_LABEL_TEXT_SIZE};
use crate::shared::snapshot::DetectionSnapshot;

/// Centered status line, measured the way the preview surface draws it.
///
/// Glyph metrics are approximated as half the text size per character, which
/// is close enough for centering a short fixed string.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl StatusLabel {
    pub fn centered(text: &str, viewport_width: u32) -> Self {
        let text_width = text.chars().count() as f32 * STATUS_LABEL_TEXT_SIZE * 0.5;
        Self {
            text: text.to_owned(),
            x: (viewport_width as f32 - text_width) / 2.0,
            y: STATUS_LABEL_TEXT_SIZE,
        }
    }
}

/// Everything a display surface needs for one refresh: the projected face
/// rectangle (absent when no face is cached) and the status label.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayScene {
    pub rect: Option<ViewportRect>,
    pub label: StatusLabel,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl OverlayScene {
    /// Builds the scene for the current refresh from the cached snapshot.
    /// Called once per display refresh whether or not a new detection
    /// arrived, so render cadence is decoupled from detection cadence.
    pub fn compose(
        snapshot: &DetectionSnapshot,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        let rect = snapshot.face.map(|face| {
            project(
                &face,
                snapshot.gray_width,
                snapshot.gray_height,
                viewport_width,
                viewport_height,
            )
        });
        Self {
            rect,
            label: StatusLabel::centered(STATUS_LABEL, viewport_width),
            viewport_width,
            viewport_height,
        }
    }
}

/// Display-side collaborator that draws the scene on every refresh.
pub trait OverlayRenderer {
    fn render(&mut self, scene: &OverlayScene) -> Result<(), Box<dyn std::error::Error>>;
}
