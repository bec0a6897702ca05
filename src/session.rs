use std::sync::Arc;

use retouch_core::{AdjustmentParams, PixelBuffer};
use serde::{Deserialize, Serialize};

/// Which comparison the host shows next to the main preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Edited,
    #[default]
    Split,
    Original,
}

/// Images to draw for the current [`ViewMode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Comparison<'a> {
    Edited(&'a PixelBuffer),
    Split {
        original: &'a PixelBuffer,
        edited: &'a PixelBuffer,
    },
    Original(&'a PixelBuffer),
}

/// State owned by one editing session.
///
/// `original` is replaced wholesale on upload and never mutated. Renders
/// always read `original`, never `rendered`, so adjustments do not compound.
#[derive(Clone, Default)]
pub struct Session {
    pub(crate) original: Option<Arc<PixelBuffer>>,
    pub(crate) params: AdjustmentParams,
    pub(crate) rendered: Option<Arc<PixelBuffer>>,
    pub(crate) view_mode: ViewMode,
    pub(crate) show_original: bool,

    /// Generation of the most recently issued render.
    pub(crate) latest_generation: u64,
    /// Generation that produced `rendered`, 0 if nothing was published.
    pub(crate) published_generation: u64,
    pub(crate) in_flight: usize,
}

impl Session {
    pub fn original(&self) -> Option<&Arc<PixelBuffer>> {
        self.original.as_ref()
    }

    pub fn params(&self) -> &AdjustmentParams {
        &self.params
    }

    pub fn rendered(&self) -> Option<&Arc<PixelBuffer>> {
        self.rendered.as_ref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn show_original(&self) -> bool {
        self.show_original
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    pub fn published_generation(&self) -> u64 {
        self.published_generation
    }

    /// True when `rendered` reflects the current params.
    pub fn is_current(&self) -> bool {
        self.rendered.is_some() && self.published_generation == self.latest_generation
    }

    /// The main preview: the original while the show-original toggle is on,
    /// otherwise the latest render.
    pub fn preview(&self) -> Option<&PixelBuffer> {
        if self.show_original {
            self.original.as_deref()
        } else {
            self.rendered.as_deref()
        }
    }

    /// Comparison panes, once both an original and a render exist.
    pub fn comparison(&self) -> Option<Comparison<'_>> {
        let original = self.original.as_deref()?;
        let edited = self.rendered.as_deref()?;
        Some(match self.view_mode {
            ViewMode::Edited => Comparison::Edited(edited),
            ViewMode::Split => Comparison::Split { original, edited },
            ViewMode::Original => Comparison::Original(original),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Session {
        Session {
            original: Some(Arc::new(PixelBuffer::uniform(1, 1, [1, 1, 1]))),
            rendered: Some(Arc::new(PixelBuffer::uniform(1, 1, [2, 2, 2]))),
            latest_generation: 1,
            published_generation: 1,
            ..Default::default()
        }
    }

    #[test]
    fn new_session_is_empty_and_neutral() {
        let session = Session::default();
        assert!(session.original().is_none());
        assert!(session.rendered().is_none());
        assert!(session.params().is_neutral());
        assert_eq!(session.view_mode(), ViewMode::Split);
        assert!(!session.show_original());
        assert!(session.preview().is_none());
        assert!(session.comparison().is_none());
    }

    #[test]
    fn preview_follows_show_original() {
        let mut session = loaded();
        assert_eq!(session.preview().unwrap().data, vec![2, 2, 2]);
        session.show_original = true;
        assert_eq!(session.preview().unwrap().data, vec![1, 1, 1]);
    }

    #[test]
    fn comparison_follows_view_mode() {
        let mut session = loaded();
        assert!(matches!(session.comparison(), Some(Comparison::Split { .. })));
        session.view_mode = ViewMode::Edited;
        assert!(matches!(session.comparison(), Some(Comparison::Edited(img)) if img.data == [2, 2, 2]));
        session.view_mode = ViewMode::Original;
        assert!(matches!(session.comparison(), Some(Comparison::Original(img)) if img.data == [1, 1, 1]));
    }

    #[test]
    fn stale_render_is_not_current() {
        let mut session = loaded();
        assert!(session.is_current());
        session.latest_generation = 2;
        assert!(!session.is_current());
    }

    #[test]
    fn view_mode_serde_names() {
        assert_eq!(serde_json::to_string(&ViewMode::Split).unwrap(), "\"split\"");
        let mode: ViewMode = serde_json::from_str("\"original\"").unwrap();
        assert_eq!(mode, ViewMode::Original);
    }
}
