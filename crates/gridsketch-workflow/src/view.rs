//! View implementations for headless use and testing.

use std::sync::{Arc, Mutex};

use geojson::FeatureCollection;
use gridsketch_core::models::{AoiStats, ControlSet, SegmentParams};

use crate::ports::{Overlay, WorkbenchView};

/// View that drops everything; for contexts with no presentation at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl WorkbenchView for NullView {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn show_stats(&self, _stats: &AoiStats) {}
    fn clear_stats(&self) {}
    fn upsert_overlay(&self, _overlay: Overlay, _data: &FeatureCollection, _visible: bool) {}
    fn remove_overlay(&self, _overlay: Overlay) {}
    fn set_overlay_visibility(&self, _overlay: Overlay, _visible: bool) {}
    fn show_download(&self, _url: &str) {}
    fn clear_download(&self) {}
    fn reset_inputs(&self, _params: &SegmentParams) {}
    fn controls_changed(&self, _controls: &ControlSet) {}
}

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

/// One recorded view call
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Message { level: MessageLevel, text: String },
    StatsShown(AoiStats),
    StatsCleared,
    OverlayUpserted { overlay: Overlay, cell_count: usize, visible: bool },
    OverlayRemoved(Overlay),
    OverlayVisibility { overlay: Overlay, visible: bool },
    DownloadShown(String),
    DownloadCleared,
    InputsReset(SegmentParams),
    ControlsChanged(ControlSet),
}

/// View that records every call, for asserting on controller output in
/// tests. Clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Everything recorded so far, in call order
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drop the recorded history
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// All error-level message texts
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Message { level: MessageLevel::Error, text } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// The most recently pushed control set
    pub fn last_controls(&self) -> Option<ControlSet> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::ControlsChanged(controls) => Some(controls),
                _ => None,
            })
    }
}

impl WorkbenchView for RecordingView {
    fn info(&self, message: &str) {
        self.record(ViewEvent::Message {
            level: MessageLevel::Info,
            text: message.to_string(),
        });
    }

    fn success(&self, message: &str) {
        self.record(ViewEvent::Message {
            level: MessageLevel::Success,
            text: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.record(ViewEvent::Message {
            level: MessageLevel::Error,
            text: message.to_string(),
        });
    }

    fn show_stats(&self, stats: &AoiStats) {
        self.record(ViewEvent::StatsShown(stats.clone()));
    }

    fn clear_stats(&self) {
        self.record(ViewEvent::StatsCleared);
    }

    fn upsert_overlay(&self, overlay: Overlay, data: &FeatureCollection, visible: bool) {
        self.record(ViewEvent::OverlayUpserted {
            overlay,
            cell_count: data.features.len(),
            visible,
        });
    }

    fn remove_overlay(&self, overlay: Overlay) {
        self.record(ViewEvent::OverlayRemoved(overlay));
    }

    fn set_overlay_visibility(&self, overlay: Overlay, visible: bool) {
        self.record(ViewEvent::OverlayVisibility { overlay, visible });
    }

    fn show_download(&self, url: &str) {
        self.record(ViewEvent::DownloadShown(url.to_string()));
    }

    fn clear_download(&self) {
        self.record(ViewEvent::DownloadCleared);
    }

    fn reset_inputs(&self, params: &SegmentParams) {
        self.record(ViewEvent::InputsReset(*params));
    }

    fn controls_changed(&self, controls: &ControlSet) {
        self.record(ViewEvent::ControlsChanged(*controls));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_view_preserves_order() {
        let view = RecordingView::new();
        view.info("first");
        view.error("second");
        view.clear_stats();

        let events = view.events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            ViewEvent::Message { level: MessageLevel::Info, text: "first".to_string() }
        );
        assert_eq!(view.errors(), vec!["second".to_string()]);
    }

    #[test]
    fn test_clones_share_the_log() {
        let view = RecordingView::new();
        let handle = view.clone();
        handle.success("done");
        assert_eq!(view.events().len(), 1);
    }

    #[test]
    fn test_last_controls() {
        let view = RecordingView::new();
        assert!(view.last_controls().is_none());

        view.controls_changed(&ControlSet::disabled());
        let enabled = ControlSet { finish: true, ..ControlSet::disabled() };
        view.controls_changed(&enabled);

        assert_eq!(view.last_controls(), Some(enabled));
    }
}
