//! Application state management
//!
//! Single source of truth for the studio. Every mutation funnels through
//! here: style edits, photo uploads, preview scheduling, and export requests.

use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::asset::{is_supported_format, PhotoAsset};
use crate::color::Rgba;
use crate::composition::CompositionModel;
use crate::config::Config;
use crate::perf_monitor::PerfMetrics;
use crate::render::preview::PreviewConfig;
use crate::style::{StyleEdit, StyleState};
use crate::textutil::{display_width, truncate_to_width};
use crate::terminal_capabilities::TerminalCapabilities;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Which widget is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedWidget {
    #[default]
    StylePanel,
    Preview,
}

impl FocusedWidget {
    pub fn next(&self) -> Self {
        match self {
            FocusedWidget::StylePanel => FocusedWidget::Preview,
            FocusedWidget::Preview => FocusedWidget::StylePanel,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Modal text prompts layered over the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path of a photo to load
    LoadPath,
    /// Hex color for the caption bar fill
    FooterColor,
    /// Hex color for the caption text
    TextColor,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::LoadPath => "Load photo",
            PromptKind::FooterColor => "Bar color (#rrggbb or #rrggbbaa)",
            PromptKind::TextColor => "Text color (#rrggbb or #rrggbbaa)",
        }
    }
}

/// An in-flight modal prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
}

/// Style panel rows, top to bottom
pub const STYLE_SETTINGS: [&str; 7] = [
    "Caption",
    "Bar Color",
    "Text Color",
    "Bold",
    "Italic",
    "Font Size",
    "Font",
];

/// Main application state
pub struct AppState {
    pub focus: FocusedWidget,
    pub show_help: bool,
    pub should_quit: bool,

    // The poster itself
    pub style: StyleState,
    pub photo: Option<PhotoAsset>,
    pub composition: CompositionModel,

    // Style panel navigation
    pub selected_setting: usize,
    pub editing_caption: bool,

    // Modal prompt ([L] / color entry)
    pub prompt: Option<Prompt>,

    // Preview output
    pub preview_content: Option<String>,
    pub preview_scroll: usize,

    // Staleness tracking for background work
    upload_generation: u64,
    preview_sequence: u64,
    pub is_decoding: bool,
    pub is_rendering: bool,
    pub is_exporting: bool,

    pub status_message: String,
    pub status_is_error: bool,

    pub terminal_size: (u16, u16),
    pub capabilities: TerminalCapabilities,

    pub perf_metrics: PerfMetrics,
    pub config: Config,

    worker_tx: Sender<WorkerMessage>,
}

impl AppState {
    pub fn new(
        config: Config,
        capabilities: TerminalCapabilities,
        worker_tx: Sender<WorkerMessage>,
    ) -> Self {
        let (width, height) = capabilities.size;
        let style = config.style.to_style_state();

        Self {
            focus: FocusedWidget::default(),
            show_help: false,
            should_quit: false,

            style,
            photo: None,
            composition: CompositionModel::default(),

            selected_setting: 0,
            editing_caption: false,

            prompt: None,

            preview_content: None,
            preview_scroll: 0,

            upload_generation: 0,
            preview_sequence: 0,
            is_decoding: false,
            is_rendering: false,
            is_exporting: false,

            status_message: "Ready - Press [?] for help".to_string(),
            status_is_error: false,

            terminal_size: (width, height),
            capabilities,

            perf_metrics: PerfMetrics::new(),
            config,

            worker_tx,
        }
    }

    /// Update terminal size on resize
    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    /// Set status message
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }

    /// Apply a single style edit and reschedule the preview.
    pub fn apply_style_edit(&mut self, edit: StyleEdit) {
        self.style = self.style.apply(edit);
        self.recompose();
    }

    /// Re-derive the poster plan from photo and style, then queue a preview.
    pub fn recompose(&mut self) {
        self.composition = CompositionModel::derive(self.photo.as_ref(), &self.style);
        self.trigger_preview();
    }

    /// Queue a preview rasterization for the current plan.
    ///
    /// Each request carries a fresh sequence number; responses for older
    /// sequences are dropped so a slow render never overwrites a newer one.
    pub fn trigger_preview(&mut self) {
        let Some(plan) = self.composition.poster.clone() else {
            self.preview_content = None;
            return;
        };

        self.preview_sequence += 1;
        self.is_rendering = true;

        let config = PreviewConfig {
            columns: self.preview_columns(),
            color_mode: self.config.preview.color_mode,
        };

        let _ = self.worker_tx.send(WorkerMessage::PreviewRequest {
            plan,
            config,
            sequence: self.preview_sequence,
        });
    }

    /// Preview width in character cells, bounded by the terminal.
    fn preview_columns(&self) -> usize {
        let panel_width = (self.terminal_size.0 as usize).saturating_sub(34);
        self.config.preview.columns.min(panel_width.max(20))
    }

    /// Start decoding a photo in the background.
    ///
    /// Bumps the upload generation first, so any decode still in flight for
    /// a previous path resolves as stale and is discarded on arrival.
    pub fn request_photo_load(&mut self, path: PathBuf) {
        if !is_supported_format(&path) {
            self.set_status("Unsupported image format", true);
            return;
        }

        self.upload_generation += 1;
        self.is_decoding = true;
        self.set_status(&format!("Loading {}...", path.display()), false);

        let _ = self.worker_tx.send(WorkerMessage::DecodeRequest {
            path,
            generation: self.upload_generation,
        });
    }

    /// Queue a PNG export of the current poster.
    ///
    /// Without a photo there is nothing to compose, so this is a no-op
    /// beyond a status hint.
    pub fn request_export(&mut self) {
        let Some(plan) = self.composition.poster.clone() else {
            self.set_status("Load a photo first - Press [L]", false);
            return;
        };

        if self.is_exporting {
            return;
        }

        self.is_exporting = true;
        self.set_status("Exporting...", false);

        let _ = self.worker_tx.send(WorkerMessage::ExportRequest {
            plan,
            scale: self.config.export.scale,
            path: PathBuf::from(&self.config.export.filename),
        });
    }

    /// Handle response from worker thread
    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::DecodeComplete {
                image,
                path,
                generation,
                decode_time,
            } => {
                if generation != self.upload_generation {
                    // A newer upload superseded this decode
                    return;
                }
                self.is_decoding = false;

                let filename = path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "photo".to_string());

                self.photo = Some(PhotoAsset::from_arc(image, Some(path), generation));
                self.set_status(
                    &format!("Loaded {} in {}ms", filename, decode_time),
                    false,
                );
                self.recompose();
            }
            WorkerResponse::DecodeFailed {
                generation, error, ..
            } => {
                if generation != self.upload_generation {
                    return;
                }
                self.is_decoding = false;
                self.set_status(&format!("Failed to load: {}", error), true);
            }
            WorkerResponse::PreviewComplete {
                output,
                sequence,
                render_time,
            } => {
                if sequence != self.preview_sequence {
                    return;
                }
                self.is_rendering = false;
                self.preview_content = Some(output);
                self.preview_scroll = 0;
                self.perf_metrics
                    .record_raster(std::time::Duration::from_millis(render_time));
            }
            WorkerResponse::PreviewFailed(err) => {
                self.is_rendering = false;
                self.set_status(&format!("Render error: {}", err), true);
            }
            WorkerResponse::ExportComplete { path, export_time } => {
                self.is_exporting = false;
                self.perf_metrics
                    .record_export(std::time::Duration::from_millis(export_time));
                self.set_status(
                    &format!("Exported {} in {}ms", path.display(), export_time),
                    false,
                );
            }
            WorkerResponse::ExportFailed(err) => {
                self.is_exporting = false;
                self.set_status(&format!("Export failed: {}", err), true);
            }
        }
    }

    /// Navigate to next setting in the style panel
    pub fn next_setting(&mut self) {
        self.selected_setting = (self.selected_setting + 1) % STYLE_SETTINGS.len();
    }

    /// Navigate to previous setting in the style panel
    pub fn prev_setting(&mut self) {
        self.selected_setting = if self.selected_setting == 0 {
            STYLE_SETTINGS.len() - 1
        } else {
            self.selected_setting - 1
        };
    }

    /// Current value of a style panel row, for display
    pub fn setting_value(&self, index: usize) -> String {
        match index {
            0 => {
                if self.style.caption.is_empty() {
                    "[Type here...]".to_string()
                } else if display_width(&self.style.caption) > 16 {
                    format!("{}...", truncate_to_width(&self.style.caption, 13))
                } else {
                    self.style.caption.clone()
                }
            }
            1 => self.style.footer_color.to_hex(),
            2 => self.style.text_color.to_hex(),
            3 => if self.style.bold { "On" } else { "Off" }.to_string(),
            4 => if self.style.italic { "On" } else { "Off" }.to_string(),
            5 => format!("{}px", self.style.font_size_px),
            6 => self.style.font.name().to_string(),
            _ => String::new(),
        }
    }

    /// Start a modal prompt
    pub fn start_prompt(&mut self, kind: PromptKind) {
        let input = match kind {
            PromptKind::FooterColor => self.style.footer_color.to_hex(),
            PromptKind::TextColor => self.style.text_color.to_hex(),
            PromptKind::LoadPath => String::new(),
        };
        self.prompt = Some(Prompt {
            kind,
            input,
            error: None,
        });
        self.set_status(kind.title(), false);
    }

    /// Cancel the active prompt
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.set_status("Cancelled", false);
    }

    /// Submit the active prompt
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let input = prompt.input.trim().to_string();

        match prompt.kind {
            PromptKind::LoadPath => {
                if input.is_empty() {
                    self.prompt = Some(Prompt {
                        error: Some("Path is empty".to_string()),
                        ..prompt
                    });
                    return;
                }
                let path = PathBuf::from(&input);
                if !path.exists() {
                    self.prompt = Some(Prompt {
                        error: Some("File not found".to_string()),
                        ..prompt
                    });
                    return;
                }
                self.request_photo_load(path);
            }
            PromptKind::FooterColor | PromptKind::TextColor => match Rgba::parse_hex(&input) {
                Some(color) => {
                    let edit = if prompt.kind == PromptKind::FooterColor {
                        StyleEdit::SetFooterColor(color)
                    } else {
                        StyleEdit::SetTextColor(color)
                    };
                    self.apply_style_edit(edit);
                    self.set_status(&format!("Color set to {}", input), false);
                }
                None => {
                    self.prompt = Some(Prompt {
                        error: Some("Invalid hex color".to_string()),
                        ..prompt
                    });
                }
            },
        }
    }

    /// Scroll preview up
    pub fn scroll_up(&mut self, amount: usize) {
        self.preview_scroll = self.preview_scroll.saturating_sub(amount);
    }

    /// Scroll preview down
    pub fn scroll_down(&mut self, amount: usize) {
        if let Some(ref content) = self.preview_content {
            let line_count = content.lines().count();
            self.preview_scroll = (self.preview_scroll + amount).min(line_count.saturating_sub(1));
        }
    }

    /// Fold the closing style back into the config for persistence.
    pub fn snapshot_config(&mut self) {
        self.config.style = crate::config::StylePreferences::from_style_state(&self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_capabilities::TerminalCapabilities;
    use crossbeam_channel::unbounded;
    use image::DynamicImage;
    use image::RgbImage;
    use std::sync::Arc;

    fn test_state() -> (AppState, crossbeam_channel::Receiver<WorkerMessage>) {
        let (tx, rx) = unbounded();
        let state = AppState::new(Config::default(), TerminalCapabilities::default(), tx);
        (state, rx)
    }

    fn test_image() -> Arc<DynamicImage> {
        Arc::new(DynamicImage::ImageRgb8(RgbImage::new(40, 30)))
    }

    #[test]
    fn test_export_without_photo_is_noop() {
        let (mut state, rx) = test_state();
        state.request_export();
        assert!(!state.is_exporting);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_style_edit_schedules_preview_only_with_photo() {
        let (mut state, rx) = test_state();

        state.apply_style_edit(StyleEdit::ToggleBold);
        assert!(state.style.bold);
        assert!(rx.try_recv().is_err());

        state.photo = Some(PhotoAsset::from_arc(test_image(), None, 1));
        state.apply_style_edit(StyleEdit::ToggleItalic);
        assert!(matches!(
            rx.try_recv(),
            Ok(WorkerMessage::PreviewRequest { .. })
        ));
    }

    #[test]
    fn test_stale_decode_is_discarded() {
        let (mut state, _rx) = test_state();

        state.request_photo_load(PathBuf::from("first.png"));
        state.request_photo_load(PathBuf::from("second.png"));

        // The decode for the first upload arrives late
        state.handle_worker_response(WorkerResponse::DecodeComplete {
            image: test_image(),
            path: PathBuf::from("first.png"),
            generation: 1,
            decode_time: 5,
        });
        assert!(state.photo.is_none());
        assert!(state.is_decoding);

        state.handle_worker_response(WorkerResponse::DecodeComplete {
            image: test_image(),
            path: PathBuf::from("second.png"),
            generation: 2,
            decode_time: 5,
        });
        let photo = state.photo.as_ref().unwrap();
        assert_eq!(photo.generation, 2);
        assert_eq!(photo.file_name().as_deref(), Some("second.png"));
        assert!(!state.is_decoding);
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let (mut state, _rx) = test_state();
        state.photo = Some(PhotoAsset::from_arc(test_image(), None, 1));
        state.recompose();
        state.recompose();

        state.handle_worker_response(WorkerResponse::PreviewComplete {
            output: "old".to_string(),
            sequence: 1,
            render_time: 1,
        });
        assert!(state.preview_content.is_none());

        state.handle_worker_response(WorkerResponse::PreviewComplete {
            output: "new".to_string(),
            sequence: 2,
            render_time: 1,
        });
        assert_eq!(state.preview_content.as_deref(), Some("new"));
    }

    #[test]
    fn test_unsupported_format_rejected_up_front() {
        let (mut state, rx) = test_state();
        state.request_photo_load(PathBuf::from("notes.txt"));
        assert!(state.status_is_error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_color_prompt_applies_edit() {
        let (mut state, _rx) = test_state();
        state.start_prompt(PromptKind::TextColor);
        state.prompt.as_mut().unwrap().input = "#ff0000".to_string();
        state.submit_prompt();

        assert!(state.prompt.is_none());
        assert_eq!(state.style.text_color, Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_bad_color_prompt_keeps_prompt_open() {
        let (mut state, _rx) = test_state();
        state.start_prompt(PromptKind::FooterColor);
        state.prompt.as_mut().unwrap().input = "#zz".to_string();
        state.submit_prompt();

        let prompt = state.prompt.as_ref().unwrap();
        assert!(prompt.error.is_some());
    }

    #[test]
    fn test_setting_navigation_wraps() {
        let (mut state, _rx) = test_state();
        state.prev_setting();
        assert_eq!(state.selected_setting, STYLE_SETTINGS.len() - 1);
        state.next_setting();
        assert_eq!(state.selected_setting, 0);
    }
}
