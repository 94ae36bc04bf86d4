use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use anyhow::Result;
use eframe::egui::Color32;

use crate::color::parse_highlight;
use crate::data::condition::{ConditionError, ConditionForm, EvalOptions};
use crate::data::filter::{compute_filtered_view, compute_highlights, HighlightMask};
use crate::data::loader::load_source;
use crate::data::model::Dataset;
use crate::data::store::RowStore;
use crate::export::{export_filename, export_rows, ExportFormat};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Export dialog state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ExportDialog {
    pub open: bool,
    pub filename: String,
    pub format: ExportFormat,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A load running on a background thread.
struct PendingLoad {
    reference: String,
    receiver: Receiver<Result<Dataset>>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset and the current filtered view.
    pub store: RowStore,

    /// Raw condition inputs as typed in the side panel.
    pub form: ConditionForm,

    /// Highlight flags for the rows of the current view (cached).
    pub highlights: HighlightMask,

    /// Source reference typed in the top bar.
    pub source_input: String,

    pub export_dialog: ExportDialog,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub highlight_color: Color32,

    pending: Vec<PendingLoad>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            highlight_color: parse_highlight(&settings.highlight_color),
            settings,
            store: RowStore::new(),
            form: ConditionForm::default(),
            highlights: HighlightMask::default(),
            source_input: String::new(),
            export_dialog: ExportDialog::default(),
            status_message: None,
            pending: Vec::new(),
        }
    }

    /// Whether a file loading operation is in progress.
    pub fn loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Ingest a newly loaded dataset and recompute highlights.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.store.load(dataset);
        self.status_message = None;
        self.refresh_highlights();
    }

    /// Load synchronously on the calling thread.
    pub fn load_now(&mut self, reference: &str) {
        match load_source(reference) {
            Ok(dataset) => self.finish_load(reference, dataset),
            Err(e) => self.fail_load(reference, e),
        }
    }

    /// Start loading on a background thread; [`AppState::poll_loads`] picks
    /// the result up. Earlier loads are not cancelled.
    pub fn start_load(&mut self, reference: String) {
        let (sender, receiver) = mpsc::channel();
        let thread_ref = reference.clone();
        std::thread::spawn(move || {
            // The receiver may be gone if the app closed meanwhile.
            let _ = sender.send(load_source(&thread_ref));
        });
        log::info!("Loading {reference}");
        self.pending.push(PendingLoad {
            reference,
            receiver,
        });
    }

    /// Apply every finished background load in arrival order. Returns true if
    /// anything changed.
    pub fn poll_loads(&mut self) -> bool {
        let mut finished = Vec::new();
        self.pending.retain(|load| match load.receiver.try_recv() {
            Ok(result) => {
                finished.push((load.reference.clone(), result));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                finished.push((
                    load.reference.clone(),
                    Err(anyhow::anyhow!("loader thread stopped unexpectedly")),
                ));
                false
            }
        });

        let changed = !finished.is_empty();
        for (reference, result) in finished {
            match result {
                Ok(dataset) => self.finish_load(&reference, dataset),
                Err(e) => self.fail_load(&reference, e),
            }
        }
        changed
    }

    fn finish_load(&mut self, reference: &str, dataset: Dataset) {
        log::info!(
            "Loaded {} rows with columns {:?} from {reference}",
            dataset.len(),
            dataset.columns
        );
        self.set_dataset(dataset);
    }

    fn fail_load(&mut self, reference: &str, e: anyhow::Error) {
        log::error!("Failed to load {reference}: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }

    /// Recompute highlight flags for the rows currently shown. Runs after
    /// every edit of the condition inputs.
    pub fn refresh_highlights(&mut self) {
        let condition = self.form.to_condition();
        self.highlights = compute_highlights(
            self.store.view_columns(),
            self.store.filtered_view(),
            &condition,
            &EvalOptions::highlight(),
            self.settings.range_origin.into(),
        );
    }

    /// Filter and project the dataset with the current inputs. On validation
    /// failure the view is left untouched.
    pub fn apply(&mut self) -> Result<(), ConditionError> {
        let condition = match self.form.validate() {
            Ok(condition) => condition,
            Err(e) => {
                log::warn!("Apply rejected: {e}");
                self.status_message = Some(e.to_string());
                return Err(e);
            }
        };

        let view = compute_filtered_view(self.store.dataset(), &condition, &EvalOptions::export());
        log::debug!(
            "Applied {condition:?}: {} of {} rows kept",
            view.len(),
            self.store.dataset().len()
        );
        self.store.replace_view(view);
        self.status_message = None;
        self.refresh_highlights();
        Ok(())
    }

    /// Show all rows again.
    pub fn reset_view(&mut self) {
        self.store.reset_view();
        self.refresh_highlights();
    }

    /// Write the current view to `dir` using the export dialog's inputs.
    pub fn export_to(&mut self, dir: &Path) -> Result<PathBuf> {
        let dialog = &self.export_dialog;
        let filename = export_filename(&dialog.filename, &self.settings.default_filename, dialog.format);
        let sheet_name = self
            .store
            .dataset()
            .sheet_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.settings.default_sheet_name.as_str());
        let result = export_rows(
            self.store.filtered_view(),
            dialog.format,
            dir,
            &filename,
            sheet_name,
        );
        match &result {
            Ok(path) => self.status_message = Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
        result
    }
}
