// src/page/mod.rs
// Page Module - wires file selection, submission and the segment list to a front end

mod status;
mod ui;

pub use status::{Status, Tone, PROCESSING_LABEL, SELECT_FILE_PROMPT, SUBMIT_LABEL};
pub use ui::{PageUi, ProgressIndicator, SegmentContainer, StatusRegion, SubmitControl};

use crate::render::{
    ClickOrigin, Navigator, Playback, SegmentList, SegmentRenderer, ViewError, Viewport,
};
use crate::upload::{UploadController, UploadOutcome, UploadRequest};

pub struct UploadPage<U: PageUi> {
    controller: UploadController,
    renderer: SegmentRenderer,
    ui: U,
    selected: Option<UploadRequest>,
    segments: SegmentList,
}

impl<U: PageUi> UploadPage<U> {
    pub fn new(controller: UploadController, renderer: SegmentRenderer, mut ui: U) -> Self {
        ui.set_enabled(true, SUBMIT_LABEL);
        Self {
            controller,
            renderer,
            ui,
            selected: None,
            segments: SegmentList::default(),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn selected(&self) -> Option<&UploadRequest> {
        self.selected.as_ref()
    }

    /// Segments from the last successful submission
    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    pub fn select_file(&mut self, file: Option<UploadRequest>) {
        if let Some(file) = &file {
            tracing::info!("File selected: {}", file.describe());
            self.ui.set_status(&Status::selected(file));
            self.ui.set_percent(0.0);
        }
        self.selected = file;
    }

    /// Run one submission for the selected file. Whatever the outcome, the
    /// page ends idle with the submit control enabled again.
    pub async fn submit(&mut self) -> UploadOutcome {
        let Some(file) = self.selected.as_ref() else {
            self.ui.prompt(SELECT_FILE_PROMPT);
            return self.controller.submit(None, |_| {}).await;
        };

        self.ui.show();
        self.ui.set_percent(0.0);
        self.ui.set_status(&Status::uploading(file));
        self.ui.set_enabled(false, PROCESSING_LABEL);

        let ui = &mut self.ui;
        let outcome = self
            .controller
            .submit(Some(file), |progress| {
                if let Some(percent) = progress.percent() {
                    ui.set_percent(percent);
                }
            })
            .await;

        match &outcome {
            UploadOutcome::Success { segments } => {
                self.segments = self.renderer.render(segments);
                self.ui.display(&self.segments);
                self.ui.set_status(&Status::Complete);
            }
            UploadOutcome::Failure(error) => {
                self.ui.set_status(&Status::from_error(error));
            }
        }

        self.ui.hide();
        self.ui.set_enabled(true, SUBMIT_LABEL);

        outcome
    }

    pub fn activate_segment(
        &mut self,
        index: usize,
        playback: &mut dyn Playback,
        viewport: &mut dyn Viewport,
    ) -> Result<(), ViewError> {
        self.segments.activate(index, playback, viewport)?;
        self.ui.display(&self.segments);
        Ok(())
    }

    pub fn click_ad(
        &mut self,
        segment: usize,
        ad: usize,
        origin: ClickOrigin,
        navigator: &mut dyn Navigator,
    ) -> Result<bool, ViewError> {
        let navigated = self.segments.click_ad(segment, ad, origin, navigator)?;
        self.ui.display(&self.segments);
        Ok(navigated)
    }
}
