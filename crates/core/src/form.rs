//! View state for the report intake form.
//!
//! Holds everything the page used to keep in DOM globals: field values, the
//! selected photo, whether the preview and success panel are shown, and
//! whether the submit control is enabled. Only one submission may be in
//! flight per form; this is enforced by the submit control being disabled
//! while [`FormPhase::Submitting`], not by a lock.

use crate::error::CoreError;
use crate::media::{self, EvidenceMeta};
use crate::submission::SubmissionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded { unique_code: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportForm {
    pub location: String,
    pub category: String,
    pub description: String,
    evidence: Option<EvidenceMeta>,
    preview_visible: bool,
    phase: FormPhase,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportForm {
    pub fn new() -> Self {
        Self {
            location: String::new(),
            category: String::new(),
            description: String::new(),
            evidence: None,
            preview_visible: false,
            phase: FormPhase::Editing,
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn evidence(&self) -> Option<&EvidenceMeta> {
        self.evidence.as_ref()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    /// The form is hidden once a submission succeeds, until [`Self::reset`].
    pub fn form_visible(&self) -> bool {
        !matches!(self.phase, FormPhase::Succeeded { .. })
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(self.phase, FormPhase::Editing | FormPhase::Failed { .. })
    }

    /// Tracking code to display in the success panel.
    pub fn displayed_code(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Succeeded { unique_code } => Some(unique_code),
            _ => None,
        }
    }

    /// Alert text for the last failed submission.
    pub fn alert(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Handle a change of the file input.
    ///
    /// A rejected file clears the selection and hides the preview.
    pub fn select_evidence(&mut self, file: Option<EvidenceMeta>) -> Result<(), CoreError> {
        let Some(file) = file else {
            self.evidence = None;
            self.preview_visible = false;
            return Ok(());
        };

        if let Err(e) = media::check_evidence(&file) {
            self.evidence = None;
            self.preview_visible = false;
            return Err(e);
        }

        self.evidence = Some(file);
        self.preview_visible = true;
        Ok(())
    }

    /// Disable the submit control for the duration of a submission.
    pub fn begin_submit(&mut self) -> Result<(), CoreError> {
        match self.phase {
            FormPhase::Submitting => Err(CoreError::Conflict(
                "A submission is already in progress".into(),
            )),
            FormPhase::Succeeded { .. } => Err(CoreError::Conflict(
                "The report was already submitted; reset the form first".into(),
            )),
            FormPhase::Editing | FormPhase::Failed { .. } => {
                self.phase = FormPhase::Submitting;
                Ok(())
            }
        }
    }

    /// Record the outcome of the submission started by [`Self::begin_submit`].
    pub fn finish(&mut self, outcome: &Result<String, SubmissionError>) {
        self.phase = match outcome {
            Ok(code) => FormPhase::Succeeded {
                unique_code: code.clone(),
            },
            Err(e) => FormPhase::Failed {
                message: e.user_message(),
            },
        };
    }

    pub fn dismiss_alert(&mut self) {
        if matches!(self.phase, FormPhase::Failed { .. }) {
            self.phase = FormPhase::Editing;
        }
    }

    /// Return to the initial empty form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::media::MAX_EVIDENCE_BYTES;
    use crate::tracking_code::CodeGenerationError;

    fn photo(media_type: &str, size: u64) -> EvidenceMeta {
        EvidenceMeta {
            file_name: "foto.png".to_string(),
            media_type: media_type.to_string(),
            size,
        }
    }

    #[test]
    fn new_form_is_empty_and_editable() {
        let form = ReportForm::new();
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert!(form.submit_enabled());
        assert!(form.form_visible());
        assert!(!form.preview_visible());
        assert!(form.evidence().is_none());
    }

    #[test]
    fn selecting_an_image_shows_preview() {
        let mut form = ReportForm::new();
        form.select_evidence(Some(photo("image/png", 1024))).unwrap();

        assert!(form.preview_visible());
        assert_eq!(form.evidence().unwrap().media_type, "image/png");
    }

    #[test]
    fn rejected_file_clears_selection() {
        let mut form = ReportForm::new();
        form.select_evidence(Some(photo("image/png", 1024))).unwrap();

        let result = form.select_evidence(Some(photo("image/png", MAX_EVIDENCE_BYTES + 1)));

        assert_matches!(result, Err(CoreError::Validation(_)));
        assert!(form.evidence().is_none());
        assert!(!form.preview_visible());

        assert!(form
            .select_evidence(Some(photo("text/plain", 10)))
            .is_err());
        assert!(form.evidence().is_none());
    }

    #[test]
    fn clearing_the_input_hides_preview() {
        let mut form = ReportForm::new();
        form.select_evidence(Some(photo("image/png", 1024))).unwrap();
        form.select_evidence(None).unwrap();

        assert!(!form.preview_visible());
        assert!(form.evidence().is_none());
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut form = ReportForm::new();
        form.begin_submit().unwrap();

        assert!(!form.submit_enabled());
        assert_matches!(form.begin_submit(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn success_hides_form_and_shows_code() {
        let mut form = ReportForm::new();
        form.begin_submit().unwrap();
        form.finish(&Ok("PSJ0A1B2C3".to_string()));

        assert!(!form.form_visible());
        assert_eq!(form.displayed_code(), Some("PSJ0A1B2C3"));
        assert_matches!(form.begin_submit(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn failure_shows_alert_and_re_enables_submit() {
        let mut form = ReportForm::new();
        form.begin_submit().unwrap();
        form.finish(&Err(SubmissionError::from(
            CodeGenerationError::ExhaustedAttempts { attempts: 5 },
        )));

        assert!(form.submit_enabled());
        assert!(form.form_visible());
        assert!(form.alert().unwrap().contains("Please try again."));

        form.dismiss_alert();
        assert_eq!(form.phase(), &FormPhase::Editing);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut form = ReportForm::new();
        form.location = "Av. Siempre Viva 123".to_string();
        form.select_evidence(Some(photo("image/jpeg", 2048))).unwrap();
        form.begin_submit().unwrap();
        form.finish(&Ok("PSJ0A1B2C3".to_string()));

        form.reset();

        assert_eq!(form, ReportForm::new());
        assert!(form.form_visible());
        assert!(form.displayed_code().is_none());
    }
}
