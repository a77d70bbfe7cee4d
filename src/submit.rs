use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::form::FormState;
use crate::models::Submission;
use crate::validate::{validate, ErrorMap};

#[derive(Debug, Clone)]
pub enum Outcome {
    Accepted(Submission),
    Rejected,
}

pub struct SubmissionHandler {
    errors: ErrorMap,
    output: Option<PathBuf>,
}

impl SubmissionHandler {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            errors: ErrorMap::default(),
            output,
        }
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn submit(&mut self, form: &FormState) -> Outcome {
        self.errors = validate(form.record());

        if !self.errors.is_empty() {
            let failing: Vec<&str> = self.errors.fields().map(|f| f.wire_name()).collect();
            log::debug!("Submit rejected: {}", failing.join(", "));
            return Outcome::Rejected;
        }

        let submission = Submission::new(form.record().clone());
        log::info!(
            "Application accepted for {} ({})",
            submission.record.full_name.trim(),
            submission
                .record
                .applying_for
                .map(|p| p.to_string())
                .unwrap_or_default()
        );

        if let Some(path) = &self.output {
            match write_submission(&submission, path) {
                Ok(()) => log::info!("Submission written to {}", path.display()),
                Err(e) => log::error!("{:#}", e),
            }
        }

        Outcome::Accepted(submission)
    }
}

pub fn write_submission(submission: &Submission, path: &Path) -> Result<()> {
    let json = submission
        .to_pretty_json()
        .context("Failed to serialize submission")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write submission to {}", path.display()))
}
