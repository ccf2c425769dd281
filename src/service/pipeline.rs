use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use log::{error, info};

use crate::config::Settings;
use crate::error::PipelineError;
use crate::models::image::ImageInput;
use crate::service::normalizer;
use crate::service::openai_service::VisionClient;
use crate::service::prompt;
use crate::service::synthesizer::{SynthesisPolicy, Synthesizer};
use crate::service::transcription;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub calendar: Vec<u8>,
    pub event_count: usize,
    pub rejected_entries: usize,
    pub skipped_events: usize,
}

/// Read-only state shared by every request. Built once at startup and
/// handed around behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    prompt: String,
    timezone: Tz,
    synthesizer: Synthesizer,
}

impl PipelineContext {
    pub fn new(prompt: String, timezone: Tz, policy: SynthesisPolicy) -> Self {
        Self {
            prompt,
            timezone,
            synthesizer: Synthesizer::new(policy),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            prompt::load_prompt(&settings.prompt_file),
            settings.timezone,
            settings.policy.clone(),
        )
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// The static prompt plus today's date, so the model can place
    /// weekday-only plans in the right week.
    pub fn request_prompt(&self, today: NaiveDate) -> String {
        format!(
            "{}\n\nHeutiges Datum: {} ({}, {})",
            self.prompt,
            today.format("%Y-%m-%d"),
            today.format("%A"),
            self.timezone.name()
        )
    }

    /// Model text to calendar bytes. Only an unparseable transcription is
    /// an error; bad entries are dropped or skipped along the way.
    pub fn convert_transcription(&self, text: &str) -> Result<PipelineOutput, PipelineError> {
        let raw = transcription::parse_transcription(text)?;
        let normalized = normalizer::normalize_report(&raw);
        let report = self.synthesizer.synthesize(&normalized.entries);

        info!(
            "Built calendar with {} event(s), {} entr(ies) rejected, {} skipped",
            report.document.len(),
            normalized.rejected.len(),
            report.skipped.len()
        );

        Ok(PipelineOutput {
            event_count: report.document.len(),
            calendar: report.document.to_bytes(),
            rejected_entries: normalized.rejected.len(),
            skipped_events: report.skipped.len(),
        })
    }

    pub async fn process_image(
        &self,
        client: &dyn VisionClient,
        image: &ImageInput,
    ) -> Result<PipelineOutput, PipelineError> {
        let prompt = self.request_prompt(self.today());
        let text = client.transcribe(&prompt, image).await.map_err(|err| {
            error!("Vision model call failed: {}", err);
            PipelineError::Model(err.to_string())
        })?;
        self.convert_transcription(&text).inspect_err(|err| {
            error!("Could not use model output: {}", err);
        })
    }
}
