pub mod domain;
mod emitter;
mod reader;
pub mod variables;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountTransfer, ApplicantRole, Attributes, Household, Person, PersonIndex, Relationship,
    TaxReturn, Value,
};
pub use variables::{standard_variables, ReadError, VariableDef, VariableGroup, VariableKind};
pub use views::TransferSummary;

use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use tracing::info;

use crate::document::TransferDocument;
use crate::error::AppError;
use crate::rules::{OptionRegistry, ResolvedConfig, RulePipeline};

/// Controls how much of the evaluated transfer is serialized back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The envelope plus per-applicant eligibility sections.
    DeterminationOnly,
    /// Additionally serializes the people and households the transfer listed.
    FullApplication,
}

/// End-to-end determination flow: parse the document, build the graph,
/// resolve policy for the recipient state, run the rule lineup, and
/// serialize the response.
pub struct DeterminationService {
    registry: OptionRegistry,
    pipeline: RulePipeline,
    variables: Vec<VariableDef>,
}

impl DeterminationService {
    pub fn new(
        registry: OptionRegistry,
        pipeline: RulePipeline,
        variables: Vec<VariableDef>,
    ) -> Self {
        Self {
            registry,
            pipeline,
            variables,
        }
    }

    /// Standard lineup over the standard variable table with nationwide
    /// option defaults.
    pub fn standard() -> Self {
        Self::new(
            OptionRegistry::standard(),
            RulePipeline::standard(),
            standard_variables(),
        )
    }

    /// Processes one account-transfer document and returns the response XML.
    pub fn process(&self, raw: &str, mode: ResponseMode) -> Result<String, AppError> {
        self.process_at(raw, mode, Utc::now().naive_utc())
    }

    /// Like [`Self::process`] with the activity timestamp supplied by the
    /// caller. Repeated runs over the same document and timestamp produce
    /// byte-identical responses.
    pub fn process_at(
        &self,
        raw: &str,
        mode: ResponseMode,
        generated_at: NaiveDateTime,
    ) -> Result<String, AppError> {
        let (transfer, _) = self.evaluate_at(raw, generated_at)?;
        Ok(emitter::emit_response(&transfer, mode, generated_at)?)
    }

    /// Reads a transfer document from disk and processes it.
    pub fn process_path(
        &self,
        path: impl AsRef<Path>,
        mode: ResponseMode,
    ) -> Result<String, AppError> {
        let raw = std::fs::read_to_string(path)?;
        self.process(&raw, mode)
    }

    /// Runs the pipeline and hands back the evaluated graph with its
    /// resolved configuration instead of a serialized response.
    pub fn evaluate_at(
        &self,
        raw: &str,
        generated_at: NaiveDateTime,
    ) -> Result<(AccountTransfer, ResolvedConfig), AppError> {
        let document = TransferDocument::parse(raw)?;
        let mut transfer = AccountTransfer::read(&document, &self.variables)?;
        let config = self.registry.resolve(&transfer.state);
        info!(
            state = %transfer.state,
            people = transfer.people.len(),
            applicants = transfer.applicant_count(),
            "evaluating account transfer"
        );
        self.pipeline
            .execute(&mut transfer, &config, generated_at.date());
        Ok((transfer, config))
    }

    /// Diagnostic summary of the evaluated transfer.
    pub fn summarize(&self, raw: &str) -> Result<TransferSummary, AppError> {
        self.summarize_at(raw, Utc::now().naive_utc())
    }

    pub fn summarize_at(
        &self,
        raw: &str,
        generated_at: NaiveDateTime,
    ) -> Result<TransferSummary, AppError> {
        let (transfer, config) = self.evaluate_at(raw, generated_at)?;
        Ok(transfer.summary(&config))
    }
}
