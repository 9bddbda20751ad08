pub mod categories;
mod context;
pub mod income;
mod options;
pub mod referral;

#[cfg(test)]
mod tests;

pub use context::{DocumentContext, RuleContext};
pub use options::{OptionRegistry, ResolvedConfig};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::transfer::domain::{AccountTransfer, Value};

/// Outputs produced by one ruleset run, merged into the applicant's
/// accumulated outputs with last-write-wins semantics.
pub type Outputs = BTreeMap<String, Value>;

/// Conventional output name holding a determination's `Y`/`N` indicator.
pub fn indicator_output(determination: &str) -> String {
    format!("Applicant {determination} Indicator")
}

/// Conventional output name holding the date a determination was made.
pub fn date_output(determination: &str) -> String {
    format!("{determination} Determination Date")
}

/// Conventional output name holding the reason an applicant was found
/// ineligible. Empty when the applicant is eligible.
pub fn reason_output(determination: &str) -> String {
    format!("{determination} Ineligibility Reason")
}

/// Outcome of evaluating one eligibility category for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    Ineligible(&'static str),
}

/// The conventional indicator/date/reason triple every category
/// determination produces.
pub fn determination_outputs(determination: &str, date: NaiveDate, verdict: Verdict) -> Outputs {
    let (indicator, reason) = match verdict {
        Verdict::Eligible => ("Y", ""),
        Verdict::Ineligible(reason) => ("N", reason),
    };
    let mut outputs = Outputs::new();
    outputs.insert(
        indicator_output(determination),
        Value::Text(indicator.to_string()),
    );
    outputs.insert(date_output(determination), Value::Date(date));
    outputs.insert(reason_output(determination), Value::Text(reason.to_string()));
    outputs
}

/// A rule unit evaluated once per applicant against an assembled context.
pub trait Ruleset: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, context: &RuleContext<'_>) -> Outputs;
}

/// A rule unit evaluated once per transfer, after every per-applicant
/// ruleset. Returns outputs keyed by the person id they belong to.
pub trait DocumentRuleset: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, context: &DocumentContext<'_>) -> BTreeMap<String, Outputs>;
}

/// Ordered rule lineup for a determination run.
///
/// Per-applicant rulesets run in lineup order for each applicant in document
/// order. Each ruleset sees a context rebuilt from the transfer, so outputs
/// written by earlier rulesets are visible to later ones, and a later write
/// to the same output name replaces the earlier value. Reordering the lineup
/// is therefore an observable change.
pub struct RulePipeline {
    rulesets: Vec<Box<dyn Ruleset>>,
    document_rulesets: Vec<Box<dyn DocumentRuleset>>,
}

impl RulePipeline {
    pub fn new(
        rulesets: Vec<Box<dyn Ruleset>>,
        document_rulesets: Vec<Box<dyn DocumentRuleset>>,
    ) -> Self {
        Self {
            rulesets,
            document_rulesets,
        }
    }

    /// The standard Medicaid/CHIP lineup: the five MAGI categories, the CHIP
    /// category, the non-MAGI referral, and the household income rollup.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Box::new(categories::ParentCaretakerCategory),
                Box::new(categories::PregnancyCategory),
                Box::new(categories::ChildCategory),
                Box::new(categories::AdultGroupCategory),
                Box::new(categories::OptionalTargetedLowIncomeChild),
                Box::new(categories::ChipTargetedLowIncomeChild),
                Box::new(referral::NonMagiReferral),
            ],
            vec![Box::new(income::HouseholdIncome)],
        )
    }

    /// Runs the lineup over every applicant, threading outputs through the
    /// transfer as it goes.
    pub fn execute(
        &self,
        transfer: &mut AccountTransfer,
        config: &ResolvedConfig,
        determination_date: NaiveDate,
    ) {
        for index in transfer.applicant_indices() {
            for ruleset in &self.rulesets {
                let produced = {
                    let Some(context) =
                        RuleContext::assemble(transfer, index, config, determination_date)
                    else {
                        break;
                    };
                    debug!(
                        ruleset = ruleset.name(),
                        applicant = %context.applicant_id(),
                        "running ruleset"
                    );
                    ruleset.run(&context)
                };
                if let Some(role) = transfer.people[index.0].applicant.as_mut() {
                    role.outputs.extend(produced);
                }
            }
        }

        for stage in &self.document_rulesets {
            debug!(ruleset = stage.name(), "running document ruleset");
            let produced = {
                let context = DocumentContext::new(transfer, config, determination_date);
                stage.run(&context)
            };
            for (person_id, outputs) in produced {
                let Some(person) = transfer
                    .people
                    .iter_mut()
                    .find(|person| person.person_id == person_id)
                else {
                    continue;
                };
                if let Some(role) = person.applicant.as_mut() {
                    role.outputs.extend(outputs);
                }
            }
        }
    }
}
