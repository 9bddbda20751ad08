use crate::rules::{
    determination_outputs, indicator_output, Outputs, RuleContext, Ruleset, Verdict,
};
use crate::transfer::domain::Value;

const DEFAULT_REFERRAL_AGE: i64 = 65;

/// The five MAGI category determinations rolled up into the overall
/// Medicaid indicator. Must stay aligned with the standard lineup.
const MAGI_CATEGORIES: &[&str] = &[
    "Parent Caretaker Category",
    "Pregnancy Category",
    "Child Category",
    "Adult Group Category",
    "Optional Targeted Low Income Child",
];

/// Flags applicants with an aged, blind, or disability basis for a non-MAGI
/// determination outside this pipeline, and rolls the category indicators
/// written earlier in the lineup into the overall Medicaid and CHIP
/// indicators.
pub struct NonMagiReferral;

impl Ruleset for NonMagiReferral {
    fn name(&self) -> &'static str {
        "Medicaid Non-MAGI Referral"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        let threshold = context
            .config()
            .integer("Non-MAGI Referral Age Threshold")
            .unwrap_or(DEFAULT_REFERRAL_AGE);
        let aged = context
            .integer("Applicant Age")
            .map(|age| age >= threshold)
            .unwrap_or(false);
        let blind_or_disabled = context.is_yes("Applicant Blind Or Disabled Indicator");

        let verdict = if aged || blind_or_disabled {
            Verdict::Eligible
        } else {
            Verdict::Ineligible("No aged, blind, or disability basis indicated")
        };
        let mut outputs =
            determination_outputs(self.name(), context.determination_date(), verdict);

        let medicaid = MAGI_CATEGORIES
            .iter()
            .any(|category| context.is_yes(&indicator_output(category)));
        outputs.insert("Applicant Medicaid Indicator".to_string(), flag(medicaid));
        let chip = context.is_yes(&indicator_output("CHIP Targeted Low Income Child"));
        outputs.insert("Applicant CHIP Indicator".to_string(), flag(chip));
        outputs
    }
}

fn flag(value: bool) -> Value {
    Value::Text(if value { "Y" } else { "N" }.to_string())
}
