use crate::rules::{determination_outputs, Outputs, RuleContext, Ruleset, Verdict};
use crate::transfer::domain::Value;

// Fallbacks mirroring the nationwide defaults, used when a deployment's
// option layers drop a threshold entirely.
const DEFAULT_CHILD_AGE_LIMIT: i64 = 19;
const DEFAULT_CHIP_AGE_LIMIT: i64 = 19;
const DEFAULT_ADULT_GROUP_MINIMUM: i64 = 19;
const DEFAULT_ADULT_GROUP_MAXIMUM: i64 = 64;

/// MAGI category for a parent or caretaker relative of a dependent child.
pub struct ParentCaretakerCategory;

impl Ruleset for ParentCaretakerCategory {
    fn name(&self) -> &'static str {
        "Parent Caretaker Category"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        determination_outputs(
            self.name(),
            context.determination_date(),
            caretaker_verdict(context),
        )
    }
}

fn caretaker_verdict(context: &RuleContext<'_>) -> Verdict {
    let codes = context
        .config()
        .text_list("Caretaker Relative Relationship Codes");
    let child_age_limit = context
        .config()
        .integer("Child Age Threshold")
        .unwrap_or(DEFAULT_CHILD_AGE_LIMIT);

    for relationship in context.relationships() {
        if !codes.contains(&relationship.code.as_str()) {
            continue;
        }
        // An explicit N on the association rules the pairing out; an absent
        // indicator does not.
        let declined = relationship
            .attributes
            .get("Primary Caretaker Indicator")
            .map(|value| !value.is_yes())
            .unwrap_or(false);
        if declined {
            continue;
        }
        let Some(other) = context.person(relationship.other) else {
            continue;
        };
        let dependent_child = other
            .attributes
            .get("Applicant Age")
            .and_then(Value::integer)
            .map(|age| age < child_age_limit)
            .unwrap_or(false);
        if dependent_child {
            return Verdict::Eligible;
        }
    }
    Verdict::Ineligible("No dependent child in a caretaker relationship")
}

/// MAGI category for pregnant applicants.
pub struct PregnancyCategory;

impl Ruleset for PregnancyCategory {
    fn name(&self) -> &'static str {
        "Pregnancy Category"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        let verdict = if context.is_yes("Applicant Pregnant Indicator") {
            Verdict::Eligible
        } else {
            Verdict::Ineligible("Applicant is not pregnant")
        };
        determination_outputs(self.name(), context.determination_date(), verdict)
    }
}

/// MAGI category for applicants under the state's child age threshold.
pub struct ChildCategory;

impl Ruleset for ChildCategory {
    fn name(&self) -> &'static str {
        "Child Category"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        let limit = context
            .config()
            .integer("Child Age Threshold")
            .unwrap_or(DEFAULT_CHILD_AGE_LIMIT);
        let verdict = match context.integer("Applicant Age") {
            Some(age) if age < limit => Verdict::Eligible,
            _ => Verdict::Ineligible("Applicant is not under the child age threshold"),
        };
        determination_outputs(self.name(), context.determination_date(), verdict)
    }
}

/// MAGI expansion category for adults in states that adopted it.
pub struct AdultGroupCategory;

impl Ruleset for AdultGroupCategory {
    fn name(&self) -> &'static str {
        "Adult Group Category"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        determination_outputs(
            self.name(),
            context.determination_date(),
            adult_group_verdict(context),
        )
    }
}

fn adult_group_verdict(context: &RuleContext<'_>) -> Verdict {
    if !context.config().is_yes("State Medicaid Expansion") {
        return Verdict::Ineligible("State has not adopted the adult group expansion");
    }
    if !context.is_yes("Medicaid Residency Indicator") {
        return Verdict::Ineligible("Applicant does not meet Medicaid residency requirements");
    }
    let minimum = context
        .config()
        .integer("Adult Group Minimum Age")
        .unwrap_or(DEFAULT_ADULT_GROUP_MINIMUM);
    let maximum = context
        .config()
        .integer("Adult Group Maximum Age")
        .unwrap_or(DEFAULT_ADULT_GROUP_MAXIMUM);
    let in_range = context
        .integer("Applicant Age")
        .map(|age| age >= minimum && age <= maximum)
        .unwrap_or(false);
    if !in_range {
        return Verdict::Ineligible("Applicant is outside the adult group age range");
    }
    if context.is_yes("Applicant Pregnant Indicator") {
        return Verdict::Ineligible("Pregnant applicants are covered by the pregnancy category");
    }
    Verdict::Eligible
}

/// MAGI category for uninsured children in states electing optional
/// targeted low income child coverage.
pub struct OptionalTargetedLowIncomeChild;

impl Ruleset for OptionalTargetedLowIncomeChild {
    fn name(&self) -> &'static str {
        "Optional Targeted Low Income Child"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        determination_outputs(
            self.name(),
            context.determination_date(),
            optional_child_verdict(context),
        )
    }
}

fn optional_child_verdict(context: &RuleContext<'_>) -> Verdict {
    if !context
        .config()
        .is_yes("State Covers Optional Targeted Low Income Children")
    {
        return Verdict::Ineligible("State does not cover optional targeted low income children");
    }
    let limit = context
        .config()
        .integer("Child Age Threshold")
        .unwrap_or(DEFAULT_CHILD_AGE_LIMIT);
    let under_limit = context
        .integer("Applicant Age")
        .map(|age| age < limit)
        .unwrap_or(false);
    if !under_limit {
        return Verdict::Ineligible("Applicant is not under the child age threshold");
    }
    if context.is_yes("Applicant Insured Indicator") {
        return Verdict::Ineligible("Applicant already has creditable coverage");
    }
    Verdict::Eligible
}

/// CHIP category for uninsured children under the CHIP age threshold.
pub struct ChipTargetedLowIncomeChild;

impl Ruleset for ChipTargetedLowIncomeChild {
    fn name(&self) -> &'static str {
        "CHIP Targeted Low Income Child"
    }

    fn run(&self, context: &RuleContext<'_>) -> Outputs {
        determination_outputs(
            self.name(),
            context.determination_date(),
            chip_child_verdict(context),
        )
    }
}

fn chip_child_verdict(context: &RuleContext<'_>) -> Verdict {
    let limit = context
        .config()
        .integer("CHIP Age Threshold")
        .unwrap_or(DEFAULT_CHIP_AGE_LIMIT);
    let under_limit = context
        .integer("Applicant Age")
        .map(|age| age < limit)
        .unwrap_or(false);
    if !under_limit {
        return Verdict::Ineligible("Applicant exceeds the CHIP age threshold");
    }
    if context.is_yes("Applicant Insured Indicator") {
        return Verdict::Ineligible("Applicant already has creditable coverage");
    }
    Verdict::Eligible
}
