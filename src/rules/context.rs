use chrono::NaiveDate;

use crate::rules::options::ResolvedConfig;
use crate::transfer::domain::{
    AccountTransfer, ApplicantRole, Attributes, Household, Person, PersonIndex, Relationship,
    TaxReturn, Value,
};

/// Everything a per-applicant ruleset may look at while it runs.
///
/// The flat input map folds the applicant's field values, the person's field
/// values, and the outputs accumulated by earlier rulesets, in that override
/// order. Because outputs win, a later ruleset sees what earlier ones wrote
/// under the same name. The context is rebuilt from the transfer before each
/// ruleset so those writes become visible.
pub struct RuleContext<'a> {
    input: Attributes,
    person_id: &'a str,
    applicant_id: &'a str,
    transfer: &'a AccountTransfer,
    person_index: PersonIndex,
    config: &'a ResolvedConfig,
    determination_date: NaiveDate,
}

impl<'a> RuleContext<'a> {
    /// Builds the context for the applicant stored at `person_index`.
    /// Returns `None` when the person carries no applicant role.
    pub fn assemble(
        transfer: &'a AccountTransfer,
        person_index: PersonIndex,
        config: &'a ResolvedConfig,
        determination_date: NaiveDate,
    ) -> Option<Self> {
        let person = transfer.person(person_index)?;
        let role = person.applicant.as_ref()?;

        let mut input = role.attributes.clone();
        input.extend(person.attributes.clone());
        input.extend(role.outputs.clone());

        Some(Self {
            input,
            person_id: &person.person_id,
            applicant_id: &role.applicant_id,
            transfer,
            person_index,
            config,
            determination_date,
        })
    }

    pub fn input(&self, name: &str) -> Option<&Value> {
        self.input.get(name)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.input(name).and_then(Value::integer)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.input(name).and_then(Value::text)
    }

    pub fn is_yes(&self, name: &str) -> bool {
        self.input(name).is_some_and(Value::is_yes)
    }

    pub fn inputs(&self) -> &Attributes {
        &self.input
    }

    pub fn person_id(&self) -> &str {
        self.person_id
    }

    pub fn applicant_id(&self) -> &str {
        self.applicant_id
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.config
    }

    pub fn determination_date(&self) -> NaiveDate {
        self.determination_date
    }

    pub fn people(&self) -> &'a [Person] {
        &self.transfer.people
    }

    pub fn person(&self, index: PersonIndex) -> Option<&'a Person> {
        self.transfer.person(index)
    }

    pub fn applicants(&self) -> impl Iterator<Item = (&'a Person, &'a ApplicantRole)> {
        self.transfer.applicants()
    }

    /// Relationships owned by this applicant's person record.
    pub fn relationships(&self) -> &'a [Relationship] {
        self.transfer
            .person(self.person_index)
            .map(|person| person.relationships.as_slice())
            .unwrap_or_default()
    }

    /// The physical household this person belongs to, if the transfer
    /// described one.
    pub fn household(&self) -> Option<&'a Household> {
        self.transfer.household_of(self.person_index)
    }

    pub fn tax_returns(&self) -> &'a [TaxReturn] {
        &self.transfer.tax_returns
    }
}

/// Whole-transfer view handed to document rulesets once every per-applicant
/// ruleset has finished.
pub struct DocumentContext<'a> {
    transfer: &'a AccountTransfer,
    config: &'a ResolvedConfig,
    determination_date: NaiveDate,
}

impl<'a> DocumentContext<'a> {
    pub fn new(
        transfer: &'a AccountTransfer,
        config: &'a ResolvedConfig,
        determination_date: NaiveDate,
    ) -> Self {
        Self {
            transfer,
            config,
            determination_date,
        }
    }

    pub fn people(&self) -> &'a [Person] {
        &self.transfer.people
    }

    pub fn person(&self, index: PersonIndex) -> Option<&'a Person> {
        self.transfer.person(index)
    }

    pub fn households(&self) -> &'a [Household] {
        &self.transfer.households
    }

    pub fn tax_returns(&self) -> &'a [TaxReturn] {
        &self.transfer.tax_returns
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.config
    }

    pub fn determination_date(&self) -> NaiveDate {
        self.determination_date
    }
}
