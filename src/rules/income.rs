use std::collections::BTreeMap;

use crate::rules::{DocumentContext, DocumentRuleset, Outputs};
use crate::transfer::domain::Value;

/// Sums attested income across each physical household and writes the total
/// to every applicant member. Runs as a document ruleset: household totals
/// need the whole graph, not one applicant's context.
pub struct HouseholdIncome;

impl DocumentRuleset for HouseholdIncome {
    fn name(&self) -> &'static str {
        "Household Income"
    }

    fn run(&self, context: &DocumentContext<'_>) -> BTreeMap<String, Outputs> {
        let mut results: BTreeMap<String, Outputs> = BTreeMap::new();
        for household in context.households() {
            let total: i64 = household
                .members
                .iter()
                .filter_map(|member| context.person(*member))
                .filter_map(|person| person.attributes.get("Applicant Income"))
                .filter_map(Value::integer)
                .sum();
            for member in &household.members {
                let Some(person) = context.person(*member) else {
                    continue;
                };
                if !person.is_applicant() {
                    continue;
                }
                results.entry(person.person_id.clone()).or_default().insert(
                    "Total Household Income".to_string(),
                    Value::Integer(total),
                );
            }
        }
        results
    }
}
