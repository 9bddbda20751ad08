use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::rules::{OptionRegistry, ResolvedConfig};
use crate::transfer::domain::{
    AccountTransfer, ApplicantRole, Attributes, Person, PersonIndex, Relationship, Value,
};

pub(super) fn determination_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 11, 5).expect("valid date")
}

pub(super) fn standard_config() -> ResolvedConfig {
    OptionRegistry::standard().resolve("SC")
}

/// Iowa layered as an expansion state that also elects optional targeted
/// low income child coverage.
pub(super) fn expansion_config() -> ResolvedConfig {
    OptionRegistry::standard()
        .with_state(
            "IA",
            BTreeMap::from([
                (
                    "State Medicaid Expansion".to_string(),
                    Value::Text("Y".to_string()),
                ),
                (
                    "State Covers Optional Targeted Low Income Children".to_string(),
                    Value::Text("Y".to_string()),
                ),
            ]),
        )
        .resolve("IA")
}

pub(super) fn person(person_id: &str, age: i64) -> Person {
    let mut attributes = Attributes::new();
    attributes.insert("Applicant Age".to_string(), Value::Integer(age));
    attributes.insert(
        "Applicant Pregnant Indicator".to_string(),
        Value::Text("N".to_string()),
    );
    attributes.insert(
        "Medicaid Residency Indicator".to_string(),
        Value::Text("Y".to_string()),
    );
    Person {
        person_id: person_id.to_string(),
        attributes,
        relationships: Vec::new(),
        applicant: None,
    }
}

pub(super) fn applicant(person_id: &str, applicant_id: &str, age: i64) -> Person {
    let mut person = person(person_id, age);
    person.applicant = Some(ApplicantRole {
        applicant_id: applicant_id.to_string(),
        attributes: Attributes::new(),
        outputs: Attributes::new(),
    });
    person
}

pub(super) fn transfer(people: Vec<Person>) -> AccountTransfer {
    AccountTransfer {
        state: "SC".to_string(),
        people,
        tax_returns: Vec::new(),
        households: Vec::new(),
    }
}

pub(super) fn set_flag(person: &mut Person, name: &str, value: &str) {
    person
        .attributes
        .insert(name.to_string(), Value::Text(value.to_string()));
}

pub(super) fn set_integer(person: &mut Person, name: &str, value: i64) {
    person
        .attributes
        .insert(name.to_string(), Value::Integer(value));
}

pub(super) fn relate(person: &mut Person, other: usize, code: &str) {
    person.relationships.push(Relationship {
        other: PersonIndex(other),
        code: code.to_string(),
        attributes: Attributes::new(),
    });
}
