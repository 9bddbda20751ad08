use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named field values read from a transfer document or produced by rules.
pub type Attributes = BTreeMap<String, Value>;

/// Scalar value representation shared by document fields, configuration
/// options, and rule outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Date(NaiveDate),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether this is the affirmative `Y` flag value.
    pub fn is_yes(&self) -> bool {
        matches!(self, Value::Text(value) if value == "Y")
    }

    /// Text form used when the value is written into a response document.
    pub fn render(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Date(value) => value.format("%Y-%m-%d").to_string(),
            Value::Text(value) => value.clone(),
            Value::List(values) => values
                .iter()
                .map(Value::render)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Position of a person within [`AccountTransfer::people`]. Relationships,
/// tax returns, and households refer to people through these indices instead
/// of holding references into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonIndex(pub usize);

/// A person listed in the transfer. Applicants are people carrying an
/// [`ApplicantRole`]; non-applicants still participate in relationships,
/// households, and tax returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: String,
    pub attributes: Attributes,
    pub relationships: Vec<Relationship>,
    pub applicant: Option<ApplicantRole>,
}

impl Person {
    pub fn is_applicant(&self) -> bool {
        self.applicant.is_some()
    }
}

/// The coverage-seeking role of a person, including everything the rule
/// pipeline has produced for them so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRole {
    pub applicant_id: String,
    pub attributes: Attributes,
    pub outputs: Attributes,
}

/// Directed relationship from the owning person to `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub other: PersonIndex,
    pub code: String,
    pub attributes: Attributes,
}

/// A tax return with its filers (primary first, then spouse when present)
/// and claimed dependents. Both resolve against the full people list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxReturn {
    pub filers: Vec<PersonIndex>,
    pub dependents: Vec<PersonIndex>,
}

/// People living together at one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub members: Vec<PersonIndex>,
}

/// The in-memory graph built from one account-transfer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTransfer {
    pub state: String,
    pub people: Vec<Person>,
    pub tax_returns: Vec<TaxReturn>,
    pub households: Vec<Household>,
}

impl AccountTransfer {
    pub fn person(&self, index: PersonIndex) -> Option<&Person> {
        self.people.get(index.0)
    }

    pub fn person_index(&self, person_id: &str) -> Option<PersonIndex> {
        self.people
            .iter()
            .position(|person| person.person_id == person_id)
            .map(PersonIndex)
    }

    /// Applicants in document order, paired with their role.
    pub fn applicants(&self) -> impl Iterator<Item = (&Person, &ApplicantRole)> {
        self.people
            .iter()
            .filter_map(|person| person.applicant.as_ref().map(|role| (person, role)))
    }

    pub fn applicant_count(&self) -> usize {
        self.applicants().count()
    }

    pub fn applicant_indices(&self) -> Vec<PersonIndex> {
        self.people
            .iter()
            .enumerate()
            .filter(|(_, person)| person.is_applicant())
            .map(|(index, _)| PersonIndex(index))
            .collect()
    }

    /// The first household listing the person as a member, if any.
    pub fn household_of(&self, index: PersonIndex) -> Option<&Household> {
        self.households
            .iter()
            .find(|household| household.members.contains(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(person_id: &str, applicant_id: Option<&str>) -> Person {
        Person {
            person_id: person_id.to_string(),
            attributes: Attributes::new(),
            relationships: Vec::new(),
            applicant: applicant_id.map(|id| ApplicantRole {
                applicant_id: id.to_string(),
                attributes: Attributes::new(),
                outputs: Attributes::new(),
            }),
        }
    }

    #[test]
    fn applicants_preserve_document_order() {
        let transfer = AccountTransfer {
            state: "SC".to_string(),
            people: vec![
                person("pe1", Some("ia1")),
                person("pe2", None),
                person("pe3", Some("ia3")),
            ],
            tax_returns: Vec::new(),
            households: Vec::new(),
        };

        assert_eq!(transfer.applicant_count(), 2);
        let ids: Vec<_> = transfer
            .applicants()
            .map(|(_, role)| role.applicant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ia1", "ia3"]);
        assert_eq!(
            transfer.applicant_indices(),
            vec![PersonIndex(0), PersonIndex(2)]
        );
    }

    #[test]
    fn household_lookup_finds_membership() {
        let mut transfer = AccountTransfer {
            state: "SC".to_string(),
            people: vec![person("pe1", None), person("pe2", None)],
            tax_returns: Vec::new(),
            households: vec![Household {
                members: vec![PersonIndex(1)],
            }],
        };

        assert!(transfer.household_of(PersonIndex(0)).is_none());
        assert!(transfer.household_of(PersonIndex(1)).is_some());
        transfer.households.clear();
        assert!(transfer.household_of(PersonIndex(1)).is_none());
    }

    #[test]
    fn values_render_in_document_form() {
        assert_eq!(Value::Integer(42).render(), "42");
        assert_eq!(Value::Text("Y".to_string()).render(), "Y");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2014, 11, 5).unwrap()).render(),
            "2014-11-05"
        );
        assert_eq!(
            Value::List(vec![
                Value::Text("01".to_string()),
                Value::Text("03".to_string())
            ])
            .render(),
            "01,03"
        );
        assert!(Value::Text("Y".to_string()).is_yes());
        assert!(!Value::Text("N".to_string()).is_yes());
        assert!(!Value::Integer(1).is_yes());
    }
}
