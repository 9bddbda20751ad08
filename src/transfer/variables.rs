use roxmltree::Node;

use crate::document::{self, DocumentError};
use crate::transfer::domain::Value;

/// Which graph element a variable is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableGroup {
    Person,
    Applicant,
    Relationship,
}

/// How a variable's element text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Base-10 integer: the longest leading signed digit run, so `1200.50`
    /// reads as `1200` and text without one reads as `0`.
    Integer,
    /// Closed flag domain. Values in `accepted` pass through verbatim;
    /// schema booleans `true`/`false` are folded to `Y`/`N`.
    Flag { accepted: &'static [&'static str] },
    /// Verbatim element text.
    Text,
}

/// Declarative description of one field the intake reads from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDef {
    pub name: &'static str,
    pub group: VariableGroup,
    pub kind: VariableKind,
    pub required: bool,
    /// Path to the field's element, relative to the group's source element.
    pub path: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("document does not supply required variable {variable} for person {person_id}")]
    MissingRequiredField { variable: String, person_id: String },
    #[error("value {value:?} for variable {variable} on person {person_id} is not an accepted flag")]
    InvalidEnumValue {
        variable: String,
        person_id: String,
        value: String,
    },
    #[error("flag variable {variable} declares no accepted values")]
    EmptyFlagDomain { variable: String },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

const YES_NO: &[&str] = &["Y", "N"];

/// The fields the standard determination service reads. States extending the
/// intake supply their own table through [`DeterminationService::new`].
///
/// [`DeterminationService::new`]: crate::transfer::DeterminationService::new
pub fn standard_variables() -> Vec<VariableDef> {
    vec![
        VariableDef {
            name: "Applicant Age",
            group: VariableGroup::Person,
            kind: VariableKind::Integer,
            required: true,
            path: "nc:PersonAgeMeasure/nc:MeasureIntegerValue",
        },
        VariableDef {
            name: "Applicant Full Name",
            group: VariableGroup::Person,
            kind: VariableKind::Text,
            required: false,
            path: "nc:PersonName/nc:PersonFullName",
        },
        VariableDef {
            name: "Applicant Income",
            group: VariableGroup::Person,
            kind: VariableKind::Integer,
            required: false,
            path: "hix-core:PersonAugmentation/hix-core:PersonIncome/hix-core:IncomeAmount",
        },
        VariableDef {
            name: "Applicant Pregnant Indicator",
            group: VariableGroup::Person,
            kind: VariableKind::Flag { accepted: YES_NO },
            required: true,
            path: "hix-core:PersonAugmentation/hix-core:PersonPregnancyStatus/hix-core:StatusIndicator",
        },
        VariableDef {
            name: "Applicant Blind Or Disabled Indicator",
            group: VariableGroup::Person,
            kind: VariableKind::Flag { accepted: YES_NO },
            required: false,
            path: "hix-core:PersonAugmentation/hix-core:PersonDisabilityStatus/hix-core:StatusIndicator",
        },
        VariableDef {
            name: "Medicaid Residency Indicator",
            group: VariableGroup::Person,
            kind: VariableKind::Flag { accepted: YES_NO },
            required: true,
            path: "ext:MedicaidResidencyIndicator",
        },
        VariableDef {
            name: "Applicant Insured Indicator",
            group: VariableGroup::Applicant,
            kind: VariableKind::Flag { accepted: YES_NO },
            required: false,
            path: "hix-ee:InsuranceApplicantInsuredIndicator",
        },
        VariableDef {
            name: "Primary Caretaker Indicator",
            group: VariableGroup::Relationship,
            kind: VariableKind::Flag { accepted: YES_NO },
            required: false,
            path: "ext:PrimaryCaretakerIndicator",
        },
    ]
}

/// Reads one variable from its resolved element, applying the coercion the
/// descriptor's kind calls for. `None` means the field is absent and the
/// descriptor tolerates that.
pub(crate) fn read_variable(
    def: &VariableDef,
    node: Option<Node<'_, '_>>,
    person_id: &str,
) -> Result<Option<Value>, ReadError> {
    let Some(node) = node else {
        if def.required {
            return Err(ReadError::MissingRequiredField {
                variable: def.name.to_string(),
                person_id: person_id.to_string(),
            });
        }
        return Ok(None);
    };
    let text = document::inner_text(node);
    let value = match def.kind {
        VariableKind::Integer => Value::Integer(leading_integer(text.trim())),
        VariableKind::Flag { accepted } => {
            if accepted.is_empty() {
                return Err(ReadError::EmptyFlagDomain {
                    variable: def.name.to_string(),
                });
            }
            if accepted.contains(&text.as_str()) {
                Value::Text(text)
            } else if text == "true" {
                Value::Text("Y".to_string())
            } else if text == "false" {
                Value::Text("N".to_string())
            } else {
                return Err(ReadError::InvalidEnumValue {
                    variable: def.name.to_string(),
                    person_id: person_id.to_string(),
                    value: text,
                });
            }
        }
        VariableKind::Text => Value::Text(text),
    };
    Ok(Some(value))
}

/// Optional sign plus the longest leading digit run; anything after the run
/// is ignored, and text without one reads as zero.
fn leading_integer(text: &str) -> i64 {
    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = magnitude
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(magnitude.len());
    magnitude[..end].parse::<i64>().map_or(0, |value| sign * value)
}
