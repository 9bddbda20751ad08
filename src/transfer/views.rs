use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::ResolvedConfig;
use crate::transfer::domain::{AccountTransfer, Attributes, PersonIndex, Value};

/// Diagnostic snapshot of an evaluated transfer, with arena references
/// translated back to person ids.
#[derive(Debug, Clone, Serialize)]
pub struct TransferSummary {
    pub state: String,
    pub config: BTreeMap<String, Value>,
    pub applicants: Vec<ApplicantSummary>,
    pub households: Vec<HouseholdSummary>,
    pub tax_returns: Vec<TaxReturnSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantSummary {
    pub applicant_id: String,
    pub person_id: String,
    pub attributes: Attributes,
    pub relationships: Vec<RelationshipSummary>,
    pub outputs: Attributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipSummary {
    pub other_person_id: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct HouseholdSummary {
    pub member_person_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxReturnSummary {
    pub filer_person_ids: Vec<String>,
    pub dependent_person_ids: Vec<String>,
}

impl TransferSummary {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl AccountTransfer {
    /// Projects the transfer into its diagnostic summary. Applicant
    /// attributes fold the person's over the role's, mirroring what rule
    /// contexts see before outputs are layered on.
    pub fn summary(&self, config: &ResolvedConfig) -> TransferSummary {
        let applicants = self
            .applicants()
            .map(|(person, role)| {
                let mut attributes = role.attributes.clone();
                attributes.extend(person.attributes.clone());
                ApplicantSummary {
                    applicant_id: role.applicant_id.clone(),
                    person_id: person.person_id.clone(),
                    attributes,
                    relationships: person
                        .relationships
                        .iter()
                        .map(|relationship| RelationshipSummary {
                            other_person_id: self
                                .person(relationship.other)
                                .map(|other| other.person_id.clone())
                                .unwrap_or_default(),
                            code: relationship.code.clone(),
                            attributes: relationship.attributes.clone(),
                        })
                        .collect(),
                    outputs: role.outputs.clone(),
                }
            })
            .collect();
        let households = self
            .households
            .iter()
            .map(|household| HouseholdSummary {
                member_person_ids: self.person_ids(&household.members),
            })
            .collect();
        let tax_returns = self
            .tax_returns
            .iter()
            .map(|tax_return| TaxReturnSummary {
                filer_person_ids: self.person_ids(&tax_return.filers),
                dependent_person_ids: self.person_ids(&tax_return.dependents),
            })
            .collect();

        TransferSummary {
            state: self.state.clone(),
            config: config.options().clone(),
            applicants,
            households,
            tax_returns,
        }
    }

    fn person_ids(&self, members: &[PersonIndex]) -> Vec<String> {
        members
            .iter()
            .filter_map(|member| self.person(*member))
            .map(|person| person.person_id.clone())
            .collect()
    }
}
