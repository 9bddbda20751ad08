use roxmltree::Node;
use tracing::warn;

use crate::document::{self, DocumentError, TransferDocument};
use crate::transfer::domain::{
    AccountTransfer, ApplicantRole, Attributes, Household, Person, PersonIndex, Relationship,
    TaxReturn,
};
use crate::transfer::variables::{read_variable, ReadError, VariableDef, VariableGroup};

const PEOPLE: &str = "hix-core:Person";
const APPLICANTS: &str = "hix-ee:InsuranceApplication/hix-ee:InsuranceApplicant";
const ASSOCIATIONS: &str = "hix-core:PersonAugmentation/hix-core:PersonAssociation";
const TAX_RETURNS: &str = "hix-ee:TaxReturn";
const HOUSEHOLDS: &str = "ext:PhysicalHousehold";
const ROLE_REFERENCE: &str = "hix-core:RoleOfPersonReference";

impl AccountTransfer {
    /// Builds the transfer graph from a parsed document.
    ///
    /// Two passes: the first reads every person together with their applicant
    /// role and field values, the second wires relationships, tax returns,
    /// and households, which need the full people list to resolve references
    /// against. References to people the document never lists are dropped
    /// with a warning rather than failing the transfer.
    pub fn read(
        document: &TransferDocument<'_>,
        variables: &[VariableDef],
    ) -> Result<Self, ReadError> {
        let root = document.root();
        let state = document.state_code()?;
        let person_nodes = document::find_all(root, PEOPLE);
        let applicant_nodes = document::find_all(root, APPLICANTS);

        let mut people = Vec::with_capacity(person_nodes.len());
        for person_node in &person_nodes {
            people.push(read_person(*person_node, &applicant_nodes, variables)?);
        }
        wire_relationships(&mut people, &person_nodes, variables)?;

        let tax_returns = read_tax_returns(root, &people);
        let households = read_households(root, &people);

        Ok(Self {
            state,
            people,
            tax_returns,
            households,
        })
    }
}

fn read_person(
    node: Node<'_, '_>,
    applicant_nodes: &[Node<'_, '_>],
    variables: &[VariableDef],
) -> Result<Person, ReadError> {
    let person_id = identifier(node, PEOPLE)?.to_string();
    let applicant_node = applicant_nodes.iter().copied().find(|candidate| {
        document::find(*candidate, ROLE_REFERENCE)
            .and_then(|reference| document::attribute(reference, "ref"))
            == Some(person_id.as_str())
    });

    let mut attributes = Attributes::new();
    let mut applicant_attributes = Attributes::new();
    for def in variables {
        match def.group {
            VariableGroup::Person => {
                let field = document::find(node, def.path);
                if let Some(value) = read_variable(def, field, &person_id)? {
                    attributes.insert(def.name.to_string(), value);
                }
            }
            VariableGroup::Applicant => {
                let Some(applicant_node) = applicant_node else {
                    continue;
                };
                let field = document::find(applicant_node, def.path);
                if let Some(value) = read_variable(def, field, &person_id)? {
                    applicant_attributes.insert(def.name.to_string(), value);
                }
            }
            VariableGroup::Relationship => {}
        }
    }

    let applicant = match applicant_node {
        Some(applicant_node) => Some(ApplicantRole {
            applicant_id: identifier(applicant_node, "hix-ee:InsuranceApplicant")?.to_string(),
            attributes: applicant_attributes,
            outputs: Attributes::new(),
        }),
        None => None,
    };

    Ok(Person {
        person_id,
        attributes,
        relationships: Vec::new(),
        applicant,
    })
}

fn wire_relationships(
    people: &mut [Person],
    person_nodes: &[Node<'_, '_>],
    variables: &[VariableDef],
) -> Result<(), ReadError> {
    let relationship_defs: Vec<&VariableDef> = variables
        .iter()
        .filter(|def| def.group == VariableGroup::Relationship)
        .collect();
    let ids: Vec<String> = people.iter().map(|person| person.person_id.clone()).collect();

    for index in 0..people.len() {
        let person_id = ids[index].as_str();
        let Some(person_node) = person_nodes
            .iter()
            .copied()
            .find(|node| document::attribute(*node, "id") == Some(person_id))
        else {
            continue;
        };

        let mut relationships = Vec::new();
        for association in document::find_all(person_node, ASSOCIATIONS) {
            let reference = document::find(association, "nc:PersonReference")
                .and_then(|node| document::attribute(node, "ref"));
            let Some(other_id) = reference else {
                warn!(person = %person_id, "skipping person association without a person reference");
                continue;
            };
            let Some(position) = ids.iter().position(|id| id == other_id) else {
                warn!(person = %person_id, reference = %other_id, "skipping relationship to unknown person");
                continue;
            };
            let code = document::find(association, "hix-core:FamilyRelationshipCode")
                .map(document::inner_text)
                .unwrap_or_default();

            let mut attributes = Attributes::new();
            for def in &relationship_defs {
                let field = document::find(association, def.path);
                if let Some(value) = read_variable(def, field, person_id)? {
                    attributes.insert(def.name.to_string(), value);
                }
            }
            relationships.push(Relationship {
                other: PersonIndex(position),
                code,
                attributes,
            });
        }
        people[index].relationships = relationships;
    }
    Ok(())
}

fn read_tax_returns(root: Node<'_, '_>, people: &[Person]) -> Vec<TaxReturn> {
    let mut tax_returns = Vec::new();
    for return_node in document::find_all(root, TAX_RETURNS) {
        let mut filers = Vec::new();
        for filer_path in [
            "hix-ee:TaxHousehold/hix-ee:PrimaryTaxFiler",
            "hix-ee:TaxHousehold/hix-ee:SpouseTaxFiler",
        ] {
            let Some(filer_node) = document::find(return_node, filer_path) else {
                continue;
            };
            let reference = document::find(filer_node, ROLE_REFERENCE)
                .and_then(|node| document::attribute(node, "ref"));
            let Some(reference) = reference else {
                warn!("skipping tax filer without a person reference");
                continue;
            };
            match resolve_person(people, reference) {
                Some(index) => filers.push(index),
                None => {
                    warn!(reference = %reference, "skipping tax filer unknown to the transfer")
                }
            }
        }

        let mut dependents = Vec::new();
        for dependent in document::find_all(
            return_node,
            "hix-ee:TaxHousehold/hix-ee:TaxDependent/hix-core:RoleOfPersonReference",
        ) {
            let Some(reference) = document::attribute(dependent, "ref") else {
                warn!("skipping tax dependent without a person reference");
                continue;
            };
            match resolve_person(people, reference) {
                Some(index) => dependents.push(index),
                None => warn!(reference = %reference, "skipping tax dependent unknown to the transfer"),
            }
        }
        tax_returns.push(TaxReturn { filers, dependents });
    }
    tax_returns
}

fn read_households(root: Node<'_, '_>, people: &[Person]) -> Vec<Household> {
    let mut households = Vec::new();
    for household_node in document::find_all(root, HOUSEHOLDS) {
        let mut members = Vec::new();
        for member in document::find_all(household_node, "hix-ee:HouseholdMemberReference") {
            let Some(reference) = document::attribute(member, "ref") else {
                warn!("skipping household member without a person reference");
                continue;
            };
            match resolve_person(people, reference) {
                Some(index) => members.push(index),
                None => {
                    warn!(reference = %reference, "skipping household member unknown to the transfer")
                }
            }
        }
        households.push(Household { members });
    }
    households
}

fn resolve_person(people: &[Person], person_id: &str) -> Option<PersonIndex> {
    people
        .iter()
        .position(|person| person.person_id == person_id)
        .map(PersonIndex)
}

fn identifier<'a>(node: Node<'a, '_>, element: &str) -> Result<&'a str, DocumentError> {
    document::attribute(node, "id").ok_or_else(|| DocumentError::MissingIdentifier {
        element: element.to_string(),
    })
}
