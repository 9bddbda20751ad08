use chrono::NaiveDate;

use crate::document::NAMESPACES;
use crate::rules::{determination_outputs, Verdict};
use crate::transfer::domain::{
    AccountTransfer, ApplicantRole, Attributes, Household, Person, PersonIndex,
};

/// Wraps `body` in a transfer envelope addressed to `state`, with every
/// namespace the documents use declared on the root.
pub(super) fn document(state: &str, body: &str) -> String {
    let declarations: String = NAMESPACES
        .iter()
        .map(|(prefix, uri)| format!(" xmlns:{prefix}=\"{uri}\""))
        .collect();
    format!(
        "<exch:AccountTransferRequest{declarations}>\n\
         <ext:TransferHeader><ext:TransferActivity>\n\
         <ext:RecipientTransferActivityStateCode>{state}</ext:RecipientTransferActivityStateCode>\n\
         </ext:TransferActivity></ext:TransferHeader>\n\
         {body}\n\
         </exch:AccountTransferRequest>"
    )
}

/// Three-person household: Maria (36, caretaker of Luz), Elena (29,
/// pregnant), and Luz (6). Maria and Elena apply for coverage; Luz is
/// listed but does not.
pub(super) fn sample() -> String {
    document("SC", SAMPLE_BODY)
}

const SAMPLE_BODY: &str = r#"
<hix-core:Person s:id="pe1">
  <nc:PersonName><nc:PersonFullName>Maria Reyes</nc:PersonFullName></nc:PersonName>
  <nc:PersonAgeMeasure><nc:MeasureIntegerValue>36</nc:MeasureIntegerValue></nc:PersonAgeMeasure>
  <ext:MedicaidResidencyIndicator>Y</ext:MedicaidResidencyIndicator>
  <hix-core:PersonAugmentation>
    <hix-core:PersonPregnancyStatus><hix-core:StatusIndicator>N</hix-core:StatusIndicator></hix-core:PersonPregnancyStatus>
    <hix-core:PersonIncome><hix-core:IncomeAmount>1200</hix-core:IncomeAmount></hix-core:PersonIncome>
    <hix-core:PersonAssociation>
      <nc:PersonReference s:ref="pe3"/>
      <hix-core:FamilyRelationshipCode>01</hix-core:FamilyRelationshipCode>
      <ext:PrimaryCaretakerIndicator>Y</ext:PrimaryCaretakerIndicator>
    </hix-core:PersonAssociation>
  </hix-core:PersonAugmentation>
</hix-core:Person>
<hix-core:Person s:id="pe2">
  <nc:PersonName><nc:PersonFullName>Elena Reyes</nc:PersonFullName></nc:PersonName>
  <nc:PersonAgeMeasure><nc:MeasureIntegerValue>29</nc:MeasureIntegerValue></nc:PersonAgeMeasure>
  <ext:MedicaidResidencyIndicator>true</ext:MedicaidResidencyIndicator>
  <hix-core:PersonAugmentation>
    <hix-core:PersonPregnancyStatus><hix-core:StatusIndicator>Y</hix-core:StatusIndicator></hix-core:PersonPregnancyStatus>
    <hix-core:PersonAssociation>
      <nc:PersonReference s:ref="pe3"/>
      <hix-core:FamilyRelationshipCode>01</hix-core:FamilyRelationshipCode>
    </hix-core:PersonAssociation>
  </hix-core:PersonAugmentation>
</hix-core:Person>
<hix-core:Person s:id="pe3">
  <nc:PersonName><nc:PersonFullName>Luz Reyes</nc:PersonFullName></nc:PersonName>
  <nc:PersonAgeMeasure><nc:MeasureIntegerValue>6</nc:MeasureIntegerValue></nc:PersonAgeMeasure>
  <ext:MedicaidResidencyIndicator>Y</ext:MedicaidResidencyIndicator>
  <hix-core:PersonAugmentation>
    <hix-core:PersonPregnancyStatus><hix-core:StatusIndicator>N</hix-core:StatusIndicator></hix-core:PersonPregnancyStatus>
  </hix-core:PersonAugmentation>
</hix-core:Person>
<hix-ee:InsuranceApplication>
  <hix-ee:InsuranceApplicant s:id="ia1">
    <hix-core:RoleOfPersonReference s:ref="pe1"/>
    <hix-ee:InsuranceApplicantInsuredIndicator>N</hix-ee:InsuranceApplicantInsuredIndicator>
  </hix-ee:InsuranceApplicant>
  <hix-ee:InsuranceApplicant s:id="ia2">
    <hix-core:RoleOfPersonReference s:ref="pe2"/>
    <hix-ee:InsuranceApplicantInsuredIndicator>N</hix-ee:InsuranceApplicantInsuredIndicator>
  </hix-ee:InsuranceApplicant>
</hix-ee:InsuranceApplication>
<hix-ee:TaxReturn>
  <hix-ee:TaxHousehold>
    <hix-ee:PrimaryTaxFiler>
      <hix-core:RoleOfPersonReference s:ref="pe1"/>
    </hix-ee:PrimaryTaxFiler>
    <hix-ee:TaxDependent>
      <hix-core:RoleOfPersonReference s:ref="pe3"/>
    </hix-ee:TaxDependent>
  </hix-ee:TaxHousehold>
</hix-ee:TaxReturn>
<ext:PhysicalHousehold>
  <hix-ee:HouseholdMemberReference s:ref="pe1"/>
  <hix-ee:HouseholdMemberReference s:ref="pe2"/>
  <hix-ee:HouseholdMemberReference s:ref="pe3"/>
</ext:PhysicalHousehold>"#;

pub(super) fn determination_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 11, 5).expect("valid date")
}

pub(super) fn applicant(person_id: &str, applicant_id: &str) -> Person {
    Person {
        person_id: person_id.to_string(),
        attributes: Attributes::new(),
        relationships: Vec::new(),
        applicant: Some(ApplicantRole {
            applicant_id: applicant_id.to_string(),
            attributes: Attributes::new(),
            outputs: Attributes::new(),
        }),
    }
}

/// Stamps the full indicator/date/reason triple for one determination onto
/// the person's applicant role.
pub(super) fn decide(person: &mut Person, determination: &str, verdict: Verdict) {
    let role = person
        .applicant
        .as_mut()
        .expect("person has an applicant role");
    role.outputs
        .extend(determination_outputs(determination, determination_date(), verdict));
}

pub(super) fn transfer(people: Vec<Person>) -> AccountTransfer {
    AccountTransfer {
        state: "SC".to_string(),
        people,
        tax_returns: Vec::new(),
        households: Vec::new(),
    }
}

pub(super) fn add_household(transfer: &mut AccountTransfer, members: &[usize]) {
    transfer.households.push(Household {
        members: members.iter().copied().map(PersonIndex).collect(),
    });
}
