use super::common::*;
use crate::rules::Verdict;
use crate::transfer::domain::{AccountTransfer, Value};
use crate::transfer::emitter::emit_response;
use crate::transfer::ResponseMode;

fn emit(transfer: &AccountTransfer, mode: ResponseMode) -> String {
    let generated_at = determination_date()
        .and_hms_opt(8, 30, 0)
        .expect("valid time");
    emit_response(transfer, mode, generated_at).expect("response serializes")
}

/// Body of the first `<name>` element in the response.
fn section<'a>(xml: &'a str, name: &str) -> &'a str {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = xml
        .find(&open)
        .unwrap_or_else(|| panic!("response is missing <{name}>"));
    let body_start = start + open.len();
    let end = xml[body_start..]
        .find(&close)
        .map(|offset| body_start + offset)
        .unwrap_or_else(|| panic!("response never closes <{name}>"));
    &xml[body_start..end]
}

#[test]
fn envelope_carries_activity_details() {
    let transfer = transfer(vec![applicant("pe1", "ia1"), applicant("pe2", "ia2")]);
    let xml = emit(&transfer, ResponseMode::DeterminationOnly);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<exch:AccountTransferRequest xmlns:exch="));
    assert!(xml.contains("xmlns:hix-ee="));
    assert!(xml.contains(
        "<ext:TransferActivityReferralQuantity>2</ext:TransferActivityReferralQuantity>"
    ));
    assert!(xml.contains("<nc:DateTime>2014-11-05T08:30:00</nc:DateTime>"));
    assert!(xml.contains("<ext:RecipientTransferActivityCode>MedicaidCHIP</ext:RecipientTransferActivityCode>"));
    assert!(xml.contains("<ext:RecipientTransferActivityStateCode>SC</ext:RecipientTransferActivityStateCode>"));
    assert!(xml.contains("<hix-core:Sender/>"));
    assert!(xml.contains("<hix-core:Receiver/>"));
    assert!(xml.contains("<hix-core:ApplicationCreation/>"));
    assert!(xml.contains("<hix-core:ApplicationSubmission/>"));
}

#[test]
fn determinations_serialize_as_basis_triples() {
    let mut people = vec![applicant("pe1", "ia1")];
    decide(&mut people[0], "Child Category", Verdict::Eligible);
    decide(
        &mut people[0],
        "Adult Group Category",
        Verdict::Ineligible("State has not adopted the adult group expansion"),
    );
    let xml = emit(&transfer(people), ResponseMode::DeterminationOnly);

    let child = section(&xml, "hix-ee:MedicaidMAGIChildCategoryEligibilityBasis");
    assert!(child.contains(
        "<hix-ee:EligibilityBasisStatusIndicator>Y</hix-ee:EligibilityBasisStatusIndicator>"
    ));
    assert!(child.contains("<nc:DateTime>2014-11-05</nc:DateTime>"));
    assert!(child.contains(
        "<hix-ee:EligibilityBasisIneligibilityReasonText></hix-ee:EligibilityBasisIneligibilityReasonText>"
    ));

    let adult = section(&xml, "hix-ee:MedicaidMAGIAdultGroupCategoryEligibilityBasis");
    assert!(adult.contains(
        "<hix-ee:EligibilityBasisStatusIndicator>N</hix-ee:EligibilityBasisStatusIndicator>"
    ));
    assert!(adult.contains("State has not adopted the adult group expansion"));
}

#[test]
fn undetermined_categories_serialize_empty() {
    let transfer = transfer(vec![applicant("pe1", "ia1")]);
    let xml = emit(&transfer, ResponseMode::DeterminationOnly);

    let caretaker = section(&xml, "hix-ee:MedicaidMAGIParentCaretakerCategoryEligibilityBasis");
    assert!(caretaker.contains("<hix-ee:EligibilityBasisStatusIndicator/>"));
    assert!(caretaker.contains("<hix-ee:EligibilityBasisIneligibilityReasonText/>"));
    assert!(!caretaker.contains("hix-ee:EligibilityBasisDetermination"));
}

#[test]
fn non_magi_referral_keeps_legacy_element_names() {
    let mut people = vec![applicant("pe1", "ia1")];
    decide(&mut people[0], "Medicaid Non-MAGI Referral", Verdict::Eligible);
    let xml = emit(&transfer(people), ResponseMode::DeterminationOnly);

    let referral = section(&xml, "hix-ee:MedicaidNonMAGIEligibility");
    assert!(referral.contains("<hix-ee:EligibilityIndicator>Y</hix-ee:EligibilityIndicator>"));
    assert!(referral.contains("<nc:DateTime>2014-11-05</nc:DateTime>"));
    assert!(referral.contains("<hix-ee:EligibilityReasonText></hix-ee:EligibilityReasonText>"));
}

#[test]
fn rollup_indicators_land_in_their_category_sections() {
    let mut people = vec![applicant("pe1", "ia1")];
    let role = people[0].applicant.as_mut().expect("pe1 applies");
    role.outputs.insert(
        "Applicant Medicaid Indicator".to_string(),
        Value::Text("Y".to_string()),
    );
    role.outputs.insert(
        "Applicant CHIP Indicator".to_string(),
        Value::Text("N".to_string()),
    );
    let xml = emit(&transfer(people), ResponseMode::DeterminationOnly);

    let magi = section(&xml, "hix-ee:MedicaidMAGIEligibility");
    assert!(magi.contains(
        "<hix-ee:MedicaidEligibilityIndicator>Y</hix-ee:MedicaidEligibilityIndicator>"
    ));
    let chip = section(&xml, "hix-ee:CHIPEligibility");
    assert!(chip.contains("<hix-ee:CHIPEligibilityIndicator>N</hix-ee:CHIPEligibilityIndicator>"));
}

#[test]
fn full_application_mode_returns_the_household_roster() {
    let mut transfer = transfer(vec![applicant("pe1", "ia1")]);
    add_household(&mut transfer, &[0]);

    let lean = emit(&transfer, ResponseMode::DeterminationOnly);
    assert!(!lean.contains("<hix-core:Person"));
    assert!(!lean.contains("ext:PhysicalHousehold"));

    let full = emit(&transfer, ResponseMode::FullApplication);
    assert!(full.contains(r#"<hix-core:Person s:id="pe1"/>"#));
    let household = section(&full, "ext:PhysicalHousehold");
    assert!(household.contains(r#"<hix-ee:HouseholdMemberReference s:ref="pe1"/>"#));
}

#[test]
fn responses_are_byte_identical_across_runs() {
    let mut people = vec![applicant("pe1", "ia1")];
    decide(&mut people[0], "Child Category", Verdict::Eligible);
    let transfer = transfer(people);

    let first = emit(&transfer, ResponseMode::FullApplication);
    let second = emit(&transfer, ResponseMode::FullApplication);
    assert_eq!(first, second);
}
