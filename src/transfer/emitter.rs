use chrono::NaiveDateTime;

use crate::document::{EmitError, ResponseNode, NAMESPACES};
use crate::rules::{date_output, indicator_output, reason_output};
use crate::transfer::domain::{AccountTransfer, ApplicantRole, Value};
use crate::transfer::ResponseMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EligibilityCategory {
    Magi,
    Chip,
}

struct DeterminationDef {
    name: &'static str,
    category: EligibilityCategory,
}

struct RollupDef {
    output: &'static str,
    element: &'static str,
    category: EligibilityCategory,
}

/// Determinations serialized per applicant, in response order. The names
/// must match what the standard lineup writes.
const DETERMINATIONS: &[DeterminationDef] = &[
    DeterminationDef {
        name: "Parent Caretaker Category",
        category: EligibilityCategory::Magi,
    },
    DeterminationDef {
        name: "Pregnancy Category",
        category: EligibilityCategory::Magi,
    },
    DeterminationDef {
        name: "Child Category",
        category: EligibilityCategory::Magi,
    },
    DeterminationDef {
        name: "Adult Group Category",
        category: EligibilityCategory::Magi,
    },
    DeterminationDef {
        name: "Optional Targeted Low Income Child",
        category: EligibilityCategory::Magi,
    },
    DeterminationDef {
        name: "CHIP Targeted Low Income Child",
        category: EligibilityCategory::Chip,
    },
];

const ROLLUPS: &[RollupDef] = &[
    RollupDef {
        output: "Applicant Medicaid Indicator",
        element: "hix-ee:MedicaidEligibilityIndicator",
        category: EligibilityCategory::Magi,
    },
    RollupDef {
        output: "Applicant CHIP Indicator",
        element: "hix-ee:CHIPEligibilityIndicator",
        category: EligibilityCategory::Chip,
    },
];

/// Serializes the determinations accumulated on `transfer` into a response
/// document. `generated_at` stamps the transfer activity; determination
/// dates come from the outputs themselves.
pub(crate) fn emit_response(
    transfer: &AccountTransfer,
    mode: ResponseMode,
    generated_at: NaiveDateTime,
) -> Result<String, EmitError> {
    let mut root = ResponseNode::new("exch:AccountTransferRequest");
    for (prefix, uri) in NAMESPACES {
        root.set_attribute(format!("xmlns:{prefix}"), *uri);
    }

    let activity = root.ensure_path("ext:TransferHeader/ext:TransferActivity");
    activity.push(ResponseNode::new("nc:ActivityIdentification"));
    activity.ensure_path("nc:ActivityDate").push(ResponseNode::with_text(
        "nc:DateTime",
        generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    ));
    activity.push(ResponseNode::with_text(
        "ext:TransferActivityReferralQuantity",
        transfer.applicant_count().to_string(),
    ));
    activity.push(ResponseNode::with_text(
        "ext:RecipientTransferActivityCode",
        "MedicaidCHIP",
    ));
    activity.push(ResponseNode::with_text(
        "ext:RecipientTransferActivityStateCode",
        transfer.state.clone(),
    ));

    root.push(ResponseNode::new("hix-core:Sender"));
    root.push(ResponseNode::new("hix-core:Receiver"));

    let application = root.ensure_path("hix-ee:InsuranceApplication");
    application.push(ResponseNode::new("hix-core:ApplicationCreation"));
    application.push(ResponseNode::new("hix-core:ApplicationSubmission"));
    for (_, role) in transfer.applicants() {
        application.push(applicant_element(role));
    }

    if mode == ResponseMode::FullApplication {
        append_application_detail(&mut root, transfer);
    }
    root.to_xml()
}

fn applicant_element(role: &ApplicantRole) -> ResponseNode {
    let mut applicant = ResponseNode::new("hix-ee:InsuranceApplicant");
    applicant.set_attribute("s:id", role.applicant_id.clone());

    let mut magi = ResponseNode::new("hix-ee:MedicaidMAGIEligibility");
    for det in determinations(EligibilityCategory::Magi) {
        magi.push(basis_element(
            format!("hix-ee:MedicaidMAGI{}EligibilityBasis", compact(det.name)),
            det.name,
            role,
        ));
    }
    append_rollups(&mut magi, role, EligibilityCategory::Magi);
    applicant.push(magi);

    let mut chip = ResponseNode::new("hix-ee:CHIPEligibility");
    for det in determinations(EligibilityCategory::Chip) {
        chip.push(basis_element(
            format!("hix-ee:{}EligibilityBasis", compact(det.name)),
            det.name,
            role,
        ));
    }
    append_rollups(&mut chip, role, EligibilityCategory::Chip);
    applicant.push(chip);

    applicant.push(non_magi_element(role));
    applicant
}

/// The conventional indicator/date/reason triple for one determination.
/// A date the rules never produced is omitted; missing indicator or reason
/// outputs serialize as empty elements.
fn basis_element(element: String, determination: &str, role: &ApplicantRole) -> ResponseNode {
    let mut basis = ResponseNode::new(element);
    basis.push(output_element(
        role,
        &indicator_output(determination),
        "hix-ee:EligibilityBasisStatusIndicator",
    ));
    if let Some(date) = role
        .outputs
        .get(&date_output(determination))
        .and_then(Value::date)
    {
        basis
            .ensure_path("hix-ee:EligibilityBasisDetermination/nc:ActivityDate")
            .push(ResponseNode::with_text(
                "nc:DateTime",
                date.format("%Y-%m-%d").to_string(),
            ));
    }
    basis.push(output_element(
        role,
        &reason_output(determination),
        "hix-ee:EligibilityBasisIneligibilityReasonText",
    ));
    basis
}

/// The non-MAGI referral section keeps the legacy element names rather than
/// the basis naming the category determinations use.
fn non_magi_element(role: &ApplicantRole) -> ResponseNode {
    let determination = "Medicaid Non-MAGI Referral";
    let mut section = ResponseNode::new("hix-ee:MedicaidNonMAGIEligibility");
    section.push(output_element(
        role,
        &indicator_output(determination),
        "hix-ee:EligibilityIndicator",
    ));
    if let Some(date) = role
        .outputs
        .get(&date_output(determination))
        .and_then(Value::date)
    {
        section
            .ensure_path("hix-ee:EligibilityDetermination/nc:ActivityDate")
            .push(ResponseNode::with_text(
                "nc:DateTime",
                date.format("%Y-%m-%d").to_string(),
            ));
    }
    section.push(output_element(
        role,
        &reason_output(determination),
        "hix-ee:EligibilityReasonText",
    ));
    section
}

fn append_rollups(section: &mut ResponseNode, role: &ApplicantRole, category: EligibilityCategory) {
    for rollup in ROLLUPS.iter().filter(|rollup| rollup.category == category) {
        section.push(output_element(role, rollup.output, rollup.element));
    }
}

fn append_application_detail(root: &mut ResponseNode, transfer: &AccountTransfer) {
    for person in &transfer.people {
        let mut element = ResponseNode::new("hix-core:Person");
        element.set_attribute("s:id", person.person_id.clone());
        root.push(element);
    }
    for household in &transfer.households {
        let mut element = ResponseNode::new("ext:PhysicalHousehold");
        for member in &household.members {
            let Some(person) = transfer.person(*member) else {
                continue;
            };
            let mut reference = ResponseNode::new("hix-ee:HouseholdMemberReference");
            reference.set_attribute("s:ref", person.person_id.clone());
            element.push(reference);
        }
        root.push(element);
    }
}

fn determinations(category: EligibilityCategory) -> impl Iterator<Item = &'static DeterminationDef> {
    DETERMINATIONS.iter().filter(move |det| det.category == category)
}

fn output_element(role: &ApplicantRole, output: &str, element: &str) -> ResponseNode {
    match role.outputs.get(output) {
        Some(value) => ResponseNode::with_text(element, value.render()),
        None => ResponseNode::new(element),
    }
}

/// Display name with spaces removed, as embedded in basis element names.
fn compact(name: &str) -> String {
    name.split_whitespace().collect()
}
