use formfaktura::decode::decode_form_instance;
use formfaktura::map::{
    self, APPROVED_BY, CATEGORY_CUSTOMER_INVOICE, INTERNAL_ORGANIZATION_NUMBER,
    INTERNAL_RECIPIENT_NAME, STATUS_APPROVED, map_form,
};
use formfaktura::{BillingError, FLOW_INSTANCE_NAMESPACE, NormalizedBillingRecord, Recipient};
use rust_decimal_macros::dec;

fn form_xml(family_id: &str, values: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<FlowInstance xmlns="{FLOW_INSTANCE_NAMESPACE}">
  <Header>
    <Flow><FamilyID>{family_id}</FamilyID></Flow>
    <FlowInstanceID>4711</FlowInstanceID>
    <Posted>2024-03-07 10:34</Posted>
  </Header>
  <Values>
{values}
  </Values>
</FlowInstance>"#
    )
}

fn map_values(family_id: &str, values: &str) -> Result<NormalizedBillingRecord, BillingError> {
    let xml = form_xml(family_id, values);
    let form = decode_form_instance(xml.as_bytes(), FLOW_INSTANCE_NAMESPACE)?;
    map_form(&form)
}

// ---------------------------------------------------------------------------
// Internal variant
// ---------------------------------------------------------------------------

const INTERNAL_VALUES: &str = r#"
    <payingAdministration>70 - Some Dept</payingAdministration>
    <seller>Hamnkontoret</seller>
    <reference>Kalle Anka</reference>
    <Computation1><text>Bra fakturatext1</text><quantity>3.0</quantity><price>567.89</price></Computation1>
    <CostCenterAccount1><costCenter>15810100</costCenter></CostCenterAccount1>
    <SubAccount1><subAccount>931311</subAccount></SubAccount1>
    <DepartmentAccount1><department>510410</department></DepartmentAccount1>
"#;

#[test]
fn internal_form_maps_to_internal_recipient() {
    let record = map_values("358", INTERNAL_VALUES).unwrap();

    assert_eq!(record.invoice.customer_id.as_deref(), Some("70"));
    assert_eq!(record.invoice.rows.len(), 1);
    let row = &record.invoice.rows[0];
    assert_eq!(row.descriptions, vec!["Bra fakturatext1"]);
    assert_eq!(row.quantity, dec!(3.0));
    assert_eq!(row.cost_per_unit, dec!(567.89));
    assert_eq!(
        row.account_information.cost_center.as_deref(),
        Some("15810100")
    );
    assert_eq!(
        row.account_information.subaccount.as_deref(),
        Some("931311")
    );
    assert_eq!(
        row.account_information.department.as_deref(),
        Some("510410")
    );
    // Internal counterpart: fixed prefix digit + customer id.
    assert_eq!(row.account_information.counterpart.as_deref(), Some("170"));

    assert_eq!(
        record.recipient,
        Recipient::Internal {
            name: INTERNAL_RECIPIENT_NAME.to_string()
        }
    );
    assert_eq!(
        record.legal_id.as_deref(),
        Some(INTERNAL_ORGANIZATION_NUMBER)
    );
    assert!(!record.private_person);
    assert_eq!(record.invoice.our_reference.as_deref(), Some("Hamnkontoret"));
    assert_eq!(record.invoice.customer_reference.as_deref(), Some("Kalle Anka"));
    assert_eq!(record.invoice.reference_id, "4711");
    assert_eq!(record.family_id, "358");
    assert_eq!(record.flow_instance_id, "4711");
}

#[test]
fn approval_metadata_is_fixed() {
    let record = map_values("358", INTERNAL_VALUES).unwrap();
    assert_eq!(record.category, CATEGORY_CUSTOMER_INVOICE);
    assert_eq!(record.status, STATUS_APPROVED);
    assert_eq!(record.approved_by, APPROVED_BY);
    assert!(record.posted.is_some());
}

// ---------------------------------------------------------------------------
// External organization variant
// ---------------------------------------------------------------------------

const EXTERNAL_ORG_VALUES: &str = r#"
    <recipient>Organisation</recipient>
    <organizationInformation>5591628136 | Tennisbanan AB | Ankeborgsvägen 22 |  | 123 45 Ankeborg | 789</organizationInformation>
    <seller>Fritidskontoret</seller>
    <Computation1><text>Banhyra</text><quantity>2</quantity><price>350</price></Computation1>
    <VatRate1><vatRate>25</vatRate></VatRate1>
"#;

#[test]
fn external_organization_maps_from_organization_info() {
    let record = map_values("358", EXTERNAL_ORG_VALUES).unwrap();

    assert_eq!(
        record.recipient,
        Recipient::Organization {
            organization_name: "Tennisbanan AB".into(),
            street_address: "Ankeborgsvägen 22".into(),
            care_of: None,
            zip_code: "123 45".into(),
            city: "Ankeborg".into(),
        }
    );
    assert_eq!(record.legal_id.as_deref(), Some("5591628136"));
    assert!(!record.private_person);
    assert_eq!(record.invoice.customer_id.as_deref(), Some("789"));
    assert_eq!(
        record.invoice.rows[0].account_information.counterpart.as_deref(),
        Some("78900000")
    );
    assert_eq!(record.invoice.rows[0].vat_code, "25");
}

#[test]
fn external_organization_with_bad_info_string_fails() {
    let values = r#"
    <recipient>Organisation</recipient>
    <organizationInformation>Tennisbanan AB, Ankeborg</organizationInformation>
    <Computation1><text>x</text></Computation1>
"#;
    assert!(matches!(
        map_values("358", values),
        Err(BillingError::OrganizationInfoFormat { .. })
    ));
}

// ---------------------------------------------------------------------------
// External person variant
// ---------------------------------------------------------------------------

const EXTERNAL_PERSON_VALUES: &str = r#"
    <recipient>Privatperson - ange personnummer nedan</recipient>
    <firstname>Kajsa</firstname>
    <lastname>Anka</lastname>
    <address>Paradisäppelvägen 9</address>
    <zipCode>123 45</zipCode>
    <city>Ankeborg</city>
    <socialSecurityNumber>195001012384</socialSecurityNumber>
    <counterpart>3 - Privatpersoner 880</counterpart>
    <Computation1><text>Simskola</text><quantity>1</quantity><price>450</price></Computation1>
"#;

#[test]
fn external_person_is_flagged_for_redaction() {
    let record = map_values("358", EXTERNAL_PERSON_VALUES).unwrap();

    assert_eq!(
        record.recipient,
        Recipient::Person {
            first_name: "Kajsa".into(),
            last_name: "Anka".into(),
            street_address: "Paradisäppelvägen 9".into(),
            zip_code: "123 45".into(),
            city: "Ankeborg".into(),
        }
    );
    assert_eq!(record.legal_id.as_deref(), Some("195001012384"));
    assert!(record.private_person);
    assert_eq!(record.invoice.customer_id.as_deref(), Some("880"));
    assert_eq!(
        record.invoice.rows[0].account_information.counterpart.as_deref(),
        Some("88000000")
    );
}

// ---------------------------------------------------------------------------
// Dispatch and validation ordering
// ---------------------------------------------------------------------------

#[test]
fn unsupported_family_is_rejected_by_the_dispatcher() {
    assert!(matches!(
        map_values("999", INTERNAL_VALUES),
        Err(BillingError::UnsupportedFamily { family_id }) if family_id == "999"
    ));
    assert!(map::registered_families().contains(&"358"));
}

#[test]
fn reconciliation_failure_precedes_variant_branching() {
    // Uneven population must fail before any recipient logic runs.
    let values = r#"
    <payingAdministration>70 - Some Dept</payingAdministration>
    <Computation1><text>a</text></Computation1>
    <Computation2><text>b</text></Computation2>
    <VatRate1><vatRate>25</vatRate></VatRate1>
"#;
    assert!(matches!(
        map_values("358", values),
        Err(BillingError::RowCountMismatch { .. })
    ));
}

#[test]
fn empty_values_is_no_data() {
    assert!(matches!(
        map_values("358", ""),
        Err(BillingError::NoData)
    ));
}

#[test]
fn record_serializes_for_the_downstream_sender() {
    let record = map_values("358", INTERNAL_VALUES).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["invoice"]["customer_id"], "70");
    assert_eq!(json["invoice"]["rows"][0]["quantity"], "3.0");
    assert_eq!(json["status"], "APPROVED");
}
