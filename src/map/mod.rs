//! Variant mapping: from a decoded form to a normalized billing record.
//!
//! The dispatcher selects a mapper by form family; the billing-request
//! mapper then branches on recipient classification. The branch is
//! decided by the presence of the `payingAdministration` scalar (its
//! presence means intra-municipal billing), not by a separate flag field.

use crate::assemble::{MAX_DESCRIPTION_LEN, assemble_rows};
use crate::core::{BillingError, Invoice, NormalizedBillingRecord, Recipient};
use crate::decode::DecodedForm;
use crate::decode::reconcile::reconciled_row_count;
use crate::normalize::{
    leading_digits, pad_counterpart, parse_organization_info, prefix_counterpart, trailing_digits,
    truncate_opt,
};

/// Form families with a registered variant mapper: the billing-request
/// form, first and second generation.
const BILLING_REQUEST_FAMILIES: [&str; 2] = ["356", "358"];

/// Billing category for records produced from e-service forms.
pub const CATEGORY_CUSTOMER_INVOICE: &str = "CUSTOMER_INVOICE";
/// The e-service submission itself constitutes approval.
pub const STATUS_APPROVED: &str = "APPROVED";
pub const APPROVED_BY: &str = "E_SERVICE";

/// Fixed recipient identity for internal billing.
pub const INTERNAL_RECIPIENT_NAME: &str = "Ankeborgs kommun";
pub const INTERNAL_ORGANIZATION_NUMBER: &str = "2120000142";

/// Literal marking a private-person recipient in the form's recipient
/// picker.
const PRIVATE_PERSON_MARKER: &str = "Privatperson";

/// Families this crate can map. Callers use this to scope their
/// instance listing.
pub fn registered_families() -> &'static [&'static str] {
    &BILLING_REQUEST_FAMILIES
}

/// Map a decoded form to a billing record via the mapper registered for
/// its family. Unknown families fail with
/// [`BillingError::UnsupportedFamily`].
pub fn map_form(form: &DecodedForm) -> Result<NormalizedBillingRecord, BillingError> {
    if BILLING_REQUEST_FAMILIES.contains(&form.family_id.as_str()) {
        map_billing_request(form)
    } else {
        Err(BillingError::UnsupportedFamily {
            family_id: form.family_id.clone(),
        })
    }
}

/// The billing-request mapper: internal, external-organization, or
/// external-person variant.
fn map_billing_request(form: &DecodedForm) -> Result<NormalizedBillingRecord, BillingError> {
    let row_count = reconciled_row_count(&form.rows)?;
    if form.scalar("payingAdministration").is_some() {
        map_internal(form, row_count)
    } else {
        map_external(form, row_count)
    }
}

fn map_internal(
    form: &DecodedForm,
    row_count: usize,
) -> Result<NormalizedBillingRecord, BillingError> {
    // Presence checked by the caller; the picker value looks like
    // "70 - Gatukontoret".
    let paying_administration = form.scalar("payingAdministration");
    let customer_id = paying_administration
        .and_then(leading_digits)
        .map(str::to_string);
    let counterpart = prefix_counterpart(customer_id.as_deref());
    let rows = assemble_rows(&form.rows, row_count, counterpart.as_deref())?;

    Ok(build_record(
        form,
        build_invoice(form, customer_id, rows),
        Recipient::Internal {
            name: INTERNAL_RECIPIENT_NAME.to_string(),
        },
        Some(INTERNAL_ORGANIZATION_NUMBER.to_string()),
        false,
    ))
}

fn map_external(
    form: &DecodedForm,
    row_count: usize,
) -> Result<NormalizedBillingRecord, BillingError> {
    let recipient_kind = form.scalar("recipient").unwrap_or_default();
    if recipient_kind.contains(PRIVATE_PERSON_MARKER) {
        map_external_person(form, row_count)
    } else {
        map_external_organization(form, row_count)
    }
}

fn map_external_person(
    form: &DecodedForm,
    row_count: usize,
) -> Result<NormalizedBillingRecord, BillingError> {
    let counterpart_field = form.scalar("counterpart");
    let customer_id = counterpart_field
        .and_then(trailing_digits)
        .map(str::to_string);
    let counterpart = pad_counterpart(counterpart_field);
    let rows = assemble_rows(&form.rows, row_count, counterpart.as_deref())?;

    let recipient = Recipient::Person {
        first_name: scalar_or_empty(form, "firstname"),
        last_name: scalar_or_empty(form, "lastname"),
        street_address: scalar_or_empty(form, "address"),
        zip_code: scalar_or_empty(form, "zipCode"),
        city: scalar_or_empty(form, "city"),
    };
    let legal_id = form.scalar("socialSecurityNumber").map(str::to_string);

    Ok(build_record(
        form,
        build_invoice(form, customer_id, rows),
        recipient,
        legal_id,
        true,
    ))
}

fn map_external_organization(
    form: &DecodedForm,
    row_count: usize,
) -> Result<NormalizedBillingRecord, BillingError> {
    let info = parse_organization_info(form.scalar("organizationInformation").unwrap_or_default())?;
    let customer_id = trailing_digits(&info.motpart).map(str::to_string);
    let counterpart = pad_counterpart(Some(&info.motpart));
    let rows = assemble_rows(&form.rows, row_count, counterpart.as_deref())?;

    let recipient = Recipient::Organization {
        organization_name: info.name,
        street_address: info.street_address,
        care_of: (!info.care_of.is_empty()).then_some(info.care_of),
        zip_code: info.zip_code,
        city: info.city,
    };

    Ok(build_record(
        form,
        build_invoice(form, customer_id, rows),
        recipient,
        Some(info.organization_number),
        false,
    ))
}

/// Invoice payload shared by every variant; only the customer id and
/// the counterpart fed to the assembler differ.
fn build_invoice(
    form: &DecodedForm,
    customer_id: Option<String>,
    rows: Vec<crate::core::InvoiceLine>,
) -> Invoice {
    Invoice {
        customer_id,
        description: truncate_opt(form.scalar("description"), MAX_DESCRIPTION_LEN),
        our_reference: form.scalar("seller").map(str::to_string),
        customer_reference: form.scalar("reference").map(str::to_string),
        reference_id: form.flow_instance_id.clone(),
        rows,
    }
}

fn build_record(
    form: &DecodedForm,
    invoice: Invoice,
    recipient: Recipient,
    legal_id: Option<String>,
    private_person: bool,
) -> NormalizedBillingRecord {
    NormalizedBillingRecord {
        category: CATEGORY_CUSTOMER_INVOICE.to_string(),
        status: STATUS_APPROVED.to_string(),
        approved_by: APPROVED_BY.to_string(),
        posted: form.posted,
        invoice,
        recipient,
        family_id: form.family_id.clone(),
        flow_instance_id: form.flow_instance_id.clone(),
        legal_id,
        private_person,
    }
}

fn scalar_or_empty(form: &DecodedForm, key: &str) -> String {
    form.scalar(key).unwrap_or_default().to_string()
}
