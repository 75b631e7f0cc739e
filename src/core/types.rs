use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger coding for one invoice line.
///
/// Every field is optional: a form row that omits a group yields `None`
/// for the corresponding code, never a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInformation {
    /// Activity code (leading digits of the activity-account field).
    pub activity: Option<String>,
    /// Article code, passed through as entered.
    pub article: Option<String>,
    /// Cost-center code (leading digits of the cost-center field).
    pub cost_center: Option<String>,
    /// Department code (leading digits of the department field).
    pub department: Option<String>,
    /// Sub-account code (leading digits of the sub-account field).
    pub subaccount: Option<String>,
    /// Counterpart — the internal ledger counter-party code, supplied by
    /// the variant mapper rather than read from the row groups.
    pub counterpart: Option<String>,
}

/// One normalized invoice line, reconstructed from the row groups at a
/// single row index. Constructed once per index; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Free-text line descriptions, each truncated to 30 characters.
    pub descriptions: Vec<String>,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// Cost per unit.
    pub cost_per_unit: Decimal,
    /// VAT code as entered in the form.
    pub vat_code: String,
    /// Ledger coding for this line.
    pub account_information: AccountInformation,
}

/// Structured organization information, parsed from the platform's single
/// delimited string `number | name | street | care-of | zip city | motpart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub organization_number: String,
    pub name: String,
    pub street_address: String,
    /// May be empty — the form leaves the care-of slot blank for most
    /// organizations.
    pub care_of: String,
    pub zip_code: String,
    pub city: String,
    /// Raw counterpart field from the organization string.
    pub motpart: String,
}

/// Invoice payload of a [`NormalizedBillingRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Customer id in the billing processor (derived from counterpart or
    /// payer-administration digits, variant-dependent).
    pub customer_id: Option<String>,
    /// Invoice-level description, truncated to 30 characters.
    pub description: Option<String>,
    /// "Our reference" — the selling unit's name from the form.
    pub our_reference: Option<String>,
    /// Customer reference as entered in the form.
    pub customer_reference: Option<String>,
    /// External reference — the source flow-instance id.
    pub reference_id: String,
    /// Lines in ascending row-index order.
    pub rows: Vec<InvoiceLine>,
}

/// Invoice recipient — exactly one of three shapes, selected by the
/// variant mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// An external organization, parsed from the organization-information
    /// string.
    Organization {
        organization_name: String,
        street_address: String,
        care_of: Option<String>,
        zip_code: String,
        city: String,
    },
    /// An external private person.
    Person {
        first_name: String,
        last_name: String,
        street_address: String,
        zip_code: String,
        city: String,
    },
    /// The fixed internal legal entity (intra-municipal billing).
    Internal { name: String },
}

/// The normalized output of the engine: one record per successfully
/// processed form instance, handed to the downstream sender. Lifetime
/// ends at hand-off; nothing is shared between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBillingRecord {
    /// Billing category, fixed per mapper.
    pub category: String,
    /// Approval status, fixed: the e-service submission itself is the
    /// approval.
    pub status: String,
    /// Approving principal, fixed.
    pub approved_by: String,
    /// When the form was submitted, if the export carried a parseable
    /// timestamp.
    pub posted: Option<NaiveDateTime>,
    pub invoice: Invoice,
    pub recipient: Recipient,
    /// Form family that produced the instance.
    pub family_id: String,
    /// Source flow-instance id.
    pub flow_instance_id: String,
    /// Legal id of the recipient: organization number, social security
    /// number, or the internal entity's organization number.
    pub legal_id: Option<String>,
    /// True when the recipient is a private person and the legal id must
    /// be redacted downstream.
    pub private_person: bool,
}
