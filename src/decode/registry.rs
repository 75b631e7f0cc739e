//! The row-group registry: the closed set of recognized repeating
//! field-group categories and their attribute schemas.
//!
//! The source platform encodes these groups purely by tag naming
//! convention, so the registry replaces what would otherwise be runtime
//! reflection: a static lookup from type key to an empty prototype, and a
//! per-type field-assignment table expressed as plain match arms.

use serde::{Deserialize, Serialize};

/// Category of a repeating field-group. One logical invoice line is
/// spread across several of these, emitted as sibling groups sharing a
/// row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RowGroupType {
    /// Free text, quantity, and unit price for the line.
    Computation,
    /// Cost-center reference.
    CostCenterAccount,
    /// Sub-account reference.
    SubAccount,
    /// Department reference.
    DepartmentAccount,
    /// Activity reference.
    ActivityAccount,
    /// Project reference.
    ProjectAccount,
    /// Article reference.
    ArticleAccount,
    /// VAT rate selection.
    VatRate,
    /// Per-row sum as shown to the submitter; informational only.
    Summation,
}

impl RowGroupType {
    /// Tag stem the type is registered under, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Computation => "Computation",
            Self::CostCenterAccount => "CostCenterAccount",
            Self::SubAccount => "SubAccount",
            Self::DepartmentAccount => "DepartmentAccount",
            Self::ActivityAccount => "ActivityAccount",
            Self::ProjectAccount => "ProjectAccount",
            Self::ArticleAccount => "ArticleAccount",
            Self::VatRate => "VatRate",
            Self::Summation => "Summation",
        }
    }

    /// Construct an empty prototype for this type.
    pub fn new_group(&self) -> RowGroup {
        match self {
            Self::Computation => RowGroup::Computation(Computation::default()),
            Self::CostCenterAccount => RowGroup::CostCenterAccount(CostCenterAccount::default()),
            Self::SubAccount => RowGroup::SubAccount(SubAccount::default()),
            Self::DepartmentAccount => RowGroup::DepartmentAccount(DepartmentAccount::default()),
            Self::ActivityAccount => RowGroup::ActivityAccount(ActivityAccount::default()),
            Self::ProjectAccount => RowGroup::ProjectAccount(ProjectAccount::default()),
            Self::ArticleAccount => RowGroup::ArticleAccount(ArticleAccount::default()),
            Self::VatRate => RowGroup::VatRate(VatRate::default()),
            Self::Summation => RowGroup::Summation(Summation::default()),
        }
    }
}

/// Computation group: the only group carrying monetary text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Computation {
    pub text: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostCenterAccount {
    pub cost_center: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubAccount {
    pub sub_account: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentAccount {
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityAccount {
    pub activity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectAccount {
    pub project: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleAccount {
    pub article: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VatRate {
    pub vat_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summation {
    pub sum: Option<String>,
}

/// One populated occurrence of a [`RowGroupType`]. Immutable once the
/// decoder inserts it into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowGroup {
    Computation(Computation),
    CostCenterAccount(CostCenterAccount),
    SubAccount(SubAccount),
    DepartmentAccount(DepartmentAccount),
    ActivityAccount(ActivityAccount),
    ProjectAccount(ProjectAccount),
    ArticleAccount(ArticleAccount),
    VatRate(VatRate),
    Summation(Summation),
}

impl RowGroup {
    pub fn group_type(&self) -> RowGroupType {
        match self {
            Self::Computation(_) => RowGroupType::Computation,
            Self::CostCenterAccount(_) => RowGroupType::CostCenterAccount,
            Self::SubAccount(_) => RowGroupType::SubAccount,
            Self::DepartmentAccount(_) => RowGroupType::DepartmentAccount,
            Self::ActivityAccount(_) => RowGroupType::ActivityAccount,
            Self::ProjectAccount(_) => RowGroupType::ProjectAccount,
            Self::ArticleAccount(_) => RowGroupType::ArticleAccount,
            Self::VatRate(_) => RowGroupType::VatRate,
            Self::Summation(_) => RowGroupType::Summation,
        }
    }

    /// Assign the scalar attribute `attr` (normalized tag stem) from its
    /// text content. Returns `false` on a table miss — an attribute name
    /// this type does not accept — which the decoder logs and ignores.
    pub fn set(&mut self, attr: &str, value: &str) -> bool {
        let v = Some(value.to_string());
        match self {
            Self::Computation(g) => match attr {
                "text" => g.text = v,
                "quantity" => g.quantity = v,
                "price" => g.price = v,
                _ => return false,
            },
            Self::CostCenterAccount(g) => match attr {
                "costCenter" => g.cost_center = v,
                _ => return false,
            },
            Self::SubAccount(g) => match attr {
                "subAccount" => g.sub_account = v,
                _ => return false,
            },
            Self::DepartmentAccount(g) => match attr {
                "department" => g.department = v,
                _ => return false,
            },
            Self::ActivityAccount(g) => match attr {
                "activity" => g.activity = v,
                _ => return false,
            },
            Self::ProjectAccount(g) => match attr {
                "project" => g.project = v,
                _ => return false,
            },
            Self::ArticleAccount(g) => match attr {
                "article" => g.article = v,
                _ => return false,
            },
            Self::VatRate(g) => match attr {
                "vatRate" => g.vat_rate = v,
                _ => return false,
            },
            Self::Summation(g) => match attr {
                "sum" => g.sum = v,
                _ => return false,
            },
        }
        true
    }
}

/// Historical row-1-only tag stems. The platform emits the activity
/// group for row 1 under `Activity` and for rows ≥ 2 under
/// `ActivityAccount`; both are the same logical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Activity,
}

impl AliasKind {
    /// Canonical type the alias consolidates into.
    pub fn canonical(&self) -> RowGroupType {
        match self {
            Self::Activity => RowGroupType::ActivityAccount,
        }
    }

    pub fn new_group(&self) -> AliasGroup {
        match self {
            Self::Activity => AliasGroup::Activity(Activity::default()),
        }
    }
}

/// Alias shape of the activity group as emitted for row 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    pub activity: Option<String>,
}

/// A populated alias-shaped group, awaiting consolidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasGroup {
    Activity(Activity),
}

impl AliasGroup {
    /// Assignment table for the alias shape; mirrors [`RowGroup::set`].
    pub fn set(&mut self, attr: &str, value: &str) -> bool {
        match self {
            Self::Activity(g) => match attr {
                "activity" => g.activity = Some(value.to_string()),
                _ => return false,
            },
        }
        true
    }

    /// Field-by-field copy into the canonical shape. The alias type is
    /// never stored directly.
    pub fn consolidate(self) -> RowGroup {
        match self {
            Self::Activity(g) => RowGroup::ActivityAccount(ActivityAccount {
                activity: g.activity,
            }),
        }
    }
}

/// Outcome of a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Canonical(RowGroupType),
    Alias(AliasKind),
}

/// Resolve a type key (tag stem, first letter lower-cased) to a
/// row-group constructor. Matching is case-insensitive. The alias table
/// is consulted before the main registry. `None` is not an error: some
/// groups in the source documents are legitimately not consumed, and
/// the decoder skips them with a warning.
pub fn resolve(type_key: &str) -> Option<Resolved> {
    let key = type_key.to_ascii_lowercase();
    let alias = match key.as_str() {
        "activity" => Some(AliasKind::Activity),
        _ => None,
    };
    if let Some(alias) = alias {
        return Some(Resolved::Alias(alias));
    }
    let group_type = match key.as_str() {
        "computation" => RowGroupType::Computation,
        "costcenteraccount" => RowGroupType::CostCenterAccount,
        "subaccount" => RowGroupType::SubAccount,
        "departmentaccount" => RowGroupType::DepartmentAccount,
        "activityaccount" => RowGroupType::ActivityAccount,
        "projectaccount" => RowGroupType::ProjectAccount,
        "articleaccount" => RowGroupType::ArticleAccount,
        "vatrate" => RowGroupType::VatRate,
        "summation" => RowGroupType::Summation,
        _ => return None,
    };
    Some(Resolved::Canonical(group_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_keys_case_insensitively() {
        assert_eq!(
            resolve("computation"),
            Some(Resolved::Canonical(RowGroupType::Computation))
        );
        assert_eq!(
            resolve("costCenterAccount"),
            Some(Resolved::Canonical(RowGroupType::CostCenterAccount))
        );
        assert_eq!(
            resolve("VATRATE"),
            Some(Resolved::Canonical(RowGroupType::VatRate))
        );
        assert_eq!(resolve("somethingElse"), None);
    }

    #[test]
    fn alias_table_takes_precedence_and_consolidates() {
        let Some(Resolved::Alias(alias)) = resolve("activity") else {
            panic!("activity must resolve via the alias table");
        };
        assert_eq!(alias.canonical(), RowGroupType::ActivityAccount);

        let mut group = alias.new_group();
        assert!(group.set("activity", "330 - Utbildning"));
        assert!(!group.set("unknown", "x"));
        let canonical = group.consolidate();
        assert_eq!(
            canonical,
            RowGroup::ActivityAccount(ActivityAccount {
                activity: Some("330 - Utbildning".into())
            })
        );
    }

    #[test]
    fn assignment_table_reports_misses() {
        let mut group = RowGroupType::Computation.new_group();
        assert!(group.set("text", "Bra fakturatext1"));
        assert!(group.set("quantity", "3.0"));
        assert!(group.set("price", "567,89"));
        assert!(!group.set("color", "blue"));
        let RowGroup::Computation(c) = group else {
            panic!("constructor must match its type");
        };
        assert_eq!(c.text.as_deref(), Some("Bra fakturatext1"));
        assert_eq!(c.quantity.as_deref(), Some("3.0"));
        assert_eq!(c.price.as_deref(), Some("567,89"));
    }
}
