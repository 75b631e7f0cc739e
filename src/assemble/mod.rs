//! Assembly of normalized invoice lines from the row store.

use crate::core::{AccountInformation, BillingError, InvoiceLine};
use crate::decode::RowStore;
use crate::normalize::{leading_digits, to_decimal, truncate};

/// Downstream billing processor limit for free-text descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 30;

/// Build one [`InvoiceLine`] per row index `1..=row_count`, in ascending
/// index order.
///
/// The caller must have reconciled `row_count` first; under that
/// precondition a lookup miss at any index is an absent optional group
/// and yields an empty/zero value, never a failure. The only fatal
/// condition left is a quantity or price field that is not numeric.
/// `counterpart` is supplied by the variant mapper and passed through to
/// every line's account coding as given.
pub fn assemble_rows(
    store: &RowStore,
    row_count: usize,
    counterpart: Option<&str>,
) -> Result<Vec<InvoiceLine>, BillingError> {
    let mut rows = Vec::with_capacity(row_count);
    for index in 1..=row_count as u32 {
        let computation = store.computation(index);

        let descriptions = computation
            .and_then(|c| c.text.as_deref())
            .map(|text| truncate(text, MAX_DESCRIPTION_LEN).to_string())
            .into_iter()
            .collect();
        let quantity = to_decimal(computation.and_then(|c| c.quantity.as_deref()))?;
        let cost_per_unit = to_decimal(computation.and_then(|c| c.price.as_deref()))?;
        let vat_code = store
            .vat_rate(index)
            .and_then(|g| g.vat_rate.clone())
            .unwrap_or_default();

        let account_information = AccountInformation {
            activity: code_of(store.activity_account(index).and_then(|g| g.activity.as_deref())),
            article: store.article_account(index).and_then(|g| g.article.clone()),
            cost_center: code_of(
                store
                    .cost_center_account(index)
                    .and_then(|g| g.cost_center.as_deref()),
            ),
            department: code_of(
                store
                    .department_account(index)
                    .and_then(|g| g.department.as_deref()),
            ),
            subaccount: code_of(store.sub_account(index).and_then(|g| g.sub_account.as_deref())),
            counterpart: counterpart.map(str::to_string),
        };

        rows.push(InvoiceLine {
            descriptions,
            quantity,
            cost_per_unit,
            vat_code,
            account_information,
        });
    }
    Ok(rows)
}

/// Account fields arrive as picker values like `"510410 - Hamnar"`; the
/// ledger wants only the leading code digits.
fn code_of(value: Option<&str>) -> Option<String> {
    value.and_then(leading_digits).map(str::to_string)
}
