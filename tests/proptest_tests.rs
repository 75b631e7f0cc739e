//! Property-based tests for the normalizer and the reconciler.

use formfaktura::decode::reconcile::reconciled_row_count;
use formfaktura::decode::{RowGroupType, RowStore};
use formfaktura::normalize::{
    leading_digits, pad_counterpart, to_decimal, trailing_digits, truncate,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    /// Integer amounts survive arbitrary non-numeric currency noise
    /// around them.
    #[test]
    fn to_decimal_recovers_integers_from_noise(
        digits in "[0-9]{1,12}",
        prefix in "[A-Za-zåäö ]{0,6}",
        suffix in "[A-Za-zåäö ]{0,6}",
    ) {
        let expected: Decimal = digits.parse().unwrap();
        let noisy = format!("{prefix}{digits}{suffix}");
        prop_assert_eq!(to_decimal(Some(&noisy)).unwrap(), expected);
    }

    /// Comma and dot decimal separators parse to the same value.
    #[test]
    fn to_decimal_treats_comma_as_dot(
        int_part in "[0-9]{1,10}",
        frac_part in "[0-9]{1,4}",
        suffix in "( SEK| kr|)",
    ) {
        let expected: Decimal = format!("{int_part}.{frac_part}").parse().unwrap();
        let with_comma = format!("{int_part},{frac_part}{suffix}");
        let with_dot = format!("{int_part}.{frac_part}{suffix}");
        prop_assert_eq!(to_decimal(Some(&with_comma)).unwrap(), expected);
        prop_assert_eq!(to_decimal(Some(&with_dot)).unwrap(), expected);
    }

    /// A digit run followed by non-digit text is recovered exactly.
    #[test]
    fn leading_digits_recovers_the_prefix_run(
        digits in "[0-9]{1,10}",
        rest in "[ a-zA-Z-][ a-zA-Z0-9-]{0,10}",
    ) {
        let text = format!("{digits}{rest}");
        prop_assert_eq!(leading_digits(&text), Some(digits.as_str()));
    }

    /// Symmetric property for the suffix run.
    #[test]
    fn trailing_digits_recovers_the_suffix_run(
        rest in "[ a-zA-Z-]{0,10}[ a-zA-Z-]",
        digits in "[0-9]{1,10}",
    ) {
        let text = format!("{rest}{digits}");
        prop_assert_eq!(trailing_digits(&text), Some(digits.as_str()));
    }

    #[test]
    fn digit_runs_absent_without_digits(text in "[ a-zA-Zåäö,.-]{0,20}") {
        prop_assert_eq!(leading_digits(&text), None);
        prop_assert_eq!(trailing_digits(&text), None);
    }

    /// Counterpart codes are always exactly eight characters and start
    /// with the trailing digit run of the input.
    #[test]
    fn pad_counterpart_is_eight_wide(
        label in "[a-zA-Z ]{0,8}",
        digits in "[0-9]{1,8}",
    ) {
        let padded = pad_counterpart(Some(&format!("{label}{digits}"))).unwrap();
        prop_assert_eq!(padded.len(), 8);
        prop_assert!(padded.starts_with(&digits));
        prop_assert!(padded[digits.len()..].chars().all(|c| c == '0'));
    }

    /// Truncation never exceeds the limit, never splits a character, and
    /// always yields a prefix of the input.
    #[test]
    fn truncate_is_a_bounded_prefix(text in ".{0,60}", max_len in 0usize..40) {
        let cut = truncate(&text, max_len);
        prop_assert!(cut.chars().count() <= max_len);
        prop_assert!(text.starts_with(cut));
    }

    /// Uniformly populated stores reconcile to the common count; adding
    /// a single extra occurrence of one family breaks reconciliation.
    #[test]
    fn reconciliation_accepts_uniform_rejects_uneven(
        rows in 1u32..6,
        families in prop::sample::subsequence(
            vec![
                RowGroupType::Computation,
                RowGroupType::VatRate,
                RowGroupType::CostCenterAccount,
                RowGroupType::DepartmentAccount,
            ],
            1..=4,
        ),
    ) {
        let mut store = RowStore::new();
        for family in &families {
            for index in 1..=rows {
                store.insert(index, family.new_group());
            }
        }
        prop_assert_eq!(reconciled_row_count(&store).unwrap(), rows as usize);

        // SubAccount populated one row deeper than everything else.
        store.insert(rows + 1, RowGroupType::SubAccount.new_group());
        for index in 1..=rows {
            store.insert(index, RowGroupType::SubAccount.new_group());
        }
        prop_assert!(reconciled_row_count(&store).is_err());
    }
}
