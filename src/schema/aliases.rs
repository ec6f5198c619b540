//! Synonym table and header normalization.
//!
//! Spreadsheets from data providers name the same column many ways
//! (`amt`, `Amount `, `oldbalanceOrg`, ...). Every header is trimmed and
//! lowercased before lookup; unknown headers pass through untouched.

use crate::types::{CanonicalField, RawTable};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lowercase synonym -> canonical field. Every canonical name is also a key
/// (in lowercase) so normalizing twice is a no-op.
static FIELD_ALIASES: Lazy<HashMap<&'static str, CanonicalField>> = Lazy::new(|| {
    let entries: [(&str, CanonicalField); 24] = [
        ("type", CanonicalField::Type),
        ("transaction_type", CanonicalField::Type),
        ("transactiontype", CanonicalField::Type),
        ("txn_type", CanonicalField::Type),
        ("trans_type", CanonicalField::Type),
        ("amount", CanonicalField::Amount),
        ("amt", CanonicalField::Amount),
        ("transaction_amount", CanonicalField::Amount),
        ("oldbalancesender", CanonicalField::OldBalanceSender),
        ("old_balance_sender", CanonicalField::OldBalanceSender),
        ("oldbalanceorg", CanonicalField::OldBalanceSender),
        ("oldbalanceorig", CanonicalField::OldBalanceSender),
        ("newbalancesender", CanonicalField::NewBalanceSender),
        ("new_balance_sender", CanonicalField::NewBalanceSender),
        ("newbalanceorig", CanonicalField::NewBalanceSender),
        ("newbalanceorg", CanonicalField::NewBalanceSender),
        ("oldbalancereceiver", CanonicalField::OldBalanceReceiver),
        ("old_balance_receiver", CanonicalField::OldBalanceReceiver),
        ("oldbalancedest", CanonicalField::OldBalanceReceiver),
        ("oldbalancerecipient", CanonicalField::OldBalanceReceiver),
        ("newbalancereceiver", CanonicalField::NewBalanceReceiver),
        ("new_balance_receiver", CanonicalField::NewBalanceReceiver),
        ("newbalancedest", CanonicalField::NewBalanceReceiver),
        ("newbalancerecipient", CanonicalField::NewBalanceReceiver),
    ];
    entries.into_iter().collect()
});

/// Resolve a single header to its canonical field, if it is a known synonym.
pub fn lookup(name: &str) -> Option<CanonicalField> {
    FIELD_ALIASES
        .get(name.trim().to_lowercase().as_str())
        .copied()
}

/// Canonical name for a known synonym, otherwise the header unchanged.
pub fn normalize_column(name: &str) -> String {
    match lookup(name) {
        Some(field) => field.as_str().to_string(),
        None => name.to_string(),
    }
}

/// Rename headers in place order; no reordering.
pub fn normalize_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns.iter().map(|c| normalize_column(c.as_ref())).collect()
}

/// Rename the table's headers; cell data is never touched.
pub fn normalize(table: RawTable) -> RawTable {
    RawTable {
        columns: normalize_columns(&table.columns),
        rows: table.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_aliases_map_to_canonical() {
        for alias in ["old_balance_sender", "oldbalanceorg", "OLD_BALANCE_SENDER", "  oldBalanceOrg\t"] {
            assert_eq!(normalize_column(alias), "oldBalanceSender", "alias {alias:?}");
        }
    }

    #[test]
    fn test_every_alias_maps_to_its_canonical_name() {
        for (alias, field) in FIELD_ALIASES.iter() {
            assert_eq!(normalize_column(alias), field.as_str());
            assert_eq!(normalize_column(&alias.to_uppercase()), field.as_str());
        }
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_names() {
        let canonical: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(normalize_columns(&canonical), canonical);

        let once = normalize_columns(&["AMT", "Type", "merchant", "newbalanceDest"]);
        let twice = normalize_columns(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_columns_pass_through_unchanged() {
        assert_eq!(normalize_column(" Merchant ID"), " Merchant ID");
        assert_eq!(normalize_column("isFlaggedFraud"), "isFlaggedFraud");
    }

    #[test]
    fn test_normalize_keeps_order_and_data() {
        let table = RawTable::from_csv_str("amt,note,TYPE\n1,x,payment\n").unwrap();
        let normalized = normalize(table.clone());
        assert_eq!(normalized.columns, vec!["amount", "note", "type"]);
        assert_eq!(normalized.rows, table.rows);
    }
}
