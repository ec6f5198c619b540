//! Presence check for the canonical schema.
//!
//! Only column presence is checked here; value parsing belongs to
//! [`crate::schema::coerce`].

use crate::error::SchemaError;
use crate::types::{CanonicalField, RawTable};

/// A normalized table known to carry every canonical column exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTable {
    table: RawTable,
    positions: [usize; 6],
}

impl ValidatedTable {
    pub fn table(&self) -> &RawTable {
        &self.table
    }

    /// Column index of a canonical field in the input table
    pub fn position(&self, field: CanonicalField) -> usize {
        self.positions[field.index()]
    }

    /// Indices of columns that are not canonical fields, in input order.
    pub fn passthrough_positions(&self) -> Vec<usize> {
        (0..self.table.columns.len())
            .filter(|idx| !self.positions.contains(idx))
            .collect()
    }

    pub fn into_table(self) -> RawTable {
        self.table
    }
}

/// Required fields absent from `columns`, in required-list order.
pub fn missing_fields<S: AsRef<str>>(columns: &[S]) -> Vec<CanonicalField> {
    CanonicalField::ALL
        .into_iter()
        .filter(|field| !columns.iter().any(|c| c.as_ref() == field.as_str()))
        .collect()
}

/// Check a normalized table against the required field list.
///
/// Fails with the literal missing list first; then with a duplicate if two
/// input columns resolved to the same field; then if there are no rows or a
/// row is not as wide as the header. Extra columns never affect the outcome.
pub fn validate(table: RawTable) -> Result<ValidatedTable, SchemaError> {
    let missing = missing_fields(&table.columns);
    if !missing.is_empty() {
        return Err(SchemaError::MissingFields { missing });
    }

    let mut positions = [usize::MAX; 6];
    for (idx, name) in table.columns.iter().enumerate() {
        if let Some(field) = CanonicalField::from_name(name) {
            if positions[field.index()] != usize::MAX {
                return Err(SchemaError::DuplicateField { field });
            }
            positions[field.index()] = idx;
        }
    }

    if table.rows.is_empty() {
        return Err(SchemaError::NoRows);
    }

    let expected = table.columns.len();
    if let Some((idx, row)) = table.rows.iter().enumerate().find(|(_, row)| row.len() != expected) {
        return Err(SchemaError::RowWidth {
            row: idx + 1,
            expected,
            actual: row.len(),
        });
    }

    Ok(ValidatedTable { table, positions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::aliases::normalize;

    const FULL_HEADER: &str =
        "type,amount,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver";

    #[test]
    fn test_missing_fields_in_required_order() {
        let columns = ["newBalanceReceiver", "amount", "extra"];
        assert_eq!(
            missing_fields(&columns),
            vec![
                CanonicalField::Type,
                CanonicalField::OldBalanceSender,
                CanonicalField::NewBalanceSender,
                CanonicalField::OldBalanceReceiver,
            ]
        );
    }

    #[test]
    fn test_every_subset_reports_exact_complement() {
        for mask in 0u32..64 {
            let present: Vec<&str> = CanonicalField::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| f.as_str())
                .collect();
            let expected: Vec<CanonicalField> = CanonicalField::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) == 0)
                .map(|(_, f)| *f)
                .collect();
            assert_eq!(missing_fields(&present), expected, "mask {mask:06b}");
        }
    }

    #[test]
    fn test_validate_succeeds_with_extra_columns() {
        let csv = format!("note,{FULL_HEADER}\nhello,PAYMENT,1,2,1,0,1\n");
        let validated = validate(RawTable::from_csv_str(&csv).unwrap()).unwrap();
        assert_eq!(validated.position(CanonicalField::Type), 1);
        assert_eq!(validated.position(CanonicalField::NewBalanceReceiver), 6);
        assert_eq!(validated.passthrough_positions(), vec![0]);
    }

    #[test]
    fn test_validate_missing_type() {
        let table = normalize(
            RawTable::from_csv_str(
                "amt,old_balance_sender,new_balance_sender,old_balance_receiver,new_balance_receiver\n1,2,1,0,1\n",
            )
            .unwrap(),
        );
        let err = validate(table).unwrap_err();
        assert_eq!(err.missing_field_names(), vec!["type"]);
    }

    #[test]
    fn test_validate_duplicate_after_normalization() {
        let table = normalize(
            RawTable::from_csv_str(&format!("amt,{FULL_HEADER}\n5,PAYMENT,5,1,1,0,5\n")).unwrap(),
        );
        assert_eq!(
            validate(table).unwrap_err(),
            SchemaError::DuplicateField {
                field: CanonicalField::Amount
            }
        );
    }

    #[test]
    fn test_validate_rejects_header_only_input() {
        let table = RawTable::from_csv_str(&format!("{FULL_HEADER}\n")).unwrap();
        assert_eq!(validate(table).unwrap_err(), SchemaError::NoRows);
    }

    #[test]
    fn test_validate_rejects_short_and_long_rows() {
        let columns: Vec<String> = FULL_HEADER.split(',').map(str::to_string).collect();
        let full: Vec<String> = ["PAYMENT", "1", "1", "0", "0", "1"].map(String::from).to_vec();

        let short = RawTable::new(columns.clone(), vec![full.clone(), vec!["PAYMENT".into(), "1".into()]]);
        assert_eq!(
            validate(short).unwrap_err(),
            SchemaError::RowWidth {
                row: 2,
                expected: 6,
                actual: 2
            }
        );

        let mut wide_row = full.clone();
        wide_row.push("extra".into());
        let long = RawTable::new(columns, vec![wide_row]);
        assert!(matches!(
            validate(long),
            Err(SchemaError::RowWidth { row: 1, actual: 7, .. })
        ));
    }
}
