//! Typed interpretation of validated cells

use crate::error::{CellFailure, CoercionReason, TypeCoercionError};
use crate::schema::validator::ValidatedTable;
use crate::types::{BatchColumn, BatchRow, CanonicalField, RecordBatch, TransactionRecord, TransactionType};

fn parse_amount(raw: &str) -> Result<f64, CoercionReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoercionReason::Empty);
    }
    let value: f64 = trimmed.parse().map_err(|_| CoercionReason::NotANumber)?;
    check_amount(value)
}

fn check_amount(value: f64) -> Result<f64, CoercionReason> {
    if !value.is_finite() {
        Err(CoercionReason::NotANumber)
    } else if value < 0.0 {
        Err(CoercionReason::Negative)
    } else {
        // -0.0 would otherwise render as "-0"
        Ok(value + 0.0)
    }
}

fn parse_type(raw: &str) -> Result<TransactionType, CoercionReason> {
    if raw.trim().is_empty() {
        return Err(CoercionReason::Empty);
    }
    TransactionType::parse(raw).ok_or(CoercionReason::UnknownTransactionType)
}

/// Coerce every row of a validated table.
///
/// All failing cells are collected so the caller can report them together;
/// no row is dropped silently.
pub fn coerce(validated: &ValidatedTable) -> Result<RecordBatch, TypeCoercionError> {
    let table = validated.table();
    let passthrough = validated.passthrough_positions();

    let mut columns = Vec::with_capacity(table.columns.len());
    for (idx, name) in table.columns.iter().enumerate() {
        match CanonicalField::from_name(name) {
            Some(field) if validated.position(field) == idx => columns.push(BatchColumn::Field(field)),
            _ => {
                let slot = passthrough.iter().position(|&p| p == idx).unwrap_or_default();
                columns.push(BatchColumn::Passthrough {
                    name: name.clone(),
                    slot,
                });
            }
        }
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut failures = Vec::new();

    for (row_idx, cells) in table.rows.iter().enumerate() {
        let row_number = row_idx + 1;
        let cell = |field: CanonicalField| cells[validated.position(field)].as_str();

        let mut fail = |field: CanonicalField, reason: CoercionReason| {
            failures.push(CellFailure {
                row: row_number,
                field,
                value: cell(field).to_string(),
                reason,
            });
        };

        let tx_type = parse_type(cell(CanonicalField::Type))
            .map_err(|reason| fail(CanonicalField::Type, reason))
            .ok();

        let mut amounts = [0.0f64; 5];
        let mut amounts_ok = true;
        for (slot, field) in CanonicalField::ALL.into_iter().filter(|f| f.is_numeric()).enumerate() {
            match parse_amount(cell(field)) {
                Ok(value) => amounts[slot] = value,
                Err(reason) => {
                    fail(field, reason);
                    amounts_ok = false;
                }
            }
        }

        if let (Some(tx_type), true) = (tx_type, amounts_ok) {
            rows.push(BatchRow {
                record: TransactionRecord {
                    tx_type,
                    amount: amounts[0],
                    old_balance_sender: amounts[1],
                    new_balance_sender: amounts[2],
                    old_balance_receiver: amounts[3],
                    new_balance_receiver: amounts[4],
                },
                passthrough: passthrough.iter().map(|&p| cells[p].clone()).collect(),
                source_text: Some(CanonicalField::ALL.map(|field| cell(field).trim().to_string())),
            });
        }
    }

    if !failures.is_empty() {
        return Err(TypeCoercionError { failures });
    }

    Ok(RecordBatch { columns, rows })
}

/// Apply the same value rules to a record built directly by a caller.
pub fn check_record(record: &TransactionRecord) -> Result<(), TypeCoercionError> {
    let failures: Vec<CellFailure> = CanonicalField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = record.numeric(field)?;
            check_amount(value).err().map(|reason| CellFailure {
                row: 1,
                field,
                value: value.to_string(),
                reason,
            })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(TypeCoercionError { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{normalize, validate};
    use crate::types::RawTable;

    fn batch_from(csv: &str) -> Result<RecordBatch, TypeCoercionError> {
        let validated = validate(normalize(RawTable::from_csv_str(csv).unwrap())).unwrap();
        coerce(&validated)
    }

    #[test]
    fn test_coerce_reordered_columns() {
        let batch = batch_from(
            "amt,old_balance_sender,new_balance_sender,old_balance_receiver,new_balance_receiver,type\n\
             1000,5000,4000,1000,2000,payment\n",
        )
        .unwrap();

        assert_eq!(batch.len(), 1);
        let record = &batch.rows[0].record;
        assert_eq!(record.tx_type, TransactionType::Payment);
        assert_eq!(record.amount, 1000.0);
        assert_eq!(record.new_balance_receiver, 2000.0);
        assert_eq!(batch.columns[0], BatchColumn::Field(CanonicalField::Amount));
        assert_eq!(batch.columns[5], BatchColumn::Field(CanonicalField::Type));
    }

    #[test]
    fn test_passthrough_columns_keep_position_and_values() {
        let batch = batch_from(
            "id,type,amount,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver,note\n\
             a1,TRANSFER,1,1,0,0,1,first\n\
             a2,DEPOSIT,2,0,2,0,0,second\n",
        )
        .unwrap();

        assert_eq!(
            batch.columns[0],
            BatchColumn::Passthrough {
                name: "id".to_string(),
                slot: 0
            }
        );
        assert_eq!(
            batch.columns[7],
            BatchColumn::Passthrough {
                name: "note".to_string(),
                slot: 1
            }
        );
        assert_eq!(batch.rows[1].passthrough, vec!["a2", "second"]);
    }

    #[test]
    fn test_every_bad_cell_is_reported() {
        let err = batch_from(
            "type,amount,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver\n\
             PAYMENT,10,10,0,0,10\n\
             DEBIT,abc,10,0,,-5\n",
        )
        .unwrap_err();

        let summary: Vec<(usize, CanonicalField, CoercionReason)> =
            err.failures.iter().map(|f| (f.row, f.field, f.reason)).collect();
        assert_eq!(
            summary,
            vec![
                (2, CanonicalField::Type, CoercionReason::UnknownTransactionType),
                (2, CanonicalField::Amount, CoercionReason::NotANumber),
                (2, CanonicalField::OldBalanceReceiver, CoercionReason::Empty),
                (2, CanonicalField::NewBalanceReceiver, CoercionReason::Negative),
            ]
        );
        assert_eq!(err.failures[1].value, "abc");
    }

    #[test]
    fn test_source_text_is_kept_per_field() {
        let batch = batch_from(
            "amt,type,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver\n\
             \" 9007199254740993 \",cash_out,1000.50,0.10,0,2\n",
        )
        .unwrap();

        let text = batch.rows[0].source_text.as_ref().unwrap();
        assert_eq!(text[CanonicalField::Type.index()], "cash_out");
        assert_eq!(text[CanonicalField::Amount.index()], "9007199254740993");
        assert_eq!(text[CanonicalField::OldBalanceSender.index()], "1000.50");
        assert_eq!(text[CanonicalField::NewBalanceSender.index()], "0.10");
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let err = batch_from(
            "type,amount,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver\n\
             PAYMENT,NaN,inf,0,0,0\n",
        )
        .unwrap_err();
        assert_eq!(err.failures.len(), 2);
        assert!(err.failures.iter().all(|f| f.reason == CoercionReason::NotANumber));
    }

    #[test]
    fn test_check_record() {
        let mut record = TransactionRecord {
            tx_type: TransactionType::Payment,
            amount: 1000.0,
            old_balance_sender: 5000.0,
            new_balance_sender: 4000.0,
            old_balance_receiver: 1000.0,
            new_balance_receiver: 2000.0,
        };
        assert!(check_record(&record).is_ok());

        record.amount = -1.0;
        let err = check_record(&record).unwrap_err();
        assert_eq!(err.failures[0].field, CanonicalField::Amount);
        assert_eq!(err.failures[0].reason, CoercionReason::Negative);
    }
}
