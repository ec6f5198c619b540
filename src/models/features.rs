//! Model input encoding for the ONNX classifier.
//!
//! The exported model expects the transaction type one-hot encoded,
//! followed by the five amounts, in the exact order below.

use crate::types::{TransactionRecord, TransactionType};

/// Number of features produced per record
pub const FEATURE_COUNT: usize = 9;

/// Encodes transactions into model input rows.
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode one record.
    pub fn encode(&self, tx: &TransactionRecord) -> [f32; FEATURE_COUNT] {
        let mut features = [0.0f32; FEATURE_COUNT];

        // One-hot transaction type (4)
        let slot = TransactionType::ALL
            .iter()
            .position(|&t| t == tx.tx_type)
            .unwrap_or_default();
        features[slot] = 1.0;

        // Amounts (5)
        features[4] = tx.amount as f32;
        features[5] = tx.old_balance_sender as f32;
        features[6] = tx.new_balance_sender as f32;
        features[7] = tx.old_balance_receiver as f32;
        features[8] = tx.new_balance_receiver as f32;

        features
    }

    /// Encode a batch as a row-major `[rows, FEATURE_COUNT]` buffer.
    pub fn encode_batch(&self, records: &[TransactionRecord]) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(records.len() * FEATURE_COUNT);
        for record in records {
            buffer.extend_from_slice(&self.encode(record));
        }
        buffer
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        vec![
            // One-hot type
            "type_PAYMENT",
            "type_TRANSFER",
            "type_CASH_OUT",
            "type_DEPOSIT",
            // Amounts
            "amount",
            "oldBalanceSender",
            "newBalanceSender",
            "oldBalanceReceiver",
            "newBalanceReceiver",
        ]
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tx_type: TransactionType) -> TransactionRecord {
        TransactionRecord {
            tx_type,
            amount: 1000.0,
            old_balance_sender: 5000.0,
            new_balance_sender: 4000.0,
            old_balance_receiver: 1000.0,
            new_balance_receiver: 2000.0,
        }
    }

    #[test]
    fn test_one_hot_type() {
        let encoder = FeatureEncoder::new();
        let features = encoder.encode(&record(TransactionType::CashOut));
        assert_eq!(&features[..4], &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&features[4..], &[1000.0, 5000.0, 4000.0, 1000.0, 2000.0]);
    }

    #[test]
    fn test_batch_is_row_major() {
        let encoder = FeatureEncoder::new();
        let buffer = encoder.encode_batch(&[record(TransactionType::Payment), record(TransactionType::Deposit)]);
        assert_eq!(buffer.len(), 2 * FEATURE_COUNT);
        assert_eq!(buffer[0], 1.0);
        assert_eq!(buffer[FEATURE_COUNT + 3], 1.0);
    }

    #[test]
    fn test_feature_count() {
        let encoder = FeatureEncoder::new();
        assert_eq!(encoder.feature_count(), 9);
        assert_eq!(encoder.feature_names().len(), 9);
    }
}
