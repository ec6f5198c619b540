//! Transaction data structures for the canonical input schema

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical transaction fields, in required-list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "oldBalanceSender")]
    OldBalanceSender,
    #[serde(rename = "newBalanceSender")]
    NewBalanceSender,
    #[serde(rename = "oldBalanceReceiver")]
    OldBalanceReceiver,
    #[serde(rename = "newBalanceReceiver")]
    NewBalanceReceiver,
}

impl CanonicalField {
    /// Every required field, in the order missing fields are reported.
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Type,
        CanonicalField::Amount,
        CanonicalField::OldBalanceSender,
        CanonicalField::NewBalanceSender,
        CanonicalField::OldBalanceReceiver,
        CanonicalField::NewBalanceReceiver,
    ];

    /// Canonical column name
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Type => "type",
            CanonicalField::Amount => "amount",
            CanonicalField::OldBalanceSender => "oldBalanceSender",
            CanonicalField::NewBalanceSender => "newBalanceSender",
            CanonicalField::OldBalanceReceiver => "oldBalanceReceiver",
            CanonicalField::NewBalanceReceiver => "newBalanceReceiver",
        }
    }

    /// Exact (case-sensitive) lookup of a canonical column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Position in [`CanonicalField::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_numeric(self) -> bool {
        self != CanonicalField::Type
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction category accepted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Payment,
    Transfer,
    CashOut,
    Deposit,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Payment,
        TransactionType::Transfer,
        TransactionType::CashOut,
        TransactionType::Deposit,
    ];

    /// Parse a raw cell; surrounding whitespace and case are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PAYMENT" => Some(TransactionType::Payment),
            "TRANSFER" => Some(TransactionType::Transfer),
            "CASH_OUT" => Some(TransactionType::CashOut),
            "DEPOSIT" => Some(TransactionType::Deposit),
            _ => None,
        }
    }

    /// Uppercase internal form, as written in templates and fed to models
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Payment => "PAYMENT",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::CashOut => "CASH_OUT",
            TransactionType::Deposit => "DEPOSIT",
        }
    }

    /// Capitalized form used in every rendered report.
    pub fn display_name(self) -> &'static str {
        match self {
            TransactionType::Payment => "Payment",
            TransactionType::Transfer => "Transfer",
            TransactionType::CashOut => "Cash Out",
            TransactionType::Deposit => "Deposit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transaction in the canonical schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    pub amount: f64,

    #[serde(rename = "oldBalanceSender")]
    pub old_balance_sender: f64,

    #[serde(rename = "newBalanceSender")]
    pub new_balance_sender: f64,

    #[serde(rename = "oldBalanceReceiver")]
    pub old_balance_receiver: f64,

    #[serde(rename = "newBalanceReceiver")]
    pub new_balance_receiver: f64,
}

impl TransactionRecord {
    /// Numeric value of a balance/amount field; `None` for `type`.
    pub fn numeric(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::Type => None,
            CanonicalField::Amount => Some(self.amount),
            CanonicalField::OldBalanceSender => Some(self.old_balance_sender),
            CanonicalField::NewBalanceSender => Some(self.new_balance_sender),
            CanonicalField::OldBalanceReceiver => Some(self.old_balance_receiver),
            CanonicalField::NewBalanceReceiver => Some(self.new_balance_receiver),
        }
    }

    /// Report text for a field.
    ///
    /// Numbers use the shortest representation that round-trips, so `1000.0`
    /// renders as `1000` and `0.1` never turns into `0.10000000000000001`.
    pub fn display_value(&self, field: CanonicalField) -> String {
        match self.numeric(field) {
            Some(value) => format!("{}", value),
            None => self.tx_type.display_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionRecord {
        TransactionRecord {
            tx_type: TransactionType::CashOut,
            amount: 1000.0,
            old_balance_sender: 5000.0,
            new_balance_sender: 4000.0,
            old_balance_receiver: 0.1,
            new_balance_receiver: 1234.56,
        }
    }

    #[test]
    fn test_transaction_type_parse_is_case_insensitive() {
        assert_eq!(TransactionType::parse("payment"), Some(TransactionType::Payment));
        assert_eq!(TransactionType::parse(" Cash_Out "), Some(TransactionType::CashOut));
        assert_eq!(TransactionType::parse("DEBIT"), None);
        assert_eq!(TransactionType::parse(""), None);
    }

    #[test]
    fn test_display_value_has_no_float_artifacts() {
        let record = sample();
        assert_eq!(record.display_value(CanonicalField::Amount), "1000");
        assert_eq!(record.display_value(CanonicalField::OldBalanceReceiver), "0.1");
        assert_eq!(record.display_value(CanonicalField::NewBalanceReceiver), "1234.56");
        assert_eq!(record.display_value(CanonicalField::Type), "Cash Out");
    }

    #[test]
    fn test_canonical_field_round_trip_by_name() {
        for field in CanonicalField::ALL {
            assert_eq!(CanonicalField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(CanonicalField::from_name("oldbalancesender"), None);
    }

    #[test]
    fn test_record_serializes_with_canonical_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "CASH_OUT");
        assert_eq!(json["oldBalanceSender"], 5000.0);
    }
}
