use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a bank-statement line. Debits are money leaving the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Debit => write!(f, "Debit"),
            TransactionType::Credit => write!(f, "Credit"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(TransactionType::Debit),
            "credit" => Ok(TransactionType::Credit),
            other => Err(format!("Unknown transaction type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    Unreconciled,
    Reconciled,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Unreconciled => write!(f, "Unreconciled"),
            TransactionStatus::Reconciled => write!(f, "Reconciled"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unreconciled" => Ok(TransactionStatus::Unreconciled),
            "reconciled" => Ok(TransactionStatus::Reconciled),
            other => Err(format!("Unknown transaction status: '{other}'")),
        }
    }
}

/// One bank-statement line as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.kind == TransactionType::Debit
    }
}

/// A statement line that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionType,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, description: &str, amount: Money, kind: TransactionType) -> Self {
        NewTransaction {
            date,
            description: description.to_string(),
            amount,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_is_case_insensitive() {
        assert_eq!("Debit".parse::<TransactionType>(), Ok(TransactionType::Debit));
        assert_eq!("DEBIT".parse::<TransactionType>(), Ok(TransactionType::Debit));
        assert_eq!(" credit ".parse::<TransactionType>(), Ok(TransactionType::Credit));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn status_roundtrip() {
        for status in [TransactionStatus::Unreconciled, TransactionStatus::Reconciled] {
            assert_eq!(status.to_string().parse::<TransactionStatus>(), Ok(status));
        }
    }

    #[test]
    fn serializes_kind_as_type() {
        let tx = Transaction {
            id: TransactionId(7),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            description: "Amazon Web Services".to_string(),
            amount: Money::from_cents(15_000),
            kind: TransactionType::Debit,
            status: TransactionStatus::Unreconciled,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["status"], "Unreconciled");
        assert!(tx.is_debit());
    }
}
