use chrono::NaiveDate;
use ledgerai_core::{Money, NewTransaction, TransactionType};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// Zero-based positions of the fields in a bank statement export.
///
/// Without a `kind` column the sign of the amount decides the direction:
/// negative is money out (debit). In TOML, leaving `kind` out of a
/// `[statement.columns]` table selects signed amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementColumns {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub kind: Option<usize>,
}

impl Default for StatementColumns {
    fn default() -> Self {
        Self {
            date: 0,
            description: 1,
            amount: 2,
            kind: Some(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementProfile {
    pub columns: StatementColumns,
    pub has_header: bool,
    pub delimiter: String,
    pub date_format: String,
}

impl Default for StatementProfile {
    fn default() -> Self {
        Self {
            columns: StatementColumns::default(),
            has_header: true,
            delimiter: ",".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },
    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },
    #[error("Row {row}: invalid transaction type '{value}'")]
    InvalidType { row: usize, value: String },
    #[error("No data rows")]
    NoDataRows,
}

/// Parses a bank statement CSV into transactions ready for storage.
/// Amounts are stored unsigned; direction lives in the type.
pub fn import_statement<R: Read>(
    data: R,
    profile: &StatementProfile,
) -> Result<Vec<NewTransaction>, StatementError> {
    let delimiter = profile.delimiter.as_bytes().first().copied().unwrap_or(b',');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(profile.has_header)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let cols = &profile.columns;
    let mut transactions = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let row = idx + 1;
        let field = |column: usize| {
            record
                .get(column)
                .ok_or(StatementError::MissingColumn { row, column })
        };

        let raw_date = field(cols.date)?;
        let date = parse_date(raw_date, &profile.date_format).ok_or_else(|| {
            StatementError::InvalidDate { row, value: raw_date.to_string() }
        })?;

        let description = field(cols.description)?;

        let raw_amount = field(cols.amount)?;
        let amount: Money = raw_amount
            .parse()
            .map_err(|_| StatementError::InvalidAmount { row, value: raw_amount.to_string() })?;

        let kind = match cols.kind {
            Some(col) => {
                let raw = field(col)?;
                raw.parse::<TransactionType>()
                    .map_err(|_| StatementError::InvalidType { row, value: raw.to_string() })?
            }
            None if amount.is_negative() => TransactionType::Debit,
            None => TransactionType::Credit,
        };

        transactions.push(NewTransaction::new(date, description, amount.abs(), kind));
    }

    if transactions.is_empty() {
        return Err(StatementError::NoDataRows);
    }

    tracing::debug!(rows = transactions.len(), "Parsed bank statement");
    Ok(transactions)
}

fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, format) {
        return Some(date);
    }
    ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
