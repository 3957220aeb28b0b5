use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub i64);

impl Default for CompanyId {
    fn default() -> Self {
        CompanyId(1)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Asset => write!(f, "Asset"),
            AccountType::Liability => write!(f, "Liability"),
            AccountType::Equity => write!(f, "Equity"),
            AccountType::Revenue => write!(f, "Revenue"),
            AccountType::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Asset" => Ok(AccountType::Asset),
            "Liability" => Ok(AccountType::Liability),
            "Equity" => Ok(AccountType::Equity),
            "Revenue" => Ok(AccountType::Revenue),
            "Expense" => Ok(AccountType::Expense),
            other => Err(format!("Unknown account type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<AccountId>,
    pub company_id: CompanyId,
    pub name: String,
    pub account_type: AccountType,
}

pub const DEFAULT_COMPANY_NAME: &str = "LedgerAI Startup";

/// Chart of accounts created together with the default company.
pub const DEFAULT_ACCOUNTS: &[(&str, AccountType)] = &[
    ("Chase Checking", AccountType::Asset),
    ("Accounts Receivable", AccountType::Asset),
    ("Software Revenue", AccountType::Revenue),
    ("Stripe Processing Fees", AccountType::Expense),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_roundtrip() {
        for (_, ty) in DEFAULT_ACCOUNTS {
            assert_eq!(ty.to_string().parse::<AccountType>(), Ok(*ty));
        }
        assert!("Income".parse::<AccountType>().is_err());
    }

    #[test]
    fn default_company_is_one() {
        assert_eq!(CompanyId::default(), CompanyId(1));
    }
}
