use ledgerai_core::Money;
use rust_decimal::Decimal;

/// Default fee allowance: a bank line may fall short of the invoice by up to
/// five percent.
pub fn default_fee_ratio() -> Decimal {
    Decimal::new(5, 2)
}

/// True when the two amounts differ, but by no more than `ratio` of the
/// invoice amount.
///
/// Equal amounts are not "within fee tolerance" (they are exact). A
/// non-positive invoice amount or a negative bank amount never qualifies.
pub fn within_fee_tolerance(invoice_amount: Money, txn_amount: Money, ratio: Decimal) -> bool {
    if !invoice_amount.is_positive() || txn_amount.is_negative() {
        return false;
    }
    let diff = (invoice_amount - txn_amount).abs().as_decimal();
    let allowance = invoice_amount.as_decimal() * ratio;
    diff > Decimal::ZERO && diff <= allowance
}
