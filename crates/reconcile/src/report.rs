use ledgerai_core::InvoiceRecord;
use std::io::Write;

use crate::statement::StatementError;

pub const REPORT_HEADER: [&str; 5] = [
    "invoice_number",
    "vendor_name",
    "total_amount",
    "due_date",
    "reconciliation_status",
];

/// Writes stored invoices as CSV, one row per invoice in the given order.
pub fn write_invoice_report<W: Write>(
    out: W,
    invoices: &[InvoiceRecord],
) -> Result<(), StatementError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(REPORT_HEADER)?;
    for record in invoices {
        let inv = &record.invoice;
        let amount = format!("{:.2}", inv.total_amount.as_decimal());
        let status = record.status.to_string();
        writer.write_record([
            inv.invoice_number.as_str(),
            inv.vendor_name.as_str(),
            amount.as_str(),
            inv.due_date.as_str(),
            status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
