use crate::domain::invoice::{Invoice, InvoiceType};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct InvoiceRow<'a> {
    reference: &'a str,
    r#type: InvoiceType,
    amount: Decimal,
    amount_paid: Decimal,
    tax_amount: Decimal,
    payments: usize,
}

/// Writes invoice state as CSV, one row per invoice ordered by reference.
pub struct InvoiceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> InvoiceWriter<W> {
    /// Creates a new `InvoiceWriter` over any `Write` destination (e.g. Stdout, File).
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    /// Writes a header and one row per invoice, then flushes.
    pub fn write_invoices(&mut self, mut invoices: Vec<Invoice>) -> Result<()> {
        invoices.sort_by(|a, b| a.reference.cmp(&b.reference));
        for invoice in &invoices {
            self.writer.serialize(InvoiceRow {
                reference: &invoice.reference,
                r#type: invoice.r#type,
                amount: invoice.amount.normalize(),
                amount_paid: invoice.amount_paid.normalize(),
                tax_amount: invoice.tax_amount.normalize(),
                payments: invoice.payments.len(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
