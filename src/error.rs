use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PaymentError {
    #[error("There is no invoice matching this payment")]
    #[diagnostic(code(invoice::no_matching_invoice))]
    NoMatchingInvoice,

    #[error("The invoice is in an invalid state, it has an amount of 0 and it has payments.")]
    #[diagnostic(
        code(invoice::invalid_state),
        help("a zero-amount invoice must not carry payment history; check the stored record")
    )]
    InvalidInvoiceState,

    #[error("Unsupported invoice type: {0}")]
    #[diagnostic(code(invoice::unsupported_type), help("expected `standard` or `commercial`"))]
    UnsupportedInvoiceType(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(invoice::validation))]
    ValidationError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
