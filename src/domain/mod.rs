//! Invoice and payment types, the tax policy and the storage port.

pub mod invoice;
pub mod outcome;
pub mod payment;
pub mod ports;
pub mod tax;
