mod catalog;
mod invoices;
mod reports;

pub use catalog::*;
pub use invoices::*;
pub use reports::*;
