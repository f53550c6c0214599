pub mod customer;
pub mod invoice;
pub mod product;
pub mod report;

pub use customer::Customer;
pub use invoice::{Discount, DiscountKind, Invoice, InvoiceItem, InvoiceTotals, Tax, TaxKind};
pub use product::{CreateProduct, Product, UpdateProduct};
pub use report::{ProductSummary, ReportData, ReportRange, ReportType};
