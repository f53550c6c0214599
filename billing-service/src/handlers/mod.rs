pub mod customers;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod print;
pub mod products;
pub mod reports;
