//! Read-only customer directory.
//!
//! Customers live as a JSON sequence under the `"customers"` key, seeded with
//! the default directory on first read. Invoices denormalize the customer
//! name at draft time; there is no write surface.

use crate::models::Customer;
use crate::services::metrics::STORE_OP_DURATION;
use crate::services::store::KeyValueStore;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;

const CUSTOMERS_KEY: &str = "customers";

pub struct CustomerDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl CustomerDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<Customer>, AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["customers_load"])
            .start_timer();
        let raw = self
            .store
            .get(CUSTOMERS_KEY)
            .await
            .map_err(AppError::StorageError)?;
        timer.observe_duration();

        match raw {
            None => {
                tracing::info!("No customers found, seeding default directory");
                let customers = default_customers();
                let encoded = serde_json::to_string(&customers).map_err(|e| {
                    AppError::InternalError(anyhow::anyhow!("Failed to encode customers: {}", e))
                })?;
                self.store
                    .set(CUSTOMERS_KEY, &encoded)
                    .await
                    .map_err(AppError::StorageError)?;
                Ok(customers)
            }
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(customers) => Ok(customers),
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed customer data, falling back to empty");
                    Ok(Vec::new())
                }
            },
        }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        self.load().await
    }

    /// Case-insensitive substring match on name or phone.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, AppError> {
        let needle = query.to_lowercase();
        let customers = self.load().await?;
        Ok(customers
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(&needle))
            .collect())
    }

    pub async fn get(&self, customer_id: &str) -> Result<Option<Customer>, AppError> {
        let customers = self.load().await?;
        Ok(customers.into_iter().find(|c| c.id == customer_id))
    }
}

fn seed(id: &str, name: &str, phone: &str, address: &str, balance: Decimal) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        outstanding_balance: balance,
    }
}

/// Built-in default directory, written on first read of an empty store.
pub fn default_customers() -> Vec<Customer> {
    vec![
        seed(
            "cust-001",
            "Star General Store",
            "9876543210",
            "123 Main St, Cityville",
            Decimal::new(150050, 2),
        ),
        seed(
            "cust-002",
            "Quick Mart",
            "8765432109",
            "456 Oak Ave, Townsville",
            Decimal::ZERO,
        ),
        seed(
            "cust-003",
            "Daily Needs",
            "7654321098",
            "789 Pine Ln, Villageton",
            Decimal::new(32000, 2),
        ),
        seed(
            "cust-004",
            "Honest Grocers",
            "6543210987",
            "101 Maple Dr, Suburbia",
            Decimal::new(854075, 2),
        ),
        seed(
            "cust-005",
            "Beverage Corner",
            "5432109876",
            "212 Birch Rd, Hamlet",
            Decimal::new(21000, 2),
        ),
    ]
}
