use serde::Deserialize;

/// Query parameters for the catalog and customer list endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}
