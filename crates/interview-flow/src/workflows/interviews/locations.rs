use serde::{Deserialize, Serialize};

use super::domain::OfficeLocationId;

/// Read-only reference data owned by the external office directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeLocation {
    pub id: OfficeLocationId,
    pub name: String,
    pub address: String,
    pub hours: String,
}

/// Lookup boundary consulted at interview creation and for the office
/// listing endpoint.
pub trait OfficeLocationDirectory: Send + Sync {
    fn get(&self, id: &OfficeLocationId) -> Result<Option<OfficeLocation>, DirectoryError>;
    fn active(&self) -> Result<Vec<OfficeLocation>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("office directory unavailable: {0}")]
    Unavailable(String),
}
