use super::domain::{ReportId, SttkReport};

/// Storage abstraction so the report service can be exercised in isolation.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: SttkReport) -> Result<SttkReport, RepositoryError>;
    fn update(&self, report: SttkReport) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ReportId) -> Result<Option<SttkReport>, RepositoryError>;
    /// Every stored report, ordered by id.
    fn list(&self) -> Result<Vec<SttkReport>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
