use serde::{Deserialize, Serialize};

use super::repository::RepositoryError;

const STANDARD_AREAS: [&str; 11] = [
    "Jakarta Utara",
    "Jakarta Barat",
    "Jakarta Timur",
    "Jakarta Pusat",
    "Jakarta Selatan",
    "Tangerang",
    "Tangerang Selatan",
    "Bekasi",
    "Bogor",
    "Depok",
    "Bandung",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaManagerOption {
    pub name: String,
    pub nip: String,
}

impl AreaManagerOption {
    pub fn new(name: impl Into<String>, nip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nip: nip.into(),
        }
    }
}

/// Choices offered by the report form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownOptions {
    pub am_options: Vec<AreaManagerOption>,
    pub toko_options: Vec<String>,
    pub area_options: Vec<String>,
}

impl DropdownOptions {
    pub fn area_manager_names(&self) -> Vec<String> {
        self.am_options
            .iter()
            .map(|option| option.name.clone())
            .collect()
    }
}

/// Source of the form's dropdown choices and the roster of known AMs.
pub trait OptionsProvider: Send + Sync {
    fn options(&self) -> Result<DropdownOptions, RepositoryError>;
}

/// Fixed option set held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    options: DropdownOptions,
}

impl StaticOptions {
    pub fn new(options: DropdownOptions) -> Self {
        Self { options }
    }

    /// The given AMs and outlets with the standard area list.
    pub fn standard(
        area_managers: Vec<AreaManagerOption>,
        outlets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(DropdownOptions {
            am_options: area_managers,
            toko_options: outlets.into_iter().map(Into::into).collect(),
            area_options: STANDARD_AREAS.iter().map(|area| area.to_string()).collect(),
        })
    }
}

impl OptionsProvider for StaticOptions {
    fn options(&self) -> Result<DropdownOptions, RepositoryError> {
        Ok(self.options.clone())
    }
}
