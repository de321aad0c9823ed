use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::input::blank_as_none;

/// Loss reconciliation figures in whole Rupiah.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LossInput {
    pub selisih_plus: i64,
    pub selisih_minus: i64,
    pub ed_awal: i64,
}

/// Output of the loss calculator. `denda_akhir` keeps its sign; callers use
/// [`LossResult::penalty`] for the charged magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossResult {
    pub ed_akhir: i64,
    pub denda_akhir: i64,
}

impl LossResult {
    pub fn penalty(&self) -> i64 {
        self.denda_akhir.saturating_abs()
    }
}

/// Stock accuracy figures feeding the variance category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VarianceInput {
    pub nilai_plus: i64,
    pub nilai_minus: i64,
    pub ed_awal: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VarianceCategory {
    A,
    B,
    C,
}

impl VarianceCategory {
    pub const fn label(self) -> &'static str {
        match self {
            VarianceCategory::A => "A",
            VarianceCategory::B => "B",
            VarianceCategory::C => "C",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceResult {
    pub total: i64,
    pub kategori: VarianceCategory,
    pub denda: i64,
}

/// Store roles that can appear on an employee row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Jabatan {
    #[serde(rename = "Apoteker")]
    Apoteker,
    #[serde(rename = "Apoteker Pendamping")]
    ApotekerPendamping,
    #[serde(rename = "Health Advisor (HA)")]
    HealthAdvisor,
    #[serde(
        rename = "Tenaga Kefarmasian (TTK)",
        alias = "Asisten Apoteker (AA)",
        alias = "Asistent Apoteker (AA)"
    )]
    TenagaKefarmasian,
    #[serde(rename = "Branch Manager (BM)")]
    BranchManager,
}

impl Jabatan {
    pub const fn label(self) -> &'static str {
        match self {
            Jabatan::Apoteker => "Apoteker",
            Jabatan::ApotekerPendamping => "Apoteker Pendamping",
            Jabatan::HealthAdvisor => "Health Advisor (HA)",
            Jabatan::TenagaKefarmasian => "Tenaga Kefarmasian (TTK)",
            Jabatan::BranchManager => "Branch Manager (BM)",
        }
    }

    pub const fn ordered() -> [Jabatan; 5] {
        [
            Jabatan::Apoteker,
            Jabatan::ApotekerPendamping,
            Jabatan::HealthAdvisor,
            Jabatan::TenagaKefarmasian,
            Jabatan::BranchManager,
        ]
    }
}

impl fmt::Display for Jabatan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Jabatan {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if matches!(trimmed, "Asisten Apoteker (AA)" | "Asistent Apoteker (AA)") {
            return Ok(Jabatan::TenagaKefarmasian);
        }

        Jabatan::ordered()
            .into_iter()
            .find(|jabatan| jabatan.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel(trimmed.to_string()))
    }
}

/// Tenure bucket driving the junior discount and tenure weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasaKerja {
    #[serde(rename = "> 3 bulan")]
    MoreThanThreeMonths,
    #[serde(rename = "< 3 bulan")]
    LessThanThreeMonths,
}

impl MasaKerja {
    pub const fn label(self) -> &'static str {
        match self {
            MasaKerja::MoreThanThreeMonths => "> 3 bulan",
            MasaKerja::LessThanThreeMonths => "< 3 bulan",
        }
    }

    pub const fn is_junior(self) -> bool {
        matches!(self, MasaKerja::LessThanThreeMonths)
    }
}

impl fmt::Display for MasaKerja {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MasaKerja {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_ascii_lowercase().as_str() {
            ">3bulan" | "senior" => Ok(MasaKerja::MoreThanThreeMonths),
            "<3bulan" | "junior" => Ok(MasaKerja::LessThanThreeMonths),
            _ => Err(UnknownLabel(value.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised label '{0}'")]
pub struct UnknownLabel(pub String);

/// Stable identifier issued by [`super::Roster`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

/// One editable employee row. Rows only take part in the distribution once
/// `nama`, `jabatan` and `masa_kerja` are all filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(default)]
    pub id: EmployeeId,
    #[serde(default)]
    pub nama: String,
    #[serde(default)]
    pub nip: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub jabatan: Option<Jabatan>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub masa_kerja: Option<MasaKerja>,
}

impl EmployeeRecord {
    pub fn blank(id: EmployeeId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_named(&self) -> bool {
        !self.nama.trim().is_empty() && self.jabatan.is_some() && self.masa_kerja.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.nama.trim().is_empty()
            && self.nip.trim().is_empty()
            && self.jabatan.is_none()
            && self.masa_kerja.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaManagerInfo {
    #[serde(default)]
    pub nama: String,
    #[serde(default)]
    pub nip: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub masa_kerja: Option<MasaKerja>,
}

impl AreaManagerInfo {
    pub fn new(nama: impl Into<String>, nip: impl Into<String>, masa_kerja: Option<MasaKerja>) -> Self {
        Self {
            nama: nama.into(),
            nip: nip.into(),
            masa_kerja,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.nama.trim().is_empty()
    }
}

/// Role printed on a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LedgerRole {
    AreaManager,
    IncomingAreaManager,
    OutgoingAreaManager,
    Staff(Jabatan),
}

impl LedgerRole {
    pub const fn label(self) -> &'static str {
        match self {
            LedgerRole::AreaManager => "Area Manager",
            LedgerRole::IncomingAreaManager => "Area Manager (Baru)",
            LedgerRole::OutgoingAreaManager => "Area Manager (Lama)",
            LedgerRole::Staff(jabatan) => jabatan.label(),
        }
    }

    /// Sort key for the ledger: incoming/current AM, outgoing AM, BM, then staff.
    pub const fn rank(self) -> u8 {
        match self {
            LedgerRole::AreaManager | LedgerRole::IncomingAreaManager => 1,
            LedgerRole::OutgoingAreaManager => 2,
            LedgerRole::Staff(Jabatan::BranchManager) => 3,
            LedgerRole::Staff(_) => 4,
        }
    }

    pub const fn is_area_manager(self) -> bool {
        matches!(
            self,
            LedgerRole::AreaManager
                | LedgerRole::IncomingAreaManager
                | LedgerRole::OutgoingAreaManager
        )
    }
}

impl fmt::Display for LedgerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<LedgerRole> for String {
    fn from(value: LedgerRole) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for LedgerRole {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "Area Manager" => Ok(LedgerRole::AreaManager),
            "Area Manager (Baru)" => Ok(LedgerRole::IncomingAreaManager),
            "Area Manager (Lama)" => Ok(LedgerRole::OutgoingAreaManager),
            other => other.parse().map(LedgerRole::Staff),
        }
    }
}

/// One line of the penalty ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyDistributionItem {
    pub nama: String,
    pub jabatan: LedgerRole,
    pub masa_kerja: Option<MasaKerja>,
    pub nip: String,
    pub jumlah_denda: f64,
}
