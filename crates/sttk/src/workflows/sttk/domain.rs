use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::penalty::input::blank_as_none;
use crate::penalty::{
    AreaManagerInfo, EmployeeRecord, LedgerRole, LossInput, LossResult, MasaKerja,
    PenaltyComputation, PenaltyDistributionItem, PenaltyInputs, VarianceCategory, VarianceInput,
    VarianceResult,
};

/// Sequential identifier issued when a report is stored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReportId(pub u64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Verified => "Verified",
        }
    }
}

/// Who filed the report, for which outlet and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    #[serde(rename = "namaAM", default)]
    pub nama_am: String,
    #[serde(rename = "nipAM", default)]
    pub nip_am: String,
    #[serde(rename = "masaKerjaAM", default, deserialize_with = "blank_as_none")]
    pub masa_kerja_am: Option<MasaKerja>,
    #[serde(default)]
    pub area: String,
    #[serde(rename = "namaToko", default)]
    pub nama_toko: String,
    #[serde(rename = "tanggalSttk", default, deserialize_with = "blank_as_none")]
    pub tanggal_sttk: Option<NaiveDate>,
}

impl ReportHeader {
    pub fn area_manager(&self) -> AreaManagerInfo {
        AreaManagerInfo::new(
            self.nama_am.trim(),
            self.nip_am.trim(),
            self.masa_kerja_am,
        )
    }
}

/// File content as sent by the form: base64 without the data-URL prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    pub base64: String,
}

impl AttachmentPayload {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        base64: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFiles {
    pub bap: Option<AttachmentPayload>,
    pub expired_list: Option<AttachmentPayload>,
    pub photos: Vec<AttachmentPayload>,
}

/// Submission document. Client-side totals and ledgers, if present, are
/// ignored; the service recomputes them from `employees`, which must be sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(flatten)]
    pub header: ReportHeader,
    #[serde(default)]
    pub loss_details: LossInput,
    #[serde(default)]
    pub variance_details: VarianceInput,
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub is_am_changed: bool,
    #[serde(default)]
    pub outgoing_am: Option<AreaManagerInfo>,
    #[serde(default)]
    pub files: ReportFiles,
}

impl ReportRequest {
    pub fn penalty_inputs(&self) -> PenaltyInputs {
        PenaltyInputs {
            loss: self.loss_details,
            variance: self.variance_details,
            employees: self.employees.clone(),
            area_manager: self.header.area_manager(),
            is_am_changed: self.is_am_changed,
            outgoing_am: self.outgoing_am.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossDetails {
    pub selisih_plus: i64,
    pub selisih_minus: i64,
    pub ed_awal: i64,
    pub ed_akhir: i64,
    pub denda_akhir: i64,
}

impl LossDetails {
    pub fn new(input: &LossInput, result: &LossResult) -> Self {
        Self {
            selisih_plus: input.selisih_plus,
            selisih_minus: input.selisih_minus,
            ed_awal: input.ed_awal,
            ed_akhir: result.ed_akhir,
            denda_akhir: result.denda_akhir,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceDetails {
    pub nilai_plus: i64,
    pub nilai_minus: i64,
    pub ed_awal: i64,
    pub total: i64,
    pub kategori: VarianceCategory,
    pub denda: i64,
}

impl VarianceDetails {
    pub fn new(input: &VarianceInput, result: &VarianceResult) -> Self {
        Self {
            nilai_plus: input.nilai_plus,
            nilai_minus: input.nilai_minus,
            ed_awal: input.ed_awal,
            total: result.total,
            kategori: result.kategori,
            denda: result.denda,
        }
    }
}

/// What is kept of an uploaded file once the submission is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttachment {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentManifest {
    pub bap: StoredAttachment,
    pub expired_list: StoredAttachment,
    pub photos: Vec<StoredAttachment>,
}

/// A stored STTK report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SttkReport {
    pub id: ReportId,
    #[serde(flatten)]
    pub header: ReportHeader,
    pub status: ReportStatus,
    pub is_am_changed: bool,
    pub loss_details: LossDetails,
    pub variance_details: VarianceDetails,
    pub total_denda: i64,
    pub penalty_distribution: Vec<PenaltyDistributionItem>,
    pub files: AttachmentManifest,
}

impl SttkReport {
    pub fn from_computation(
        id: ReportId,
        request: &ReportRequest,
        computation: PenaltyComputation,
        files: AttachmentManifest,
    ) -> Self {
        Self {
            id,
            header: request.header.clone(),
            status: ReportStatus::Pending,
            is_am_changed: request.is_am_changed,
            loss_details: LossDetails::new(&request.loss_details, &computation.loss_result),
            variance_details: VarianceDetails::new(
                &request.variance_details,
                &computation.variance_result,
            ),
            total_denda: computation.total_penalty,
            penalty_distribution: computation.ledger,
            files,
        }
    }

    /// Tenure recorded on the ledger line of the filing Area Manager.
    pub fn area_manager_masa_kerja(&self) -> Option<MasaKerja> {
        self.penalty_distribution
            .iter()
            .find(|item| {
                matches!(
                    item.jabatan,
                    LedgerRole::AreaManager | LedgerRole::IncomingAreaManager
                )
            })
            .and_then(|item| item.masa_kerja)
    }

    pub fn loss_penalty(&self) -> i64 {
        self.loss_details.denda_akhir.saturating_abs()
    }
}

/// Reply to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub report_id: Option<ReportId>,
}

impl SubmissionReceipt {
    pub fn accepted(report_id: ReportId) -> Self {
        Self {
            success: true,
            message: "Laporan berhasil dikirim!".to_string(),
            report_id: Some(report_id),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            report_id: None,
        }
    }
}
