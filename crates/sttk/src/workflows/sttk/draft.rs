use chrono::NaiveDate;

use crate::penalty::{
    parse_formatted_number, AreaManagerInfo, EmployeeId, EmployeeRecord, LossInput, MasaKerja,
    PenaltyComputation, PenaltyEngine, PenaltyInputs, Roster, RosterError, VarianceInput,
};

use super::domain::{ReportFiles, ReportHeader, ReportRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossField {
    SelisihPlus,
    SelisihMinus,
    EdAwal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceField {
    NilaiPlus,
    NilaiMinus,
    EdAwal,
}

/// In-progress report form.
///
/// Every mutation recomputes the whole penalty pipeline, so
/// [`ReportDraft::computation`] always reflects the current fields.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    engine: PenaltyEngine,
    header: ReportHeader,
    loss: LossInput,
    variance: VarianceInput,
    roster: Roster,
    is_am_changed: bool,
    outgoing_am: AreaManagerInfo,
    computation: PenaltyComputation,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self::new(PenaltyEngine::default())
    }
}

impl ReportDraft {
    pub fn new(engine: PenaltyEngine) -> Self {
        let computation = engine.compute(&PenaltyInputs::default());
        Self {
            engine,
            header: ReportHeader::default(),
            loss: LossInput::default(),
            variance: VarianceInput::default(),
            roster: Roster::new(),
            is_am_changed: false,
            outgoing_am: AreaManagerInfo::default(),
            computation,
        }
    }

    fn recompute(&mut self) {
        self.computation = self.engine.compute(&self.inputs());
    }

    pub fn inputs(&self) -> PenaltyInputs {
        PenaltyInputs {
            loss: self.loss,
            variance: self.variance,
            employees: self.roster.named().cloned().collect(),
            area_manager: self.header.area_manager(),
            is_am_changed: self.is_am_changed,
            outgoing_am: self.is_am_changed.then(|| self.outgoing_am.clone()),
        }
    }

    pub fn computation(&self) -> &PenaltyComputation {
        &self.computation
    }

    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn loss(&self) -> LossInput {
        self.loss
    }

    pub fn variance(&self) -> VarianceInput {
        self.variance
    }

    pub fn set_area_manager(&mut self, nama: &str, nip: &str) {
        self.header.nama_am = nama.trim().to_string();
        self.header.nip_am = nip.trim().to_string();
        self.recompute();
    }

    pub fn set_area_manager_tenure(&mut self, masa_kerja: Option<MasaKerja>) {
        self.header.masa_kerja_am = masa_kerja;
        self.recompute();
    }

    pub fn set_area(&mut self, area: &str) {
        self.header.area = area.trim().to_string();
    }

    pub fn set_outlet(&mut self, nama_toko: &str) {
        self.header.nama_toko = nama_toko.trim().to_string();
    }

    pub fn set_date(&mut self, tanggal_sttk: Option<NaiveDate>) {
        self.header.tanggal_sttk = tanggal_sttk;
    }

    /// Stores a typed loss amount after stripping currency formatting.
    pub fn set_loss_field(&mut self, field: LossField, raw: &str) {
        let value = parse_formatted_number(raw);
        match field {
            LossField::SelisihPlus => self.loss.selisih_plus = value,
            LossField::SelisihMinus => self.loss.selisih_minus = value,
            LossField::EdAwal => self.loss.ed_awal = value,
        }
        self.recompute();
    }

    pub fn set_variance_field(&mut self, field: VarianceField, raw: &str) {
        let value = parse_formatted_number(raw);
        match field {
            VarianceField::NilaiPlus => self.variance.nilai_plus = value,
            VarianceField::NilaiMinus => self.variance.nilai_minus = value,
            VarianceField::EdAwal => self.variance.ed_awal = value,
        }
        self.recompute();
    }

    pub fn add_blank_employee(&mut self) -> EmployeeId {
        self.roster.add_blank()
    }

    pub fn add_employee(&mut self, record: EmployeeRecord) -> EmployeeId {
        let id = self.roster.add_employee(record);
        self.recompute();
        id
    }

    pub fn update_employee<F>(&mut self, id: EmployeeId, edit: F) -> Result<(), RosterError>
    where
        F: FnOnce(&mut EmployeeRecord),
    {
        self.roster.update(id, edit)?;
        self.recompute();
        Ok(())
    }

    pub fn remove_employee(&mut self, id: EmployeeId) -> Result<EmployeeRecord, RosterError> {
        let removed = self.roster.remove(id)?;
        self.recompute();
        Ok(removed)
    }

    pub fn set_am_changed(&mut self, is_am_changed: bool) {
        self.is_am_changed = is_am_changed;
        self.recompute();
    }

    pub fn set_outgoing_am(&mut self, outgoing: AreaManagerInfo) {
        self.outgoing_am = outgoing;
        self.recompute();
    }

    /// Clears every field and leaves one blank roster row.
    pub fn reset(&mut self) {
        self.header = ReportHeader::default();
        self.loss = LossInput::default();
        self.variance = VarianceInput::default();
        self.roster.reset();
        self.is_am_changed = false;
        self.outgoing_am = AreaManagerInfo::default();
        self.recompute();
        tracing::debug!("report draft reset");
    }

    pub fn to_request(&self, files: ReportFiles) -> ReportRequest {
        let inputs = self.inputs();
        ReportRequest {
            header: self.header.clone(),
            loss_details: inputs.loss,
            variance_details: inputs.variance,
            employees: inputs.employees,
            is_am_changed: inputs.is_am_changed,
            outgoing_am: inputs.outgoing_am,
            files,
        }
    }
}
