use std::io::Write;

use serde::Serialize;

use super::domain::SttkReport;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

const HEADERS: [&str; 11] = [
    "ID",
    "Tanggal STTK",
    "Nama AM",
    "Area",
    "Nama Toko",
    "Status",
    "Denda Loss",
    "Kategori Varians",
    "Denda Varians",
    "Total Denda",
    "Jumlah Penanggung",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u64,
    tanggal_sttk: String,
    nama_am: &'a str,
    area: &'a str,
    nama_toko: &'a str,
    status: &'static str,
    denda_loss: i64,
    kategori: &'static str,
    denda_varians: i64,
    total_denda: i64,
    ledger_size: usize,
}

impl<'a> From<&'a SttkReport> for ExportRow<'a> {
    fn from(report: &'a SttkReport) -> Self {
        Self {
            id: report.id.0,
            tanggal_sttk: report
                .header
                .tanggal_sttk
                .map(|date| date.to_string())
                .unwrap_or_default(),
            nama_am: &report.header.nama_am,
            area: &report.header.area,
            nama_toko: &report.header.nama_toko,
            status: report.status.label(),
            denda_loss: report.loss_penalty(),
            kategori: report.variance_details.kategori.label(),
            denda_varians: report.variance_details.denda,
            total_denda: report.total_denda,
            ledger_size: report.penalty_distribution.len(),
        }
    }
}

/// Writes the header row, then one row per report.
pub fn export_csv<W: Write>(reports: &[SttkReport], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for report in reports {
        csv_writer.serialize(ExportRow::from(report))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv_string(reports: &[SttkReport]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    export_csv(reports, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
