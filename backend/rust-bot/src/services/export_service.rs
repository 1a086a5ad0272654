use std::path::{Path, PathBuf};

use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, warn};

use crate::metrics::EXPORTS_GENERATED_TOTAL;
use crate::models::StatsMap;

/// Writes the results spreadsheet next to the stats document.
#[derive(Debug, Clone)]
pub struct StatsExporter {
    path: PathBuf,
}

impl StatsExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort export: failures are logged and swallowed.
    pub async fn export(&self, stats: StatsMap) {
        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || write_xlsx(&path, &stats))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|inner| inner);

        EXPORTS_GENERATED_TOTAL
            .with_label_values(&[crate::metrics::status_label(&result)])
            .inc();

        match result {
            Ok(()) => info!(path = %self.path.display(), "stats spreadsheet exported"),
            Err(err) => warn!(error = %err, path = %self.path.display(), "stats export failed"),
        }
    }
}

pub fn build_xlsx(stats: &StatsMap) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_column_width(0, 24.0)?;
    worksheet.set_column_width(1, 24.0)?;
    worksheet.set_column_width(2, 18.0)?;

    let header_format = Format::new().set_bold();
    worksheet.write_string_with_format(0, 0, "Name", &header_format)?;
    worksheet.write_string_with_format(0, 1, "Surname", &header_format)?;
    worksheet.write_string_with_format(0, 2, "Correct answers", &header_format)?;

    let mut row = 1;
    for record in stats.values() {
        worksheet.write_string(row, 0, &record.first_name)?;
        if let Some(last_name) = record.last_name.as_deref() {
            worksheet.write_string(row, 1, last_name)?;
        }
        worksheet.write_number(row, 2, record.total_correct())?;
        row += 1;
    }

    Ok(workbook)
}

pub fn write_xlsx(path: &Path, stats: &StatsMap) -> Result<()> {
    let mut workbook = build_xlsx(stats)?;
    workbook.save(path)?;
    Ok(())
}
