//! Presentation of the forecast table: aligned text, CSV, or JSON.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::processor::{ForecastRow, ForecastTable};

/// Consumes a forecast table and renders or exports it.
pub trait Presenter {
    fn present(&self, table: &ForecastTable) -> Result<(), CoreError>;
}

const COLUMNS: [&str; 9] = [
    "system",
    "stream",
    "type",
    "name",
    "start_time",
    "forecast_hour",
    "time",
    "event",
    "status",
];

fn row_cells(row: &ForecastRow) -> [String; 9] {
    [
        row.system.clone(),
        row.stream.clone(),
        row.production_type.clone(),
        row.production_name.clone(),
        row.start_time.format("%Y%m%d%H").to_string(),
        row.forecast_hour.to_string(),
        row.time.to_rfc3339(),
        row.event.clone(),
        row.status.as_str().to_string(),
    ]
}

/// Prints the table to stdout with aligned columns and a latest-time footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintPresenter;

impl PrintPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Render the table to a string. Split out so the format is testable
    /// without capturing stdout.
    pub fn render(&self, table: &ForecastTable) -> String {
        let rows: Vec<[String; 9]> = table.rows().iter().map(row_cells).collect();
        let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = String::new();
        for (i, column) in COLUMNS.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{:<width$}", column, width = widths[i]));
        }
        out.push('\n');
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(&format!("{:<width$}", cell, width = widths[i]));
            }
            out.push('\n');
        }
        match table.latest_time() {
            Some(latest) => out.push_str(&format!("Latest time: {}\n", latest.to_rfc3339())),
            None => out.push_str("Latest time: -\n"),
        }
        out
    }
}

impl Presenter for PrintPresenter {
    fn present(&self, table: &ForecastTable) -> Result<(), CoreError> {
        print!("{}", self.render(table));
        Ok(())
    }
}

/// File export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ValidationError::InvalidValue {
                field: "output-type".to_string(),
                message: format!("expected 'csv' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Writes the table to a file as CSV or JSON.
#[derive(Debug, Clone)]
pub struct FileExportPresenter {
    format: ExportFormat,
    path: PathBuf,
}

impl FileExportPresenter {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }

    fn render_csv(table: &ForecastTable) -> String {
        let mut out = COLUMNS.join(",");
        out.push('\n');
        for row in table.rows() {
            let cells: Vec<String> = row_cells(row).iter().map(|c| csv_cell(c)).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

/// String fields come from upstream documents and may contain separators;
/// quote per RFC 4180 when needed.
fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

impl Presenter for FileExportPresenter {
    fn present(&self, table: &ForecastTable) -> Result<(), CoreError> {
        let mut file = File::create(&self.path)?;
        match self.format {
            ExportFormat::Csv => file.write_all(Self::render_csv(table).as_bytes())?,
            ExportFormat::Json => serde_json::to_writer_pretty(&mut file, table.rows())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{EventStatus, ProductionEventMessage};
    use crate::processor::TableProcessor;
    use chrono::{TimeZone, Utc};

    fn sample_table() -> ForecastTable {
        let messages = vec![ProductionEventMessage {
            system: "nwp_gfs".to_string(),
            stream: "oper".to_string(),
            production_type: "grib2".to_string(),
            production_name: "orig".to_string(),
            event: "before_upload".to_string(),
            status: EventStatus::Complete,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            forecast_hours: 36,
            time: Utc.with_ymd_and_hms(2024, 3, 1, 2, 14, 28).unwrap(),
        }];
        TableProcessor::new().process(&messages)
    }

    #[test]
    fn test_render_has_header_rows_and_footer() {
        let rendered = PrintPresenter::new().render(&sample_table());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("system"));
        assert!(lines[1].contains("nwp_gfs"));
        assert!(lines[1].contains("2024030100"));
        assert!(lines[2].starts_with("Latest time: 2024-03-01T02:14:28"));
    }

    #[test]
    fn test_render_empty_table() {
        let rendered = PrintPresenter::new().render(&ForecastTable::default());
        assert!(rendered.ends_with("Latest time: -\n"));
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let presenter = FileExportPresenter::new(ExportFormat::Csv, &path);
        presenter.present(&sample_table()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], COLUMNS.join(","));
        assert!(lines[1].starts_with("nwp_gfs,oper,grib2,orig,2024030100,36,"));
    }

    #[test]
    fn test_csv_export_quotes_separator_in_field() {
        let mut messages = vec![ProductionEventMessage {
            system: "nwp_gfs".to_string(),
            stream: "oper".to_string(),
            production_type: "grib2".to_string(),
            production_name: "orig".to_string(),
            event: "upload,retry".to_string(),
            status: EventStatus::Complete,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            forecast_hours: 36,
            time: Utc.with_ymd_and_hms(2024, 3, 1, 2, 14, 28).unwrap(),
        }];
        messages[0].production_name = "orig \"v2\"".to_string();
        let table = TableProcessor::new().process(&messages);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let presenter = FileExportPresenter::new(ExportFormat::Csv, &path);
        presenter.present(&table).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let line = written.lines().nth(1).unwrap();
        assert!(line.starts_with("nwp_gfs,oper,grib2,\"orig \"\"v2\"\"\",2024030100,36,"));
        assert!(line.contains("\"upload,retry\""));
    }

    #[test]
    fn test_json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let presenter = FileExportPresenter::new(ExportFormat::Json, &path);
        presenter.present(&sample_table()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["system"], "nwp_gfs");
        assert_eq!(value[0]["forecast_hour"], 36);
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
