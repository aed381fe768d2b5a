//! XLSX rendering of an [`InventoryReport`].
//!
//! Sheet layout (0-based rows):
//!
//! ```text
//! rows 0..=9    logos, $ totals and run-rate block
//! rows 10..=12  report date, first day of this/next fiscal month, weeks
//! rows 13..=14  two-row column header
//! rows 15..     one row per item
//! ```

use anyhow::{Context, Result};
use log::{debug, warn};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Image, Workbook, Worksheet,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::assemble::{HeaderColor, InventoryReport, ReportCell, Source};

/// Row of the bottom header line; data starts on the next row.
pub const START_ROW: u32 = 14;
const MAX_SHEET_LENGTH: u32 = 1_048_576;

const CURRENCY: &str = "$#,##0.00_-";
const CURRENCY_PLAIN: &str = "$#,##0.00";
const DASH_ZERO: &str = "#,##0;-#,##0;\" - \"";

/// An image placed at a fixed cell, e.g. a company logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub row: u32,
    pub col: u16,
    pub path: PathBuf,
}

#[derive(Clone, Copy)]
enum ColumnStyle {
    Centered,
    Text,
    RedText,
    Dash,
    DashRed,
    DashBlue,
    Currency,
    CurrencyRed,
    CurrencyBlue,
}

// (first col, last col, width, style) for A..V
const COLUMN_STYLES: [(u16, u16, f64, ColumnStyle); 14] = [
    (0, 0, 9.17, ColumnStyle::Centered),
    (1, 1, 64.17, ColumnStyle::Text),
    (2, 2, 14.17, ColumnStyle::Text),
    (3, 3, 7.17, ColumnStyle::RedText),
    (4, 5, 8.17, ColumnStyle::DashBlue),
    (6, 6, 15.17, ColumnStyle::DashBlue),
    (7, 7, 11.17, ColumnStyle::DashRed),
    (8, 10, 15.17, ColumnStyle::Currency),
    (11, 11, 15.17, ColumnStyle::CurrencyRed),
    (12, 12, 15.17, ColumnStyle::Dash),
    (13, 13, 15.17, ColumnStyle::DashBlue),
    (14, 19, 9.17, ColumnStyle::Dash),
    (20, 20, 11.17, ColumnStyle::DashRed),
    (21, 21, 11.17, ColumnStyle::CurrencyBlue),
];

fn centered() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn dash(color: Option<Color>) -> Format {
    let f = centered().set_num_format(DASH_ZERO);
    match color {
        Some(c) => f.set_font_color(c),
        None => f,
    }
}

fn text_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_num_format("@")
}

impl ColumnStyle {
    fn format(self) -> Format {
        match self {
            ColumnStyle::Centered => centered(),
            ColumnStyle::Text => text_format(),
            ColumnStyle::RedText => centered().set_font_color(Color::Red),
            ColumnStyle::Dash => dash(None),
            ColumnStyle::DashRed => dash(Some(Color::Red)),
            ColumnStyle::DashBlue => dash(Some(Color::Blue)),
            ColumnStyle::Currency => Format::new().set_num_format(CURRENCY),
            ColumnStyle::CurrencyRed => Format::new()
                .set_num_format(CURRENCY_PLAIN)
                .set_font_color(Color::Red),
            ColumnStyle::CurrencyBlue => Format::new()
                .set_num_format(CURRENCY_PLAIN)
                .set_font_color(Color::Blue),
        }
    }
}

fn header_format(color: HeaderColor, top: bool) -> Format {
    let f = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_underline(FormatUnderline::Single)
        .set_border(FormatBorder::Medium)
        .set_border_color(Color::Black);
    // no rule between the two header rows
    let f = if top {
        f.set_border_bottom(FormatBorder::None)
    } else {
        f.set_border_top(FormatBorder::None)
    };
    match color {
        HeaderColor::Black => f,
        HeaderColor::Red => f.set_font_color(Color::Red),
        HeaderColor::Blue => f.set_font_color(Color::Blue),
    }
}

fn banner(color: Color) -> Format {
    centered().set_italic().set_bold().set_font_color(color)
}

/// `"{name} {M-D-YYYY}.xlsx"`, the file name the report is saved under.
pub fn output_file_name(name: &str, report_date: &str) -> String {
    format!("{} {}.xlsx", name, report_date.replace('/', "-"))
}

/// Renders reports into a single formatted worksheet.
#[derive(Clone, Debug)]
pub struct XlsxRenderer {
    pub sheet_name: String,
    pub logos: Vec<Logo>,
}

impl XlsxRenderer {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            logos: Vec::new(),
        }
    }

    /// Images to place on the sheet; missing files are skipped with a warning
    pub fn logos(mut self, logos: Vec<Logo>) -> Self {
        self.logos = logos;
        self
    }

    pub fn render_to_bytes(&self, report: &InventoryReport) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .with_context(|| format!("invalid sheet name '{}'", self.sheet_name))?;

        set_columns(worksheet)?;
        write_rows(worksheet, report)?;
        write_headers(worksheet, report)?;
        write_summary(worksheet, report)?;
        self.insert_logos(worksheet);

        Ok(workbook.save_to_buffer()?)
    }

    /// Render and write to `path`.
    pub fn save(&self, report: &InventoryReport, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(report)?;
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        debug!("wrote {} rows to {}", report.rows.len(), path.display());
        Ok(())
    }

    fn insert_logos(&self, worksheet: &mut Worksheet) {
        for logo in &self.logos {
            let placed = Image::new(&logo.path)
                .and_then(|image| worksheet.insert_image(logo.row, logo.col, &image).map(|_| ()));
            if let Err(e) = placed {
                warn!("{} not inserted, skipping image: {e}", logo.path.display());
            }
        }
    }
}

fn set_columns(worksheet: &mut Worksheet) -> Result<()> {
    for (first, last, width, style) in COLUMN_STYLES {
        let format = style.format();
        for col in first..=last {
            worksheet.set_column_width(col, width)?;
            worksheet.set_column_format(col, &format)?;
        }
    }
    Ok(())
}

fn write_headers(worksheet: &mut Worksheet, report: &InventoryReport) -> Result<()> {
    for (col, column) in report.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(
            START_ROW - 1,
            col,
            &column.top_header,
            &header_format(column.color, true),
        )?;
        worksheet.write_string_with_format(
            START_ROW,
            col,
            &column.bottom_header,
            &header_format(column.color, false),
        )?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, report: &InventoryReport) -> Result<()> {
    let text = text_format();

    for (i, cells) in report.rows.iter().enumerate() {
        let row = START_ROW + 1 + i as u32;
        // formulas address 1-based sheet rows
        let sheet_row = row + 1;

        for (col, (cell, column)) in cells.iter().zip(&report.columns).enumerate() {
            let col = col as u16;
            match cell {
                ReportCell::Formula(template) => {
                    let formula = ReportCell::render_formula(template, sheet_row);
                    worksheet.write_formula(row, col, formula.as_str())?;
                }
                ReportCell::Value(value) if matches!(column.source, Source::TextField(_)) => {
                    worksheet.write_string_with_format(row, col, value.to_string(), &text)?;
                }
                ReportCell::Value(value) => match value.as_f64() {
                    Some(n) => {
                        worksheet.write_number(row, col, n)?;
                    }
                    None if value.is_blank() => {}
                    None => {
                        worksheet.write_string(row, col, value.to_string())?;
                    }
                },
            }
        }
    }
    Ok(())
}

fn write_summary(worksheet: &mut Worksheet, report: &InventoryReport) -> Result<()> {
    let underline = centered().set_underline(FormatUnderline::Single);
    let right = Format::new()
        .set_align(FormatAlign::Right)
        .set_font_color(Color::Black);
    let blue = banner(Color::Blue);
    let red = banner(Color::Red);
    let green = banner(Color::RGB(0x32CD32));
    let money = centered()
        .set_font_color(Color::Blue)
        .set_num_format(CURRENCY);

    for (i, info) in ["Report", "Date", report.report_date.as_str()].iter().enumerate() {
        worksheet.write_string_with_format(START_ROW - 4 + i as u32, 0, *info, &underline)?;
    }

    let period_rows = [
        (START_ROW - 3, "First Day of Next Fiscal Month:", &report.next_period),
        (START_ROW - 2, "First Day of Fiscal Month:", &report.this_period),
    ];
    for (row, label, date) in period_rows {
        worksheet.write_string_with_format(row, 1, label, &right)?;
        worksheet.write_string_with_format(row, 2, date, &right)?;
    }

    worksheet.write_string_with_format(START_ROW - 2, 4, "Weeks in Month:", &right)?;
    worksheet.write_formula_with_format(
        START_ROW - 2,
        5,
        format!("=(C{}-C{})/7", START_ROW - 2, START_ROW - 1).as_str(),
        &right,
    )?;
    worksheet.write_string_with_format(START_ROW - 2, 6, "Reporting Week:", &right)?;
    worksheet.write_formula_with_format(
        START_ROW - 2,
        7,
        format!("=(A{}-C{})/7", START_ROW - 1, START_ROW - 1).as_str(),
        &right,
    )?;

    let first_data = START_ROW + 2;
    let totals = [
        (6u16, "$-On Hand", &blue, format!("=SUM(J{first_data}:J{MAX_SHEET_LENGTH})")),
        (8, "$-On Order", &blue, format!("=SUM(K{first_data}:K{MAX_SHEET_LENGTH})")),
        (9, "$-OH + $-On Order", &blue, format!("=G{0}+I{0}", START_ROW - 7)),
        (11, "$-MTD", &red, format!("=SUM(L{first_data}:L{MAX_SHEET_LENGTH})")),
    ];
    for (col, label, label_format, formula) in totals {
        worksheet.write_string_with_format(START_ROW - 9, col, label, label_format)?;
        worksheet.write_formula_with_format(START_ROW - 8, col, formula.as_str(), &money)?;
    }

    worksheet.write_string_with_format(START_ROW - 10, 12, "$-EST MONTHLY", &green)?;
    worksheet.write_string_with_format(START_ROW - 9, 12, "RUN RATE", &blue)?;
    worksheet.write_formula_with_format(
        START_ROW - 8,
        12,
        format!("=(L{}/H{})*F{}", START_ROW - 7, START_ROW - 1, START_ROW - 1).as_str(),
        &money,
    )?;

    Ok(())
}
