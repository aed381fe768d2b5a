//! Build the inventory report table from parsed extract records.
//!
//! Parsed records are positional; this module decides which positions become
//! report columns, merges the two description fields, titles the prior-month
//! columns from the fiscal calendar and inserts the derived formula columns.

use invreport_core::{CalendarError, FiscalCalendar, RELATIVE_MONTHS};
use invreport_ingest::{FieldValue, ParsedRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Record position of the long description continuation.
const CONTINUATION_FIELD: usize = 13;
/// Record position just before the first prior-month sales figure.
const PRIOR_MONTH_BASE: usize = 31;

/// Where a report column gets its cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    Field(usize),
    /// Field written as text even when it parsed as a number
    TextField(usize),
    /// First description joined with its continuation
    Description,
    /// Unit sales `n` fiscal months back (1-based)
    PriorMonth(usize),
    /// Spreadsheet formula; `{row}` is the 1-based sheet row
    Formula(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderColor {
    Black,
    Red,
    Blue,
}

struct ColumnDef {
    name: &'static str,
    top: &'static str,
    bottom: &'static str,
    source: Source,
    color: HeaderColor,
}

const fn def(
    name: &'static str,
    top: &'static str,
    bottom: &'static str,
    source: Source,
    color: HeaderColor,
) -> ColumnDef {
    ColumnDef {
        name,
        top,
        bottom,
        source,
        color,
    }
}

use HeaderColor::{Black, Blue, Red};

// Columns A..V. Prior-month names are filled from the calendar.
const COLUMN_DEFS: [ColumnDef; 22] = [
    def("IM SKU#", "", "IM SKU#", Source::Field(0), Black),
    def("Product Description", "", "Product Description", Source::Description, Black),
    def("MFG. P/N", "MFG.", "P/N", Source::TextField(15), Black),
    def("Status Code", "Status", "Code", Source::Field(11), Red),
    def("Units Avail", "Units", "Avail", Source::Field(20), Blue),
    def("Units on Order", "Units on", "Order", Source::Field(23), Blue),
    def("Balance On Hand", "Balance", "On Hand", Source::Field(27), Blue),
    def(
        "WEEKS OH+OO",
        "WEEKS",
        "OH + OO",
        Source::Formula("=IF(M{row}=0,0,((E{row}+F{row})/M{row}))*4"),
        Red,
    ),
    def("Unit Cost", "", "Unit Cost", Source::Field(5), Black),
    def("$ On Hand", "", "$ On Hand", Source::Formula("=G{row}*I{row}"), Black),
    def("$ On Order", "", "$ On Order", Source::Formula("=F{row}*I{row}"), Black),
    def("$ MTD", "", "$ MTD", Source::Formula("=O{row}*I{row}"), Red),
    def(
        "Trending 2 Month RR",
        "Trending 2",
        "Month RR",
        Source::Formula("=(((O{row}/(ROUNDDOWN(($A$13-$C$13),0)/7))*$F$13)+P{row})/2"),
        Black,
    ),
    def(
        "Average Prev 2 Month RR",
        "Average Prev",
        "2 Month RR",
        Source::Formula("=(P{row}+Q{row})/2"),
        Blue,
    ),
    def("MTD Unit Sales", "MTD", "Unit Sales", Source::Field(30), Black),
    def("", "", "", Source::PriorMonth(1), Black),
    def("", "", "", Source::PriorMonth(2), Black),
    def("", "", "", Source::PriorMonth(3), Black),
    def("", "", "", Source::PriorMonth(4), Black),
    def("", "", "", Source::PriorMonth(5), Black),
    def("YTD Unit Sales", "YTD Unit", "Sales", Source::Field(31), Red),
    def("YTD Sales", "YTD", "Sales", Source::Formula("=U{row}*I{row}"), Blue),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportColumn {
    pub name: String,
    pub top_header: String,
    pub bottom_header: String,
    pub source: Source,
    pub color: HeaderColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportCell {
    Value(FieldValue),
    Formula(&'static str),
}

impl ReportCell {
    /// Formula with `{row}` replaced by the 1-based sheet row.
    pub fn render_formula(template: &str, row: u32) -> String {
        template.replace("{row}", &row.to_string())
    }
}

/// Assembled report: header facts from the calendar plus the row table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub report_date: String,
    pub this_period: String,
    pub next_period: String,
    pub prior_months: BTreeMap<i32, String>,
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<Vec<ReportCell>>,
}

/// Turns parsed records into an [`InventoryReport`] using an explicit calendar.
pub struct ReportAssembler<'a> {
    calendar: &'a FiscalCalendar,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(calendar: &'a FiscalCalendar) -> Self {
        Self { calendar }
    }

    fn columns(months: &BTreeMap<i32, String>) -> Vec<ReportColumn> {
        COLUMN_DEFS
            .iter()
            .map(|def| {
                let (name, bottom) = match def.source {
                    Source::PriorMonth(n) => {
                        let label = months.get(&-(n as i32)).cloned().unwrap_or_default();
                        (label.clone(), label)
                    }
                    _ => (def.name.to_string(), def.bottom.to_string()),
                };
                ReportColumn {
                    name,
                    top_header: def.top.to_string(),
                    bottom_header: bottom,
                    source: def.source,
                    color: def.color,
                }
            })
            .collect()
    }

    fn cell(record: &ParsedRecord, source: Source) -> ReportCell {
        let field = |i: usize| record.get(i).cloned().unwrap_or_else(|| FieldValue::text(""));
        let value = match source {
            Source::Field(i) => field(i),
            Source::TextField(i) => FieldValue::Text(field(i).to_string()),
            Source::Description => {
                let joined = format!("{} {}", field(1), field(CONTINUATION_FIELD));
                FieldValue::Text(joined.trim().to_string())
            }
            Source::PriorMonth(n) => field(PRIOR_MONTH_BASE + n),
            Source::Formula(template) => return ReportCell::Formula(template),
        };
        ReportCell::Value(value)
    }

    /// Fails when the calendar cannot resolve the report date.
    pub fn assemble(&self, records: &[ParsedRecord]) -> Result<InventoryReport, CalendarError> {
        let prior_months = self.calendar.relative_months(RELATIVE_MONTHS)?;
        let this_period = self.calendar.current_period()?;
        let next_period = self.calendar.next_period()?;

        let columns = Self::columns(&prior_months);
        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| Self::cell(record, c.source)).collect())
            .collect();

        Ok(InventoryReport {
            report_date: self.calendar.report_date_str(),
            this_period,
            next_period,
            prior_months,
            columns,
            rows,
        })
    }
}
