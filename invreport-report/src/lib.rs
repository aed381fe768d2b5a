//! invreport-report: turns parsed extract records into the inventory report
//! (column mapping, fiscal month titles, derived formulas) and writes it out.

pub mod assemble;
pub mod csv_export;
pub mod xlsx;

pub use assemble::{InventoryReport, ReportAssembler, ReportCell, ReportColumn};
pub use csv_export::{save_csv, write_csv};
pub use xlsx::{output_file_name, Logo, XlsxRenderer};
