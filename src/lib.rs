mod error;
mod fonts;
pub mod format;
pub mod model;
mod pdf;
mod report;
pub mod tax;

pub use error::Error;
pub use model::{Jurisdiction, PortfolioSummary, ReportRequest};
pub use pdf::{
    CalloutKind, Cell, CellAlign, CellKind, GeneratedDocument, LayoutConfig, PageSize,
    RenderedPage, Table, render_table_pages,
};
pub use report::{
    SectionKind, generate_australia_report, generate_india_report, generate_report,
    generate_report_with, generate_united_states_report,
};
pub use tax::{JurisdictionRules, RateCard, TaxBreakdown, compute_liability};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Serialize `doc` and write it into `dir` under its export name.
pub fn write_report(doc: &GeneratedDocument, dir: &Path, timestamp: i64) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let bytes = doc.to_pdf();
    let t_render = t0.elapsed();

    std::fs::create_dir_all(dir)?;
    let path = dir.join(doc.file_name(timestamp));
    std::fs::write(&path, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes, {})",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
        path.display(),
    );

    Ok(path)
}

/// Parse a JSON request, generate its report and write the PDF into `dir`.
pub fn generate_from_json(json: &str, dir: &Path, timestamp: i64) -> Result<PathBuf, Error> {
    let request = ReportRequest::from_json(json)?;
    let doc = generate_report(&request)?;
    write_report(&doc, dir, timestamp)
}
