//! Report orchestration: one generic driver, parameterized by the
//! jurisdiction's [`JurisdictionRules`], that runs the section composers
//! in order over a fresh [`PageCursor`].

mod sections;

use std::time::Instant;

use crate::error::Error;
use crate::format::{Currency, format_date};
use crate::model::{Jurisdiction, PortfolioSummary, ReportRequest};
use crate::pdf::{GeneratedDocument, LayoutConfig, PageChrome, PageCursor};
use crate::tax::{JurisdictionRules, TaxBreakdown};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Introduction,
    ExecutiveSummary,
    CapitalGains,
    Dividends,
    ForeignAssets,
    DeductibleExpenses,
    SavingsOpportunities,
    Notes,
}

impl SectionKind {
    pub const STANDARD_ORDER: [SectionKind; 8] = [
        SectionKind::Introduction,
        SectionKind::ExecutiveSummary,
        SectionKind::CapitalGains,
        SectionKind::Dividends,
        SectionKind::ForeignAssets,
        SectionKind::DeductibleExpenses,
        SectionKind::SavingsOpportunities,
        SectionKind::Notes,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Introduction => "Introduction",
            SectionKind::ExecutiveSummary => "Executive Summary",
            SectionKind::CapitalGains => "Capital Gains Schedule",
            SectionKind::Dividends => "Dividend Income Schedule",
            SectionKind::ForeignAssets => "Foreign Asset Schedule",
            SectionKind::DeductibleExpenses => "Deductible Expenses",
            SectionKind::SavingsOpportunities => "Tax-Saving Opportunities",
            SectionKind::Notes => "Notes & Disclaimer",
        }
    }
}

/// Everything a section composer reads. Built once per generation run.
pub(crate) struct ReportContext<'a> {
    pub(crate) request: &'a ReportRequest,
    pub(crate) rules: &'static dyn JurisdictionRules,
    pub(crate) summary: PortfolioSummary,
    pub(crate) breakdown: TaxBreakdown,
    pub(crate) currency: Currency,
}

/// Generate the report for the request's own jurisdiction with the default
/// layout.
pub fn generate_report(request: &ReportRequest) -> Result<GeneratedDocument, Error> {
    generate_report_with(request, &LayoutConfig::default())
}

/// Generate the report with an explicit layout configuration. The request
/// is validated before any page is laid out.
pub fn generate_report_with(
    request: &ReportRequest,
    config: &LayoutConfig,
) -> Result<GeneratedDocument, Error> {
    let t0 = Instant::now();
    request.validate()?;

    let rules = request.jurisdiction.rules();
    let summary = PortfolioSummary::derive(request);
    let breakdown = rules.compute(request, &summary);
    let t_compute = t0.elapsed();

    let ctx = ReportContext {
        request,
        rules,
        summary,
        breakdown,
        currency: rules.currency(),
    };

    let holder = &request.account_holder;
    let chrome = PageChrome {
        report_title: format!("{} | {}", rules.report_title(), request.tax_period_label),
        account_label: format!("{} | {}", holder.name, holder.tax_id),
        period_label: format!("{} tax period {}", request.jurisdiction, request.tax_period_label),
        footer_note: format!(
            "Confidential. Prepared for {}. Informational only, not a filed return or tax advice.",
            holder.name
        ),
        generated_on: request.generated_on.map(format_date),
    };

    let mut cursor = PageCursor::new(config, chrome);
    for section in rules.section_order() {
        sections::compose(*section, &ctx, &mut cursor);
    }
    let pages = cursor.finalize();
    let t_layout = t0.elapsed();

    log::info!(
        "{} report: {} pages, compute={:.1}ms, layout={:.1}ms",
        request.jurisdiction.tag(),
        pages.len(),
        t_compute.as_secs_f64() * 1000.0,
        (t_layout - t_compute).as_secs_f64() * 1000.0,
    );

    Ok(GeneratedDocument::new(
        request.jurisdiction,
        rules.report_title().to_string(),
        request.tax_period_label.clone(),
        config.page_size,
        pages,
    ))
}

fn generate_for(
    expected: Jurisdiction,
    request: &ReportRequest,
) -> Result<GeneratedDocument, Error> {
    if request.jurisdiction != expected {
        return Err(Error::invalid(format!(
            "{} report requested for a {} ({}) request",
            expected,
            request.jurisdiction,
            request.jurisdiction.tag()
        )));
    }
    generate_report(request)
}

/// JUR_A entry point.
pub fn generate_india_report(request: &ReportRequest) -> Result<GeneratedDocument, Error> {
    generate_for(Jurisdiction::India, request)
}

/// JUR_B entry point.
pub fn generate_united_states_report(request: &ReportRequest) -> Result<GeneratedDocument, Error> {
    generate_for(Jurisdiction::UnitedStates, request)
}

/// JUR_C entry point.
pub fn generate_australia_report(request: &ReportRequest) -> Result<GeneratedDocument, Error> {
    generate_for(Jurisdiction::Australia, request)
}
