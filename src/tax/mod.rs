//! Jurisdiction-specific tax arithmetic.
//!
//! Everything here is a pure function of a [`ReportRequest`]: no I/O, no
//! layout, no rounding. Each jurisdiction is a [`JurisdictionRules`]
//! strategy; the report orchestrator only ever talks to the trait.

mod australia;
mod india;
mod united_states;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::format::Currency;
use crate::model::{
    CapitalGainTransaction, HoldingPeriod, Jurisdiction, PortfolioSummary, ReportRequest,
};
use crate::report::SectionKind;

pub use australia::AustraliaRules;
pub use india::IndiaRules;
pub use united_states::UnitedStatesRules;

/// Liability figures for one request. All values are exact; display
/// rounding happens in the formatter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaxBreakdown {
    /// Net gain/loss of the short-term bucket.
    pub short_term_gains: Decimal,
    /// Net gain/loss of the long-term bucket.
    pub long_term_gains: Decimal,
    /// Long-term gains actually subject to tax after exemptions or discounts.
    pub taxable_long_term_gains: Decimal,
    /// Short plus long taxable gains.
    pub taxable_gains: Decimal,
    pub short_term_tax: Decimal,
    pub long_term_tax: Decimal,
    pub dividend_income: Decimal,
    pub dividend_tax: Decimal,
    pub gross_liability: Decimal,
    /// Foreign tax credit or offset subtracted from the gross liability.
    pub credits: Decimal,
    pub net_payable: Decimal,
}

/// Flat rates a jurisdiction applies. Printed in the notes section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateCard {
    pub short_term_rate: Decimal,
    pub long_term_rate: Decimal,
    pub dividend_rate: Decimal,
    /// Fraction of a positive long-term gain excluded from tax (0.5 = 50%).
    pub long_term_discount: Decimal,
    /// Long-term gains below this amount per period are untaxed.
    pub long_term_exemption: Decimal,
}

pub trait JurisdictionRules: Sync {
    fn jurisdiction(&self) -> Jurisdiction;

    fn rates(&self) -> RateCard;

    /// Holding-period classification from the trade dates alone.
    fn classify(&self, acquired: NaiveDate, sold: NaiveDate) -> HoldingPeriod;

    /// Human description of the classification threshold.
    fn holding_rule(&self) -> &'static str;

    fn compute(&self, request: &ReportRequest, summary: &PortfolioSummary) -> TaxBreakdown;

    fn section_order(&self) -> &'static [SectionKind] {
        &SectionKind::STANDARD_ORDER
    }

    fn currency(&self) -> Currency {
        self.jurisdiction().currency()
    }

    // Document wording.

    fn authority(&self) -> &'static str;

    fn report_title(&self) -> &'static str;

    fn form_references(&self) -> &'static [&'static str];

    /// Label for the credit line, `None` when the jurisdiction models no credit.
    fn credit_label(&self) -> Option<&'static str>;

    fn capital_gains_caveat(&self) -> &'static str;

    fn foreign_asset_disclosure(&self) -> &'static str;

    fn expense_note(&self, deductible: bool) -> &'static str;
}

impl Jurisdiction {
    pub fn rules(&self) -> &'static dyn JurisdictionRules {
        match self {
            Jurisdiction::India => &IndiaRules,
            Jurisdiction::UnitedStates => &UnitedStatesRules,
            Jurisdiction::Australia => &AustraliaRules,
        }
    }
}

/// Compute the liability for `request` under `jurisdiction`'s rules.
///
/// The summary figures the rules need (dividend income, foreign tax
/// withheld) are reduced from the line items, never taken from the
/// request's supplied aggregates.
pub fn compute_liability(jurisdiction: Jurisdiction, request: &ReportRequest) -> TaxBreakdown {
    let summary = PortfolioSummary::derive(request);
    jurisdiction.rules().compute(request, &summary)
}

/// Split transactions into (short, long) buckets, preserving input order.
pub fn partition<'a>(
    rules: &dyn JurisdictionRules,
    transactions: &'a [CapitalGainTransaction],
) -> (Vec<&'a CapitalGainTransaction>, Vec<&'a CapitalGainTransaction>) {
    let mut short = Vec::new();
    let mut long = Vec::new();
    for tx in transactions {
        let derived = rules.classify(tx.acquired_date, tx.sold_date);
        if derived != tx.holding_period {
            log::warn!(
                "{}: {} acquired {} sold {} tagged {:?}, classified {:?} under {} rules",
                rules.jurisdiction().tag(),
                tx.ticker,
                tx.acquired_date,
                tx.sold_date,
                tx.holding_period,
                derived,
                rules.jurisdiction(),
            );
        }
        match derived {
            HoldingPeriod::Short => short.push(tx),
            HoldingPeriod::Long => long.push(tx),
        }
    }
    (short, long)
}

/// Net gain/loss of each bucket.
pub(crate) fn bucket_nets(
    rules: &dyn JurisdictionRules,
    transactions: &[CapitalGainTransaction],
) -> (Decimal, Decimal) {
    let (short, long) = partition(rules, transactions);
    (
        short.iter().map(|t| t.gain_loss).sum(),
        long.iter().map(|t| t.gain_loss).sum(),
    )
}

pub(crate) fn positive(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
