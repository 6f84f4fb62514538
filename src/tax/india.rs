use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{JurisdictionRules, RateCard, TaxBreakdown, bucket_nets, positive};
use crate::format::reached_months;
use crate::model::{HoldingPeriod, Jurisdiction, PortfolioSummary, ReportRequest};

const LONG_TERM_MONTHS: u32 = 24;
const SHORT_TERM_RATE: Decimal = dec!(0.15);
const LONG_TERM_RATE: Decimal = dec!(0.10);
const LONG_TERM_EXEMPTION: Decimal = dec!(100000);
/// Assumed marginal slab for dividend income.
const DIVIDEND_SLAB_RATE: Decimal = dec!(0.30);

/// JUR_A: short/long split at 24 months, LTCG taxed only above the
/// per-period exemption, foreign tax credit floored at zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndiaRules;

impl JurisdictionRules for IndiaRules {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::India
    }

    fn rates(&self) -> RateCard {
        RateCard {
            short_term_rate: SHORT_TERM_RATE,
            long_term_rate: LONG_TERM_RATE,
            dividend_rate: DIVIDEND_SLAB_RATE,
            long_term_discount: Decimal::ZERO,
            long_term_exemption: LONG_TERM_EXEMPTION,
        }
    }

    fn classify(&self, acquired: NaiveDate, sold: NaiveDate) -> HoldingPeriod {
        if reached_months(acquired, sold, LONG_TERM_MONTHS) {
            HoldingPeriod::Long
        } else {
            HoldingPeriod::Short
        }
    }

    fn holding_rule(&self) -> &'static str {
        "Assets held for 24 months or more are long-term; anything sold earlier is short-term."
    }

    fn compute(&self, request: &ReportRequest, summary: &PortfolioSummary) -> TaxBreakdown {
        let (short_net, long_net) = bucket_nets(self, &request.capital_gains_transactions);

        let taxable_short = positive(short_net);
        let taxable_long = positive(long_net - LONG_TERM_EXEMPTION);
        let short_term_tax = taxable_short * SHORT_TERM_RATE;
        let long_term_tax = taxable_long * LONG_TERM_RATE;

        let dividend_income = summary.total_dividend_income;
        let dividend_tax = positive(dividend_income) * DIVIDEND_SLAB_RATE;

        let gross_liability = short_term_tax + long_term_tax + dividend_tax;
        let credits = summary.total_foreign_tax_withheld;

        TaxBreakdown {
            short_term_gains: short_net,
            long_term_gains: long_net,
            taxable_long_term_gains: taxable_long,
            taxable_gains: taxable_short + taxable_long,
            short_term_tax,
            long_term_tax,
            dividend_income,
            dividend_tax,
            gross_liability,
            credits,
            net_payable: positive(gross_liability - credits),
        }
    }

    fn authority(&self) -> &'static str {
        "Income Tax Department, Government of India"
    }

    fn report_title(&self) -> &'static str {
        "Capital Gains & Foreign Income Statement"
    }

    fn form_references(&self) -> &'static [&'static str] {
        &[
            "ITR-2: Schedule CG (capital gains)",
            "Schedule 112A: long-term gains on listed equity",
            "Schedule OS: dividend income",
            "Schedule FA: foreign assets",
            "Form 67: claim for foreign tax credit",
        ]
    }

    fn credit_label(&self) -> Option<&'static str> {
        Some("Foreign tax credit (Sec. 90/91)")
    }

    fn capital_gains_caveat(&self) -> &'static str {
        "Long-term gains up to Rs. 1,00,000 in the period are exempt. Only the portion \
         above the exemption is taxed at 10%, without indexation."
    }

    fn foreign_asset_disclosure(&self) -> &'static str {
        "Every foreign asset held at any time during the period must be disclosed in \
         Schedule FA, including its peak value and closing value, even when no income \
         arose. Non-disclosure attracts penalties under the Black Money Act."
    }

    fn expense_note(&self, deductible: bool) -> &'static str {
        if deductible {
            "Advisory fees incurred wholly for earning dividend income may be claimed \
             against Schedule OS, subject to the 20% ceiling of Sec. 57."
        } else {
            "This subscription is a personal expense and cannot be set off against capital \
             gains or dividend income."
        }
    }
}
