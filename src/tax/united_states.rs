use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{JurisdictionRules, RateCard, TaxBreakdown, bucket_nets, positive};
use crate::format::exceeded_months;
use crate::model::{HoldingPeriod, Jurisdiction, PortfolioSummary, ReportRequest};

const LONG_TERM_MONTHS: u32 = 12;
/// Ordinary-income bracket assumed for short-term gains.
const ORDINARY_RATE: Decimal = dec!(0.24);
const PREFERENTIAL_RATE: Decimal = dec!(0.15);

/// JUR_B: short/long split at 12 months, qualified dividends at the
/// preferential rate, no foreign tax credit modeled.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitedStatesRules;

impl JurisdictionRules for UnitedStatesRules {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::UnitedStates
    }

    fn rates(&self) -> RateCard {
        RateCard {
            short_term_rate: ORDINARY_RATE,
            long_term_rate: PREFERENTIAL_RATE,
            dividend_rate: PREFERENTIAL_RATE,
            long_term_discount: Decimal::ZERO,
            long_term_exemption: Decimal::ZERO,
        }
    }

    fn classify(&self, acquired: NaiveDate, sold: NaiveDate) -> HoldingPeriod {
        if exceeded_months(acquired, sold, LONG_TERM_MONTHS) {
            HoldingPeriod::Long
        } else {
            HoldingPeriod::Short
        }
    }

    fn holding_rule(&self) -> &'static str {
        "Assets held more than one year are long-term; assets held one year or less are short-term."
    }

    fn compute(&self, request: &ReportRequest, summary: &PortfolioSummary) -> TaxBreakdown {
        let (short_net, long_net) = bucket_nets(self, &request.capital_gains_transactions);

        let taxable_short = positive(short_net);
        let taxable_long = positive(long_net);
        let short_term_tax = taxable_short * ORDINARY_RATE;
        let long_term_tax = taxable_long * PREFERENTIAL_RATE;

        let dividend_income = summary.total_dividend_income;
        let dividend_tax = positive(dividend_income) * PREFERENTIAL_RATE;

        let gross_liability = short_term_tax + long_term_tax + dividend_tax;

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
            credits: Decimal::ZERO,
            net_payable: gross_liability,
        }
    }

    fn authority(&self) -> &'static str {
        "Internal Revenue Service"
    }

    fn report_title(&self) -> &'static str {
        "Annual Investment Tax Summary"
    }

    fn form_references(&self) -> &'static [&'static str] {
        &[
            "Form 8949: sales and other dispositions of capital assets",
            "Schedule D: capital gains and losses",
            "Form 1099-DIV: dividends and distributions",
            "Form 1116: foreign tax credit (not applied in this report)",
            "FinCEN 114 (FBAR) / Form 8938: foreign financial assets",
        ]
    }

    fn credit_label(&self) -> Option<&'static str> {
        None
    }

    fn capital_gains_caveat(&self) -> &'static str {
        "Losses on securities repurchased within 30 days before or after the sale are \
         disallowed under the wash-sale rule and added to the basis of the replacement \
         shares. This report does not adjust for wash sales."
    }

    fn foreign_asset_disclosure(&self) -> &'static str {
        "If the aggregate peak value of foreign financial accounts exceeded $10,000 at any \
         time during the year, an FBAR must be filed. Form 8938 thresholds start at \
         $50,000 for single filers."
    }

    fn expense_note(&self, deductible: bool) -> &'static str {
        if deductible {
            "Investment advisory fees are flagged deductible. Confirm eligibility: \
             miscellaneous itemized deductions are suspended for most individual filers."
        } else {
            "Investment advisory fees are not deductible for individual filers while \
             miscellaneous itemized deductions are suspended."
        }
    }
}
