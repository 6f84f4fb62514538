use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{JurisdictionRules, RateCard, TaxBreakdown, bucket_nets, positive};
use crate::format::days_held;
use crate::model::{HoldingPeriod, Jurisdiction, PortfolioSummary, ReportRequest};

/// Holdings kept strictly longer than this many days qualify for the discount.
const DISCOUNT_THRESHOLD_DAYS: i64 = 365;
const CGT_DISCOUNT: Decimal = dec!(0.5);
const MARGINAL_RATE: Decimal = dec!(0.325);

/// JUR_C: day-count classification, 50% discount on long-term gains, one
/// marginal rate, foreign income tax offset floored at zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct AustraliaRules;

impl JurisdictionRules for AustraliaRules {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::Australia
    }

    fn rates(&self) -> RateCard {
        RateCard {
            short_term_rate: MARGINAL_RATE,
            long_term_rate: MARGINAL_RATE,
            dividend_rate: MARGINAL_RATE,
            long_term_discount: CGT_DISCOUNT,
            long_term_exemption: Decimal::ZERO,
        }
    }

    fn classify(&self, acquired: NaiveDate, sold: NaiveDate) -> HoldingPeriod {
        if days_held(acquired, sold) > DISCOUNT_THRESHOLD_DAYS {
            HoldingPeriod::Long
        } else {
            HoldingPeriod::Short
        }
    }

    fn holding_rule(&self) -> &'static str {
        "Assets held for more than 365 days (counted from the acquisition and sale dates) \
         qualify for the 50% CGT discount."
    }

    fn compute(&self, request: &ReportRequest, summary: &PortfolioSummary) -> TaxBreakdown {
        let (short_net, long_net) = bucket_nets(self, &request.capital_gains_transactions);

        let taxable_short = positive(short_net);
        let taxable_long = positive(long_net) * (Decimal::ONE - CGT_DISCOUNT);
        let taxable_gains = taxable_short + taxable_long;

        let short_term_tax = taxable_short * MARGINAL_RATE;
        let long_term_tax = taxable_long * MARGINAL_RATE;

        let dividend_income = summary.total_dividend_income;
        let dividend_tax = positive(dividend_income) * MARGINAL_RATE;

        let gross_liability = short_term_tax + long_term_tax + dividend_tax;
        let credits = summary.total_foreign_tax_withheld;

        TaxBreakdown {
            short_term_gains: short_net,
            long_term_gains: long_net,
            taxable_long_term_gains: taxable_long,
            taxable_gains,
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
        "Australian Taxation Office"
    }

    fn report_title(&self) -> &'static str {
        "Investment Income & CGT Report"
    }

    fn form_references(&self) -> &'static [&'static str] {
        &[
            "Item 18: capital gains (CGT schedule)",
            "Item 20: foreign source income and foreign assets",
            "Item 20O: foreign income tax offset",
        ]
    }

    fn credit_label(&self) -> Option<&'static str> {
        Some("Foreign income tax offset")
    }

    fn capital_gains_caveat(&self) -> &'static str {
        "The 50% discount is applied to the net long-term gain. Each holding bucket is \
         floored at zero on its own, so a short-term loss does not reduce discounted gains. \
         Carried-forward losses from earlier years are not modeled in this report."
    }

    fn foreign_asset_disclosure(&self) -> &'static str {
        "Foreign assets with a total value of A$50,000 or more at any time during the year \
         must be declared at item 20 of the tax return."
    }

    fn expense_note(&self, deductible: bool) -> &'static str {
        if deductible {
            "Subscriptions used to manage income-producing investments are deductible at \
             item D7 (interest and dividend deductions)."
        } else {
            "This subscription is not used to earn assessable income and is not deductible."
        }
    }
}
