#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use taxdoc_pdf::model::{
    AccountHolder, CapitalGainTransaction, DividendEvent, ForeignAsset, SavingsOpportunity,
    SubscriptionCharge,
};
use taxdoc_pdf::{GeneratedDocument, Jurisdiction, ReportRequest};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn holder() -> AccountHolder {
    AccountHolder {
        name: "Asha Menon".to_string(),
        address: "14 Harbour Street, Springfield".to_string(),
        tax_id: "ABCDE1234F".to_string(),
        email: "asha@example.com".to_string(),
        phone: None,
    }
}

/// A valid request with every schedule empty.
pub fn empty_request(jurisdiction: Jurisdiction) -> ReportRequest {
    ReportRequest {
        jurisdiction,
        tax_period_label: "FY 2023-24".to_string(),
        generated_on: Some(date(2024, 4, 15)),
        account_holder: holder(),
        valuation: None,
        portfolio_summary: None,
        capital_gains_transactions: Vec::new(),
        dividend_income: Vec::new(),
        foreign_assets: Vec::new(),
        subscription_charge: None,
        savings_opportunities: Vec::new(),
    }
}

/// A sale with gain/loss = proceeds - cost and the holding tag derived by
/// the jurisdiction's own rules.
pub fn sale(
    jurisdiction: Jurisdiction,
    ticker: &str,
    acquired: NaiveDate,
    sold: NaiveDate,
    cost: Decimal,
    proceeds: Decimal,
) -> CapitalGainTransaction {
    CapitalGainTransaction {
        ticker: ticker.to_string(),
        description: "Common stock".to_string(),
        quantity: Decimal::TEN,
        cost_basis: cost,
        proceeds,
        gain_loss: proceeds - cost,
        holding_period: jurisdiction.rules().classify(acquired, sold),
        acquired_date: acquired,
        sold_date: sold,
        country: "US".to_string(),
    }
}

/// A short holding (30 days) under every jurisdiction.
pub fn short_sale(
    jurisdiction: Jurisdiction,
    ticker: &str,
    cost: Decimal,
    proceeds: Decimal,
) -> CapitalGainTransaction {
    sale(jurisdiction, ticker, date(2023, 6, 1), date(2023, 7, 1), cost, proceeds)
}

/// A long holding (three years) under every jurisdiction.
pub fn long_sale(
    jurisdiction: Jurisdiction,
    ticker: &str,
    cost: Decimal,
    proceeds: Decimal,
) -> CapitalGainTransaction {
    sale(jurisdiction, ticker, date(2020, 6, 1), date(2023, 7, 1), cost, proceeds)
}

pub fn dividend(ticker: &str, gross: Decimal, withheld: Decimal, country: &str) -> DividendEvent {
    let withholding_rate = if gross.is_zero() {
        Decimal::ZERO
    } else {
        withheld / gross * Decimal::ONE_HUNDRED
    };
    DividendEvent {
        date: date(2023, 9, 15),
        ticker: ticker.to_string(),
        description: format!("{ticker} quarterly dividend"),
        gross_dividend: gross,
        foreign_tax_withheld: withheld,
        net_dividend: gross - withheld,
        withholding_rate,
        country: country.to_string(),
    }
}

pub fn foreign_asset(ticker: &str, closing: Decimal, income: Decimal) -> ForeignAsset {
    ForeignAsset {
        ticker: ticker.to_string(),
        description: format!("{ticker} ordinary shares"),
        country: "United States".to_string(),
        cost_basis: closing,
        peak_value: closing,
        closing_value: closing,
        income,
    }
}

pub fn subscription(deductible: bool) -> SubscriptionCharge {
    SubscriptionCharge {
        plan_name: "Premium Research".to_string(),
        monthly_fee: Decimal::new(1658, 2),
        annual_fee: Decimal::new(19900, 2),
        deductible,
    }
}

pub fn opportunity(description: &str, saving: Decimal, implemented: bool) -> SavingsOpportunity {
    SavingsOpportunity {
        date: date(2024, 1, 10),
        description: description.to_string(),
        potential_saving: saving,
        implemented,
        notes: String::new(),
    }
}

/// Request with `n` short sales whose tickers are `TK000`, `TK001`, ...
pub fn many_sales(jurisdiction: Jurisdiction, n: usize) -> ReportRequest {
    let mut request = empty_request(jurisdiction);
    request.capital_gains_transactions = (0..n)
        .map(|i| {
            short_sale(
                jurisdiction,
                &format!("TK{i:03}"),
                Decimal::from(1000 + i as i64),
                Decimal::from(1100 + i as i64),
            )
        })
        .collect();
    request
}

/// Tickers drawn in table rows, in document order.
pub fn drawn_tickers(doc: &GeneratedDocument) -> Vec<String> {
    doc.texts()
        .filter(|t| t.len() == 5 && t.starts_with("TK"))
        .map(str::to_string)
        .collect()
}

/// Pages whose running header belongs to the given section title.
pub fn pages_in_section<'a>(
    doc: &'a GeneratedDocument,
    title: &'a str,
) -> impl Iterator<Item = &'a taxdoc_pdf::RenderedPage> + 'a {
    doc.pages().iter().filter(move |p| p.section().starts_with(title))
}

/// Each drawn string with the PDF-space y of its text position, read back
/// from the page's content stream.
pub fn text_positions(page: &taxdoc_pdf::RenderedPage) -> Vec<(f32, &str)> {
    let content = String::from_utf8_lossy(page.content());
    let ys: Vec<f32> = content
        .lines()
        .filter_map(|line| line.strip_suffix(" Td"))
        .map(|operands| {
            operands
                .split_whitespace()
                .nth(1)
                .and_then(|y| y.parse().ok())
                .expect("Td operands")
        })
        .collect();
    assert_eq!(ys.len(), page.texts().len(), "page {}", page.number());
    ys.into_iter()
        .zip(page.texts().iter().map(String::as_str))
        .collect()
}

/// Lowest PDF-space y a body line may sit at.
pub fn body_floor(config: &taxdoc_pdf::LayoutConfig) -> f32 {
    config.page_height() - config.content_bottom()
}
