use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::format::Currency;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// JUR_A: 24-month holding split, flat rates, per-period LTCG exemption.
    #[serde(rename = "india", alias = "JUR_A")]
    India,
    /// JUR_B: 12-month holding split, ordinary vs preferential rates.
    #[serde(rename = "united_states", alias = "JUR_B")]
    UnitedStates,
    /// JUR_C: 365-day holding split, 50% CGT discount.
    #[serde(rename = "australia", alias = "JUR_C")]
    Australia,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [
        Jurisdiction::India,
        Jurisdiction::UnitedStates,
        Jurisdiction::Australia,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Jurisdiction::India => "JUR_A",
            Jurisdiction::UnitedStates => "JUR_B",
            Jurisdiction::Australia => "JUR_C",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Jurisdiction::India => "India",
            Jurisdiction::UnitedStates => "United States",
            Jurisdiction::Australia => "Australia",
        }
    }

    /// Prefix used in exported file names.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Jurisdiction::India => "India",
            Jurisdiction::UnitedStates => "US",
            Jurisdiction::Australia => "Australia",
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            Jurisdiction::India => Currency::Inr,
            Jurisdiction::UnitedStates => Currency::Usd,
            Jurisdiction::Australia => Currency::Aud,
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingPeriod {
    Short,
    Long,
}

impl HoldingPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            HoldingPeriod::Short => "Short-term",
            HoldingPeriod::Long => "Long-term",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHolder {
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Market data that cannot be reduced from the line items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub portfolio_value: Decimal,
    pub unrealized_gain_loss: Decimal,
}

/// Aggregates as supplied by the caller. Only used to cross-check the
/// derived [`PortfolioSummary`]; never rendered directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppliedSummary {
    #[serde(default)]
    pub total_cost_basis: Option<Decimal>,
    #[serde(default)]
    pub total_realized_gain_loss: Option<Decimal>,
    #[serde(default)]
    pub total_dividend_income: Option<Decimal>,
    #[serde(default)]
    pub total_foreign_tax_withheld: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainTransaction {
    pub ticker: String,
    pub description: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub proceeds: Decimal,
    pub gain_loss: Decimal,
    /// Caller-supplied tag. Classification is always re-derived from the
    /// dates; a disagreeing tag is only logged.
    pub holding_period: HoldingPeriod,
    pub acquired_date: NaiveDate,
    pub sold_date: NaiveDate,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub ticker: String,
    pub description: String,
    pub gross_dividend: Decimal,
    pub foreign_tax_withheld: Decimal,
    pub net_dividend: Decimal,
    /// Percent, e.g. `25` for 25%.
    pub withholding_rate: Decimal,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignAsset {
    pub ticker: String,
    pub description: String,
    pub country: String,
    pub cost_basis: Decimal,
    pub peak_value: Decimal,
    pub closing_value: Decimal,
    pub income: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCharge {
    pub plan_name: String,
    pub monthly_fee: Decimal,
    pub annual_fee: Decimal,
    pub deductible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOpportunity {
    pub date: NaiveDate,
    pub description: String,
    pub potential_saving: Decimal,
    pub implemented: bool,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub jurisdiction: Jurisdiction,
    pub tax_period_label: String,
    #[serde(default)]
    pub generated_on: Option<NaiveDate>,
    pub account_holder: AccountHolder,
    #[serde(default)]
    pub valuation: Option<Valuation>,
    #[serde(default)]
    pub portfolio_summary: Option<SuppliedSummary>,
    pub capital_gains_transactions: Vec<CapitalGainTransaction>,
    pub dividend_income: Vec<DividendEvent>,
    pub foreign_assets: Vec<ForeignAsset>,
    #[serde(default)]
    pub subscription_charge: Option<SubscriptionCharge>,
    #[serde(default)]
    pub savings_opportunities: Vec<SavingsOpportunity>,
}

impl ReportRequest {
    /// Parse a request from JSON. Shape errors (missing arrays, malformed
    /// dates or amounts) surface as [`Error::InvalidRequest`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::invalid(e.to_string()))
    }

    /// Check the request for inconsistencies the generator would otherwise
    /// render silently.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tax_period_label.trim().is_empty() {
            return Err(Error::invalid("tax period label is empty"));
        }
        if self.account_holder.name.trim().is_empty() {
            return Err(Error::invalid("account holder name is empty"));
        }
        self.check_amount_range()?;

        for (i, tx) in self.capital_gains_transactions.iter().enumerate() {
            if tx.sold_date < tx.acquired_date {
                return Err(Error::invalid(format!(
                    "transaction {i} ({}): sold {} before acquired {}",
                    tx.ticker, tx.sold_date, tx.acquired_date
                )));
            }
            if tx.quantity <= Decimal::ZERO {
                return Err(Error::invalid(format!(
                    "transaction {i} ({}): quantity must be positive, got {}",
                    tx.ticker, tx.quantity
                )));
            }
            if tx.proceeds - tx.cost_basis != tx.gain_loss {
                return Err(Error::invalid(format!(
                    "transaction {i} ({}): gain/loss {} is not proceeds {} minus cost {}",
                    tx.ticker, tx.gain_loss, tx.proceeds, tx.cost_basis
                )));
            }
        }

        for (i, div) in self.dividend_income.iter().enumerate() {
            if div.gross_dividend - div.foreign_tax_withheld != div.net_dividend {
                return Err(Error::invalid(format!(
                    "dividend {i} ({} on {}): net {} does not equal gross {} minus withheld {}",
                    div.ticker,
                    div.date,
                    div.net_dividend,
                    div.gross_dividend,
                    div.foreign_tax_withheld
                )));
            }
            if div.foreign_tax_withheld < Decimal::ZERO {
                return Err(Error::invalid(format!(
                    "dividend {i} ({} on {}): negative foreign tax withheld",
                    div.ticker, div.date
                )));
            }
        }

        if let Some(supplied) = &self.portfolio_summary {
            let derived = PortfolioSummary::derive(self);
            let checks = [
                ("totalCostBasis", supplied.total_cost_basis, derived.total_cost_basis),
                (
                    "totalRealizedGainLoss",
                    supplied.total_realized_gain_loss,
                    derived.total_realized_gain_loss,
                ),
                (
                    "totalDividendIncome",
                    supplied.total_dividend_income,
                    derived.total_dividend_income,
                ),
                (
                    "totalForeignTaxWithheld",
                    supplied.total_foreign_tax_withheld,
                    derived.total_foreign_tax_withheld,
                ),
            ];
            for (field, given, computed) in checks {
                if let Some(given) = given
                    && given != computed
                {
                    return Err(Error::invalid(format!(
                        "portfolioSummary.{field} is {given} but the line items sum to {computed}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Every total the report prints is a partial sum of these amounts, so
    /// a bounded sum of magnitudes keeps all later arithmetic in range.
    fn check_amount_range(&self) -> Result<(), Error> {
        let valuation = self
            .valuation
            .iter()
            .flat_map(|v| [v.portfolio_value, v.unrealized_gain_loss]);
        let gains = self
            .capital_gains_transactions
            .iter()
            .flat_map(|t| [t.cost_basis, t.proceeds, t.gain_loss]);
        let dividends = self
            .dividend_income
            .iter()
            .flat_map(|d| [d.gross_dividend, d.foreign_tax_withheld, d.net_dividend]);
        let assets = self
            .foreign_assets
            .iter()
            .flat_map(|a| [a.cost_basis, a.peak_value, a.closing_value, a.income]);
        let subscription = self
            .subscription_charge
            .iter()
            .flat_map(|c| [c.monthly_fee, c.annual_fee]);
        let savings = self.savings_opportunities.iter().map(|o| o.potential_saving);

        valuation
            .chain(gains)
            .chain(dividends)
            .chain(assets)
            .chain(subscription)
            .chain(savings)
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount.abs()))
            .map(|_| ())
            .ok_or_else(|| {
                Error::invalid("line-item amounts overflow the supported decimal range")
            })
    }
}

/// Aggregate figures, always reduced from the request's line items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioSummary {
    pub portfolio_value: Decimal,
    pub total_cost_basis: Decimal,
    pub total_proceeds: Decimal,
    pub total_realized_gain_loss: Decimal,
    pub total_unrealized_gain_loss: Decimal,
    pub total_dividend_income: Decimal,
    pub total_foreign_tax_withheld: Decimal,
    pub total_net_dividends: Decimal,
    pub foreign_asset_closing_value: Decimal,
    pub foreign_asset_income: Decimal,
}

impl PortfolioSummary {
    /// Reduce the line items. Expects a request that passed
    /// [`ReportRequest::validate`].
    pub fn derive(request: &ReportRequest) -> Self {
        let txs = &request.capital_gains_transactions;
        let divs = &request.dividend_income;
        let assets = &request.foreign_assets;
        let valuation = request.valuation.clone().unwrap_or_default();

        PortfolioSummary {
            portfolio_value: valuation.portfolio_value,
            total_cost_basis: txs.iter().map(|t| t.cost_basis).sum(),
            total_proceeds: txs.iter().map(|t| t.proceeds).sum(),
            total_realized_gain_loss: txs.iter().map(|t| t.gain_loss).sum(),
            total_unrealized_gain_loss: valuation.unrealized_gain_loss,
            total_dividend_income: divs.iter().map(|d| d.gross_dividend).sum(),
            total_foreign_tax_withheld: divs.iter().map(|d| d.foreign_tax_withheld).sum(),
            total_net_dividends: divs.iter().map(|d| d.net_dividend).sum(),
            foreign_asset_closing_value: assets.iter().map(|a| a.closing_value).sum(),
            foreign_asset_income: assets.iter().map(|a| a.income).sum(),
        }
    }
}
