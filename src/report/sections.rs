use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{ReportContext, SectionKind};
use crate::format::{
    Currency, days_held, format_date, format_money, format_rate, format_signed_money, months_held,
};
use crate::model::{
    CapitalGainTransaction, HoldingPeriod, Jurisdiction, SavingsOpportunity, SubscriptionCharge,
};
use crate::pdf::{
    CalloutKind, Cell, CellAlign, CursorState, PageCursor, Table, TextStyle, callout, divider,
    heading, key_value_lines, paragraph, render_table, spacer,
};
use crate::tax::{RateCard, partition, positive};

pub(super) fn compose(kind: SectionKind, ctx: &ReportContext, cursor: &mut PageCursor) {
    log::debug!(
        "composing {:?} from page {} ({:?})",
        kind,
        cursor.page_number(),
        cursor.state()
    );
    match kind {
        SectionKind::Introduction => introduction(ctx, cursor),
        SectionKind::ExecutiveSummary => executive_summary(ctx, cursor),
        SectionKind::CapitalGains => capital_gains(ctx, cursor),
        SectionKind::Dividends => dividends(ctx, cursor),
        SectionKind::ForeignAssets => foreign_assets(ctx, cursor),
        SectionKind::DeductibleExpenses => match &ctx.request.subscription_charge {
            Some(charge) => deductible_expenses(ctx, charge, cursor),
            None => log::debug!("no subscription charge, skipping deductible expenses"),
        },
        SectionKind::SavingsOpportunities => {
            if ctx.request.savings_opportunities.is_empty() {
                log::debug!("no savings opportunities, skipping log");
            } else {
                savings_opportunities(ctx, &ctx.request.savings_opportunities, cursor);
            }
        }
        SectionKind::Notes => notes(ctx, cursor),
    }
}

/// Sections the document will contain, in print order.
fn present_sections(ctx: &ReportContext) -> Vec<SectionKind> {
    ctx.rules
        .section_order()
        .iter()
        .copied()
        .filter(|kind| match kind {
            SectionKind::DeductibleExpenses => ctx.request.subscription_charge.is_some(),
            SectionKind::SavingsOpportunities => !ctx.request.savings_opportunities.is_empty(),
            _ => true,
        })
        .collect()
}

fn right_headers(labels: &[&str], first_right: usize) -> Vec<Cell> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let cell = Cell::text(*l);
            if i >= first_right {
                cell.aligned(CellAlign::Right)
            } else {
                cell
            }
        })
        .collect()
}

fn pad_row(mut cells: Vec<Cell>, len: usize) -> Vec<Cell> {
    while cells.len() < len {
        cells.push(Cell::empty());
    }
    cells
}

fn introduction(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::Introduction.title());
    let request = ctx.request;
    let holder = &request.account_holder;
    let body = TextStyle::body(cursor);

    heading(cursor, ctx.rules.report_title(), 1);
    paragraph(
        cursor,
        &format!(
            "This report summarises the capital gains, dividend income and foreign holdings of {} \
             for the {} tax period, computed under the rules of the {}. Every figure is derived \
             from the transaction records listed in the schedules that follow.",
            holder.name,
            request.tax_period_label,
            ctx.rules.authority()
        ),
        body,
    );

    heading(cursor, "Account holder", 2);
    let mut pairs = vec![
        ("Name".to_string(), holder.name.clone()),
        ("Address".to_string(), holder.address.clone()),
        ("Tax identifier".to_string(), holder.tax_id.clone()),
        ("Email".to_string(), holder.email.clone()),
    ];
    if let Some(phone) = &holder.phone {
        pairs.push(("Phone".to_string(), phone.clone()));
    }
    pairs.push(("Tax period".to_string(), request.tax_period_label.clone()));
    pairs.push((
        "Jurisdiction".to_string(),
        format!("{} ({})", request.jurisdiction, request.jurisdiction.tag()),
    ));
    pairs.push(("Currency".to_string(), ctx.currency.code().to_string()));
    if let Some(date) = request.generated_on {
        pairs.push(("Prepared on".to_string(), format_date(date)));
    }
    key_value_lines(cursor, &pairs);

    heading(cursor, "Contents", 2);
    let contents: Vec<String> = present_sections(ctx)
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}", i + 1, kind.title()))
        .collect();
    paragraph(cursor, &contents.join("\n"), body);

    heading(cursor, "Relevant forms", 2);
    let forms: Vec<String> = ctx
        .rules
        .form_references()
        .iter()
        .map(|f| format!("- {}", f))
        .collect();
    paragraph(cursor, &forms.join("\n"), body);
}

fn long_term_rate_label(rates: &RateCard, currency: Currency) -> String {
    let rate = format_rate(rates.long_term_rate);
    if rates.long_term_discount > Decimal::ZERO {
        format!(
            "{} after {} discount",
            rate,
            format_rate(rates.long_term_discount)
        )
    } else if rates.long_term_exemption > Decimal::ZERO {
        format!("{} above {}", rate, format_money(rates.long_term_exemption, currency))
    } else {
        rate
    }
}

fn executive_summary(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::ExecutiveSummary.title());
    let cur = ctx.currency;
    let s = &ctx.summary;
    let b = &ctx.breakdown;
    let rates = ctx.rules.rates();

    let body = TextStyle::body(cursor);
    heading(cursor, SectionKind::ExecutiveSummary.title(), 1);
    paragraph(
        cursor,
        &format!(
            "{} realized transactions, {} dividend payments and {} foreign holdings were \
             reported for {}.",
            ctx.request.capital_gains_transactions.len(),
            ctx.request.dividend_income.len(),
            ctx.request.foreign_assets.len(),
            ctx.request.tax_period_label
        ),
        body,
    );

    heading(cursor, "Portfolio overview", 2);
    key_value_lines(
        cursor,
        &[
            ("Portfolio value".to_string(), format_money(s.portfolio_value, cur)),
            ("Cost basis of lots sold".to_string(), format_money(s.total_cost_basis, cur)),
            ("Sale proceeds".to_string(), format_money(s.total_proceeds, cur)),
            (
                "Realized gain/loss".to_string(),
                format_signed_money(s.total_realized_gain_loss, cur),
            ),
            (
                "Unrealized gain/loss".to_string(),
                format_signed_money(s.total_unrealized_gain_loss, cur),
            ),
            ("Gross dividends".to_string(), format_money(s.total_dividend_income, cur)),
            (
                "Foreign tax withheld".to_string(),
                format_money(s.total_foreign_tax_withheld, cur),
            ),
        ],
    );

    heading(cursor, "Estimated liability", 2);
    let taxable_short = b.taxable_gains - b.taxable_long_term_gains;
    let mut table = Table::new(right_headers(
        &["Component", "Net amount", "Taxable", "Rate", "Tax"],
        1,
    ))
    .with_widths(&[30.0, 18.0, 18.0, 16.0, 18.0]);
    table.rows = vec![
        vec![
            Cell::text("Short-term capital gains"),
            Cell::signed_money(b.short_term_gains, cur),
            Cell::money(taxable_short, cur),
            Cell::text(format_rate(rates.short_term_rate)).aligned(CellAlign::Right),
            Cell::money(b.short_term_tax, cur),
        ],
        vec![
            Cell::text("Long-term capital gains"),
            Cell::signed_money(b.long_term_gains, cur),
            Cell::money(b.taxable_long_term_gains, cur),
            Cell::text(long_term_rate_label(&rates, cur)).aligned(CellAlign::Right),
            Cell::money(b.long_term_tax, cur),
        ],
        vec![
            Cell::text("Dividend income"),
            Cell::money(b.dividend_income, cur),
            Cell::money(positive(b.dividend_income), cur),
            Cell::text(format_rate(rates.dividend_rate)).aligned(CellAlign::Right),
            Cell::money(b.dividend_tax, cur),
        ],
    ];
    table.footers.push(vec![
        Cell::text("Gross liability"),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::money(b.gross_liability, cur),
    ]);
    if let Some(label) = ctx.rules.credit_label() {
        table.footers.push(vec![
            Cell::text(format!("Less: {}", label)),
            Cell::empty(),
            Cell::empty(),
            Cell::empty(),
            Cell::money(-b.credits, cur),
        ]);
    }
    table.footers.push(vec![
        Cell::text("Estimated net payable"),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::money(b.net_payable, cur),
    ]);
    render_table(cursor, &table);

    if b.net_payable.is_zero() {
        callout(
            cursor,
            CalloutKind::Success,
            "No additional tax expected",
            "Based on the records supplied, no further tax is payable for this period.",
        );
    } else {
        callout(
            cursor,
            CalloutKind::Info,
            &format!("Estimated net payable: {}", format_money(b.net_payable, cur)),
            "The estimate applies flat rates to the figures in this report. Your final \
             liability depends on your total income and any carried-forward losses.",
        );
    }
    if ctx.rules.credit_label().is_some() && b.credits > b.gross_liability {
        callout(
            cursor,
            CalloutKind::Info,
            "Unused credit",
            &format!(
                "Foreign tax withheld exceeds the estimated liability by {}. The excess is not \
                 refundable and is not carried forward in this report.",
                format_money(b.credits - b.gross_liability, cur)
            ),
        );
    }
}

fn held_label(jurisdiction: Jurisdiction, tx: &CapitalGainTransaction) -> String {
    match jurisdiction {
        Jurisdiction::Australia => format!("{} d", days_held(tx.acquired_date, tx.sold_date)),
        _ => format!("{} mo", months_held(tx.acquired_date, tx.sold_date)),
    }
}

fn gains_table(
    ctx: &ReportContext,
    bucket: HoldingPeriod,
    txs: &[&CapitalGainTransaction],
) -> Table {
    let cur = ctx.currency;
    let jurisdiction = ctx.request.jurisdiction;
    let mut table = Table::new(right_headers(
        &[
            "Ticker",
            "Description",
            "Acquired",
            "Sold",
            "Held",
            "Qty",
            "Cost basis",
            "Proceeds",
            "Gain/Loss",
        ],
        4,
    ))
    .with_widths(&[8.0, 17.0, 11.0, 11.0, 7.0, 7.0, 13.0, 13.0, 13.0])
    .with_placeholder(format!(
        "No {} transactions in this period.",
        bucket.label().to_lowercase()
    ));

    table.rows = txs
        .iter()
        .map(|tx| {
            vec![
                Cell::text(&tx.ticker),
                Cell::text(&tx.description),
                Cell::date(tx.acquired_date),
                Cell::date(tx.sold_date),
                Cell::text(held_label(jurisdiction, tx)).aligned(CellAlign::Right),
                Cell::quantity(tx.quantity),
                Cell::money(tx.cost_basis, cur),
                Cell::money(tx.proceeds, cur),
                Cell::signed_money(tx.gain_loss, cur),
            ]
        })
        .collect();

    let cost: Decimal = txs.iter().map(|t| t.cost_basis).sum();
    let proceeds: Decimal = txs.iter().map(|t| t.proceeds).sum();
    let net: Decimal = txs.iter().map(|t| t.gain_loss).sum();
    table.footers.push(vec![
        Cell::text(format!("Total ({})", txs.len())),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::money(cost, cur),
        Cell::money(proceeds, cur),
        Cell::signed_money(net, cur),
    ]);
    table
}

fn capital_gains(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::CapitalGains.title());
    let cur = ctx.currency;
    let b = &ctx.breakdown;
    let rates = ctx.rules.rates();

    let body = TextStyle::body(cursor);
    heading(cursor, SectionKind::CapitalGains.title(), 1);
    paragraph(cursor, ctx.rules.holding_rule(), body);
    let caveat_kind = match ctx.request.jurisdiction {
        Jurisdiction::UnitedStates => CalloutKind::Warning,
        _ => CalloutKind::Info,
    };
    let caveat_title = match ctx.request.jurisdiction {
        Jurisdiction::India => "Long-term exemption",
        Jurisdiction::UnitedStates => "Wash-sale rule",
        Jurisdiction::Australia => "CGT discount",
    };
    callout(cursor, caveat_kind, caveat_title, ctx.rules.capital_gains_caveat());

    let (short, long) = partition(ctx.rules, &ctx.request.capital_gains_transactions);
    for (bucket, txs) in [(HoldingPeriod::Short, &short), (HoldingPeriod::Long, &long)] {
        let running = format!("{} - {}", SectionKind::CapitalGains.title(), bucket.label());
        if cursor.state() == CursorState::NearBottom {
            cursor.force_break(&running);
        } else {
            cursor.set_section(&running);
        }
        spacer(cursor, 6.0);
        heading(cursor, &format!("{} capital gains", bucket.label()), 2);
        render_table(cursor, &gains_table(ctx, bucket, txs));
    }

    let small = TextStyle::small(cursor);
    if rates.long_term_discount > Decimal::ZERO && b.long_term_gains > Decimal::ZERO {
        paragraph(
            cursor,
            &format!(
                "Net long-term gain {} less {} discount gives a discounted gain of {}.",
                format_money(b.long_term_gains, cur),
                format_rate(rates.long_term_discount),
                format_money(b.taxable_long_term_gains, cur)
            ),
            small,
        );
    }
    if rates.long_term_exemption > Decimal::ZERO && b.long_term_gains > Decimal::ZERO {
        paragraph(
            cursor,
            &format!(
                "Net long-term gain {} less the {} exemption leaves {} taxable.",
                format_money(b.long_term_gains, cur),
                format_money(rates.long_term_exemption, cur),
                format_money(b.taxable_long_term_gains, cur)
            ),
            small,
        );
    }
    if b.short_term_gains < Decimal::ZERO || b.long_term_gains < Decimal::ZERO {
        paragraph(
            cursor,
            "A bucket with a net loss contributes no tax. Losses are not set off across \
             buckets in this estimate.",
            small,
        );
    }
}

fn dividends(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::Dividends.title());
    let cur = ctx.currency;
    let s = &ctx.summary;
    let events = &ctx.request.dividend_income;

    let body = TextStyle::body(cursor);
    heading(cursor, SectionKind::Dividends.title(), 1);
    paragraph(
        cursor,
        &format!(
            "Gross dividends are assessed at {} in this estimate. Tax withheld at source is \
             shown per payment.",
            format_rate(ctx.rules.rates().dividend_rate)
        ),
        body,
    );

    let mut table = Table::new(right_headers(
        &["Date", "Ticker", "Description", "Country", "Gross", "Withheld", "Rate", "Net"],
        4,
    ))
    .with_widths(&[11.0, 8.0, 20.0, 10.0, 14.0, 13.0, 9.0, 14.0])
    .with_placeholder("No dividend income in this period.");
    table.rows = events
        .iter()
        .map(|d| {
            vec![
                Cell::date(d.date),
                Cell::text(&d.ticker),
                Cell::text(&d.description),
                Cell::text(&d.country),
                Cell::money(d.gross_dividend, cur),
                Cell::money(d.foreign_tax_withheld, cur),
                Cell::percent(d.withholding_rate),
                Cell::money(d.net_dividend, cur),
            ]
        })
        .collect();
    table.footers.push(vec![
        Cell::text(format!("Total ({})", events.len())),
        Cell::empty(),
        Cell::empty(),
        Cell::empty(),
        Cell::money(s.total_dividend_income, cur),
        Cell::money(s.total_foreign_tax_withheld, cur),
        Cell::empty(),
        Cell::money(s.total_net_dividends, cur),
    ]);
    render_table(cursor, &table);

    if !events.is_empty() {
        let mut by_country: BTreeMap<&str, (usize, Decimal, Decimal)> = BTreeMap::new();
        for d in events {
            let entry = by_country.entry(d.country.as_str()).or_default();
            entry.0 += 1;
            entry.1 += d.gross_dividend;
            entry.2 += d.foreign_tax_withheld;
        }
        heading(cursor, "Withholding by country", 2);
        let mut table = Table::new(right_headers(
            &["Country", "Payments", "Gross", "Withheld", "Effective rate"],
            1,
        ))
        .with_widths(&[28.0, 12.0, 20.0, 20.0, 20.0]);
        table.rows = by_country
            .into_iter()
            .map(|(country, (count, gross, withheld))| {
                let rate = withheld
                    .checked_div(gross)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ZERO);
                vec![
                    Cell::text(country),
                    Cell::number(count),
                    Cell::money(gross, cur),
                    Cell::money(withheld, cur),
                    Cell::percent(rate),
                ]
            })
            .collect();
        render_table(cursor, &table);
    }

    match ctx.rules.credit_label() {
        Some(label) if !s.total_foreign_tax_withheld.is_zero() => callout(
            cursor,
            CalloutKind::Success,
            label,
            &format!(
                "{} withheld abroad is credited against the domestic liability in the \
                 executive summary.",
                format_money(s.total_foreign_tax_withheld, cur)
            ),
        ),
        None if !s.total_foreign_tax_withheld.is_zero() => callout(
            cursor,
            CalloutKind::Info,
            "Foreign tax withheld",
            &format!(
                "{} was withheld abroad. This estimate does not apply a foreign tax credit; \
                 it may be claimable on Form 1116.",
                format_money(s.total_foreign_tax_withheld, cur)
            ),
        ),
        _ => {}
    }
}

fn foreign_assets(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::ForeignAssets.title());
    let cur = ctx.currency;
    let assets = &ctx.request.foreign_assets;

    heading(cursor, SectionKind::ForeignAssets.title(), 1);
    callout(
        cursor,
        CalloutKind::Warning,
        "Disclosure required",
        ctx.rules.foreign_asset_disclosure(),
    );

    let mut table = Table::new(right_headers(
        &[
            "Ticker",
            "Description",
            "Country",
            "Cost basis",
            "Peak value",
            "Closing value",
            "Income",
        ],
        3,
    ))
    .with_widths(&[9.0, 22.0, 11.0, 15.0, 15.0, 15.0, 13.0])
    .with_placeholder("No foreign assets held during this period.");
    table.rows = assets
        .iter()
        .map(|a| {
            vec![
                Cell::text(&a.ticker),
                Cell::text(&a.description),
                Cell::text(&a.country),
                Cell::money(a.cost_basis, cur),
                Cell::money(a.peak_value, cur),
                Cell::money(a.closing_value, cur),
                Cell::money(a.income, cur),
            ]
        })
        .collect();
    table.footers.push(vec![
        Cell::text(format!("Total ({})", assets.len())),
        Cell::empty(),
        Cell::empty(),
        Cell::money(assets.iter().map(|a| a.cost_basis).sum(), cur),
        Cell::money(assets.iter().map(|a| a.peak_value).sum(), cur),
        Cell::money(ctx.summary.foreign_asset_closing_value, cur),
        Cell::money(ctx.summary.foreign_asset_income, cur),
    ]);
    render_table(cursor, &table);
}

fn deductible_expenses(ctx: &ReportContext, charge: &SubscriptionCharge, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::DeductibleExpenses.title());
    let cur = ctx.currency;

    heading(cursor, SectionKind::DeductibleExpenses.title(), 1);
    let mut table = Table::new(right_headers(
        &["Plan", "Monthly fee", "Annual fee", "Deductible"],
        1,
    ))
    .with_widths(&[40.0, 20.0, 20.0, 20.0]);
    table.rows.push(vec![
        Cell::text(&charge.plan_name),
        Cell::money(charge.monthly_fee, cur),
        Cell::money(charge.annual_fee, cur),
        Cell::text(if charge.deductible { "Yes" } else { "No" }).aligned(CellAlign::Right),
    ]);
    render_table(cursor, &table);

    if charge.deductible {
        callout(
            cursor,
            CalloutKind::Success,
            &format!("Claim {} as an investment expense", format_money(charge.annual_fee, cur)),
            ctx.rules.expense_note(true),
        );
    } else {
        callout(cursor, CalloutKind::Info, "Not deductible", ctx.rules.expense_note(false));
    }
}

fn savings_opportunities(
    ctx: &ReportContext,
    items: &[SavingsOpportunity],
    cursor: &mut PageCursor,
) {
    cursor.force_break(SectionKind::SavingsOpportunities.title());
    let cur = ctx.currency;

    heading(cursor, SectionKind::SavingsOpportunities.title(), 1);
    let mut table = Table::new(vec![
        Cell::text("Date"),
        Cell::text("Opportunity"),
        Cell::text("Potential saving").aligned(CellAlign::Right),
        Cell::text("Status").aligned(CellAlign::Center),
        Cell::text("Notes"),
    ])
    .with_widths(&[12.0, 32.0, 16.0, 12.0, 28.0]);
    table.rows = items
        .iter()
        .map(|o| {
            vec![
                Cell::date(o.date),
                Cell::text(&o.description),
                Cell::money(o.potential_saving, cur),
                Cell::text(if o.implemented { "Done" } else { "Open" }).aligned(CellAlign::Center),
                Cell::text(&o.notes),
            ]
        })
        .collect();

    let total: Decimal = items.iter().map(|o| o.potential_saving).sum();
    let realized: Decimal = items
        .iter()
        .filter(|o| o.implemented)
        .map(|o| o.potential_saving)
        .sum();
    for (label, amount) in [
        ("Total identified", total),
        ("Implemented", realized),
        ("Still open", total - realized),
    ] {
        table.footers.push(pad_row(
            vec![Cell::text(label), Cell::empty(), Cell::money(amount, cur)],
            5,
        ));
    }
    render_table(cursor, &table);

    if realized > Decimal::ZERO {
        callout(
            cursor,
            CalloutKind::Success,
            "Savings captured",
            &format!(
                "{} of the {} identified has already been acted on.",
                format_money(realized, cur),
                format_money(total, cur)
            ),
        );
    }
}

fn notes(ctx: &ReportContext, cursor: &mut PageCursor) {
    cursor.force_break(SectionKind::Notes.title());
    let cur = ctx.currency;
    let rates = ctx.rules.rates();

    heading(cursor, SectionKind::Notes.title(), 1);
    heading(cursor, "Rates and assumptions", 2);
    let mut pairs = vec![
        ("Short-term rate".to_string(), format_rate(rates.short_term_rate)),
        ("Long-term rate".to_string(), long_term_rate_label(&rates, cur)),
        ("Dividend rate".to_string(), format_rate(rates.dividend_rate)),
        ("Holding period".to_string(), ctx.rules.holding_rule().to_string()),
    ];
    pairs.push((
        "Foreign tax".to_string(),
        match ctx.rules.credit_label() {
            Some(label) => format!("{} equal to tax withheld, never below zero payable", label),
            None => "No credit applied".to_string(),
        },
    ));
    key_value_lines(cursor, &pairs);

    divider(cursor);
    heading(cursor, "Disclaimer", 2);
    let small = TextStyle::small(cursor);
    paragraph(
        cursor,
        &format!(
            "This document is generated from the records supplied for {} and is provided for \
             information only. It is not a tax return and does not constitute tax advice. Rates \
             are applied as flat percentages and do not account for your total income, \
             carried-forward losses or changes in law after the period ended. Consult a \
             qualified adviser before filing with the {}.",
            ctx.request.account_holder.name,
            ctx.rules.authority()
        ),
        small,
    );
    paragraph(
        cursor,
        "Amounts are rounded to two decimal places for display only; totals are computed \
         from unrounded values.",
        small.bold(),
    );
}
