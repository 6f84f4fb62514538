use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Currency {
    Inr,
    Usd,
    Aud,
}

impl Currency {
    /// WinAnsi-safe symbol. The rupee sign has no WinAnsi code point.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "Rs. ",
            Currency::Usd => "$",
            Currency::Aud => "A$",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Aud => "AUD",
        }
    }
}

/// Format an amount for display, rounded half away from zero to cents.
///
/// INR uses lakh grouping (`12,34,567.00`), the others group by thousands.
pub fn format_money(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let grouped = match currency {
        Currency::Inr => group_lakh(int_part),
        Currency::Usd | Currency::Aud => group_thousands(int_part),
    };

    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{grouped}.{frac_part}", currency.symbol())
}

/// Like [`format_money`] but amounts that round to a positive value carry
/// an explicit `+`.
pub fn format_signed_money(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format_money(amount, currency);
    if rounded > Decimal::ZERO {
        format!("+{s}")
    } else {
        s
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn group_lakh(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let head_bytes = head.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, b) in head_bytes.iter().enumerate() {
        if i > 0 && (head_bytes.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Format a fractional rate (`0.325`) as a percentage (`32.5%`).
pub fn format_rate(rate: Decimal) -> String {
    format_percent(rate * Decimal::ONE_HUNDRED)
}

/// Format a value that is already a percentage (`25` -> `25%`).
pub fn format_percent(pct: Decimal) -> String {
    format!("{}%", pct.round_dp(2).normalize())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn format_quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}

/// Calendar days between acquisition and sale.
pub fn days_held(acquired: NaiveDate, sold: NaiveDate) -> i64 {
    (sold - acquired).num_days()
}

/// Completed calendar months between acquisition and sale. A month is
/// complete once the same day of month is reached (clamped to month end).
pub fn months_held(acquired: NaiveDate, sold: NaiveDate) -> u32 {
    if sold <= acquired {
        return 0;
    }
    let mut months = (sold.year() - acquired.year()) * 12 + sold.month() as i32
        - acquired.month() as i32;
    if months > 0
        && acquired
            .checked_add_months(Months::new(months as u32))
            .is_some_and(|anniversary| anniversary > sold)
    {
        months -= 1;
    }
    months.max(0) as u32
}

/// True once `sold` is on or after the date `months` calendar months after
/// `acquired`.
pub fn reached_months(acquired: NaiveDate, sold: NaiveDate, months: u32) -> bool {
    acquired
        .checked_add_months(Months::new(months))
        .is_some_and(|anniversary| sold >= anniversary)
}

/// True once `sold` is strictly after the date `months` calendar months
/// after `acquired`.
pub fn exceeded_months(acquired: NaiveDate, sold: NaiveDate, months: u32) -> bool {
    acquired
        .checked_add_months(Months::new(months))
        .is_some_and(|anniversary| sold > anniversary)
}

/// Make a display label safe for use inside a file name.
pub fn file_name_component(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_sep = true;
    for c in label.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
