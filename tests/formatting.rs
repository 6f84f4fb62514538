mod common;

use common::date;
use rust_decimal_macros::dec;
use taxdoc_pdf::format::{
    Currency, days_held, file_name_component, format_date, format_money, format_percent,
    format_rate, format_signed_money, months_held,
};

#[test]
fn money_groups_by_currency_convention() {
    assert_eq!(format_money(dec!(1234567.891), Currency::Inr), "Rs. 12,34,567.89");
    assert_eq!(format_money(dec!(1234567.5), Currency::Usd), "$1,234,567.50");
    assert_eq!(format_money(dec!(999), Currency::Aud), "A$999.00");
    assert_eq!(format_money(dec!(100000), Currency::Inr), "Rs. 1,00,000.00");
    assert_eq!(format_money(dec!(0), Currency::Usd), "$0.00");
}

#[test]
fn money_rounds_half_away_from_zero() {
    assert_eq!(format_money(dec!(0.005), Currency::Usd), "$0.01");
    assert_eq!(format_money(dec!(2.675), Currency::Usd), "$2.68");
    assert_eq!(format_money(dec!(-1234.565), Currency::Usd), "-$1,234.57");
}

#[test]
fn signed_money_marks_gains_only() {
    assert_eq!(format_signed_money(dec!(12.3), Currency::Usd), "+$12.30");
    assert_eq!(format_signed_money(dec!(-12.3), Currency::Usd), "-$12.30");
    assert_eq!(format_signed_money(dec!(0), Currency::Usd), "$0.00");
    assert_eq!(format_signed_money(dec!(-0.001), Currency::Usd), "$0.00");
}

#[test]
fn rates_and_percentages() {
    assert_eq!(format_rate(dec!(0.325)), "32.5%");
    assert_eq!(format_rate(dec!(0.15)), "15%");
    assert_eq!(format_percent(dec!(25)), "25%");
    assert_eq!(format_percent(dec!(26.0000)), "26%");
}

#[test]
fn dates_print_day_month_year() {
    assert_eq!(format_date(date(2024, 3, 5)), "05 Mar 2024");
}

#[test]
fn holding_durations() {
    assert_eq!(days_held(date(2023, 1, 1), date(2024, 1, 1)), 365);
    assert_eq!(days_held(date(2024, 1, 1), date(2025, 1, 1)), 366);
    assert_eq!(months_held(date(2023, 1, 31), date(2023, 2, 27)), 0);
    assert_eq!(months_held(date(2023, 1, 31), date(2023, 2, 28)), 1);
    assert_eq!(months_held(date(2023, 1, 15), date(2023, 2, 15)), 1);
    assert_eq!(months_held(date(2022, 4, 1), date(2024, 3, 31)), 23);
    assert_eq!(months_held(date(2022, 4, 1), date(2024, 4, 1)), 24);
    assert_eq!(months_held(date(2024, 4, 1), date(2024, 4, 1)), 0);
}

#[test]
fn file_name_component_is_filesystem_safe() {
    assert_eq!(file_name_component("FY 2023-24"), "FY_2023-24");
    assert_eq!(file_name_component("  2023 / Q4 "), "2023_Q4");
    assert_eq!(file_name_component("Tax year: 2024"), "Tax_year_2024");
}
