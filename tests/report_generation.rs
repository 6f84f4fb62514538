mod common;

use common::{
    body_floor, dividend, drawn_tickers, empty_request, foreign_asset, long_sale, many_sales,
    opportunity, pages_in_section, short_sale, subscription, text_positions,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxdoc_pdf::model::SuppliedSummary;
use taxdoc_pdf::{
    Error, Jurisdiction, LayoutConfig, PageSize, SectionKind, generate_australia_report,
    generate_india_report, generate_report, generate_report_with, generate_united_states_report,
    write_report,
};

fn section_sequence(doc: &taxdoc_pdf::GeneratedDocument) -> Vec<String> {
    let mut seq: Vec<String> = Vec::new();
    for page in doc.pages() {
        if seq.last().map(String::as_str) != Some(page.section()) {
            seq.push(page.section().to_string());
        }
    }
    seq
}

#[test]
fn empty_request_renders_core_sections_in_order() {
    common::init_logging();
    for jurisdiction in Jurisdiction::ALL {
        let doc = generate_report(&empty_request(jurisdiction)).expect("generate");
        assert_eq!(
            section_sequence(&doc),
            [
                "Introduction",
                "Executive Summary",
                "Capital Gains Schedule",
                "Dividend Income Schedule",
                "Foreign Asset Schedule",
                "Notes & Disclaimer",
            ],
            "{jurisdiction}"
        );
        assert!(doc.contains_text("No short-term transactions in this period."));
        assert!(doc.contains_text("No long-term transactions in this period."));
        assert!(doc.contains_text("No dividend income in this period."));
        assert!(doc.contains_text("No foreign assets held during this period."));
        assert!(!doc.contains_text(SectionKind::DeductibleExpenses.title()));
        assert!(!doc.contains_text("Withholding by country"));
    }
}

#[test]
fn pages_are_numbered_and_stamped() {
    let doc = generate_report(&empty_request(Jurisdiction::India)).expect("generate");
    for (i, page) in doc.pages().iter().enumerate() {
        assert_eq!(page.number(), i + 1);
        let label = format!("Page {}", i + 1);
        assert!(page.texts().iter().any(|t| t == &label), "missing {label}");
        assert!(page.contains_text("Generated 15 Apr 2024"));
        assert!(page.contains_text("Portfolio Tax Center"));
        assert!(!page.content().is_empty());
    }

    let mut request = empty_request(Jurisdiction::India);
    request.generated_on = None;
    let doc = generate_report(&request).expect("generate");
    assert!(!doc.contains_text("Generated "));
}

#[test]
fn jurisdiction_wording_reaches_the_document() {
    let india = generate_report(&empty_request(Jurisdiction::India)).expect("india");
    assert!(india.contains_text("Capital Gains & Foreign Income Statement"));
    assert!(india.contains_text("Schedule FA"));
    assert!(india.contains_text("Long-term exemption"));

    let us = generate_report(&empty_request(Jurisdiction::UnitedStates)).expect("us");
    assert!(us.contains_text("Wash-sale rule"));
    assert!(us.contains_text("FBAR"));

    let au = generate_report(&empty_request(Jurisdiction::Australia)).expect("au");
    assert!(au.contains_text("Foreign income tax offset"));
    assert!(au.contains_text("32.5% after 50% discount"));
}

#[test]
fn long_schedule_paginates_without_losing_rows() {
    common::init_logging();
    let request = many_sales(Jurisdiction::UnitedStates, 120);
    let doc = generate_report(&request).expect("generate");

    let expected: Vec<String> = (0..120).map(|i| format!("TK{i:03}")).collect();
    assert_eq!(drawn_tickers(&doc), expected);

    let gains_pages: Vec<_> = pages_in_section(&doc, "Capital Gains Schedule").collect();
    assert!(gains_pages.len() >= 3, "only {} pages", gains_pages.len());
    for page in gains_pages.iter().filter(|p| p.contains_text("TK")) {
        assert!(
            page.texts().iter().any(|t| t == "Ticker"),
            "page {} lacks the repeated header band",
            page.number()
        );
    }
}

#[test]
fn header_band_can_be_left_off_continuation_pages() {
    let request = many_sales(Jurisdiction::UnitedStates, 120);
    let config = LayoutConfig {
        repeat_table_headers: false,
        ..LayoutConfig::default()
    };
    let doc = generate_report_with(&request, &config).expect("generate");

    assert_eq!(drawn_tickers(&doc).len(), 120);
    assert!(
        pages_in_section(&doc, "Capital Gains Schedule")
            .any(|p| p.contains_text("TK") && !p.texts().iter().any(|t| t == "Ticker"))
    );
}

#[test]
fn capital_gains_footers_equal_bucket_sums() {
    let j = Jurisdiction::UnitedStates;
    let mut request = empty_request(j);
    request.capital_gains_transactions = vec![
        short_sale(j, "AMD", dec!(1000), dec!(1100)),
        long_sale(j, "PEP", dec!(2000), dec!(2500)),
        short_sale(j, "INTC", dec!(500), dec!(470)),
        long_sale(j, "JNJ", dec!(1000), dec!(1250)),
    ];
    let doc = generate_report(&request).expect("generate");

    let gains: Vec<String> = pages_in_section(&doc, "Capital Gains Schedule")
        .flat_map(|p| p.texts().iter().cloned())
        .collect();
    let has = |needle: &str| gains.iter().any(|t| t == needle);
    assert!(has("+$70.00"), "short bucket total");
    assert!(has("+$750.00"), "long bucket total");
    assert!(has("-$30.00"));
    assert_eq!(gains.iter().filter(|t| *t == "Total (2)").count(), 2);
}

#[test]
fn dividend_footer_matches_summary_totals() {
    let mut request = empty_request(Jurisdiction::Australia);
    request.dividend_income = vec![
        dividend("AAPL", dec!(1000), dec!(150), "United States"),
        dividend("NESN", dec!(234.5), dec!(0), "Switzerland"),
    ];
    let doc = generate_report(&request).expect("generate");

    let page_texts: Vec<String> = pages_in_section(&doc, "Dividend Income Schedule")
        .flat_map(|p| p.texts().iter().cloned())
        .collect();
    for needle in ["A$1,234.50", "A$150.00", "A$1,084.50", "Total (2)"] {
        assert!(page_texts.iter().any(|t| t == needle), "missing {needle}");
    }
    assert!(doc.contains_text("Withholding by country"));
    assert!(doc.contains_text("15%"));
}

#[test]
fn optional_sections_appear_when_data_exists() {
    let mut request = empty_request(Jurisdiction::UnitedStates);
    request.subscription_charge = Some(subscription(true));
    request.savings_opportunities = vec![
        opportunity("Harvest loss on META", dec!(120), true),
        opportunity("Max out IRA contribution", dec!(1500), false),
    ];
    request.foreign_assets = vec![foreign_asset("SAP", dec!(12000), dec!(300))];
    let doc = generate_report(&request).expect("generate");

    let seq = section_sequence(&doc);
    let pos = |title: &str| seq.iter().position(|s| s == title).expect(title);
    assert!(pos("Foreign Asset Schedule") < pos("Deductible Expenses"));
    assert!(pos("Deductible Expenses") < pos("Tax-Saving Opportunities"));
    assert!(pos("Tax-Saving Opportunities") < pos("Notes & Disclaimer"));

    assert!(doc.contains_text("Claim $199.00 as an investment expense"));
    assert!(doc.contains_text("Savings captured"));
    assert!(doc.contains_text("$1,620.00"));
    assert!(doc.contains_text("$1,500.00"));
    assert!(doc.contains_text("6. Deductible Expenses"));
}

#[test]
fn non_deductible_subscription_gets_info_note() {
    let mut request = empty_request(Jurisdiction::India);
    request.subscription_charge = Some(subscription(false));
    let doc = generate_report(&request).expect("generate");
    assert!(doc.contains_text("Not deductible"));
    assert!(!doc.contains_text("as an investment expense"));
}

#[test]
fn invalid_requests_are_rejected_before_layout() {
    let j = Jurisdiction::India;

    let mut sold_early = empty_request(j);
    let mut tx = short_sale(j, "WIPRO", dec!(100), dec!(120));
    std::mem::swap(&mut tx.acquired_date, &mut tx.sold_date);
    sold_early.capital_gains_transactions = vec![tx];

    let mut bad_gain = empty_request(j);
    let mut tx = short_sale(j, "ITC", dec!(100), dec!(120));
    tx.gain_loss = dec!(25);
    bad_gain.capital_gains_transactions = vec![tx];

    let mut bad_net = empty_request(j);
    let mut div = dividend("AAPL", dec!(100), dec!(25), "United States");
    div.net_dividend = dec!(80);
    bad_net.dividend_income = vec![div];

    let mut blank_period = empty_request(j);
    blank_period.tax_period_label = "   ".to_string();

    let mut summary_mismatch = empty_request(j);
    summary_mismatch.dividend_income = vec![dividend("AAPL", dec!(100), dec!(25), "United States")];
    summary_mismatch.portfolio_summary = Some(SuppliedSummary {
        total_dividend_income: Some(dec!(99)),
        ..SuppliedSummary::default()
    });

    for request in [sold_early, bad_gain, bad_net, blank_period, summary_mismatch] {
        match generate_report(&request) {
            Err(Error::InvalidRequest(_)) => {}
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }
}

#[test]
fn matching_supplied_summary_is_accepted() {
    let mut request = empty_request(Jurisdiction::India);
    request.dividend_income = vec![dividend("AAPL", dec!(100), dec!(25), "United States")];
    request.portfolio_summary = Some(SuppliedSummary {
        total_dividend_income: Some(dec!(100.00)),
        total_foreign_tax_withheld: Some(dec!(25)),
        ..SuppliedSummary::default()
    });
    assert!(generate_report(&request).is_ok());
}

#[test]
fn amounts_beyond_the_decimal_range_are_invalid() {
    let j = Jurisdiction::UnitedStates;
    let huge = Decimal::MAX - Decimal::ONE;

    let mut sales = empty_request(j);
    sales.capital_gains_transactions =
        vec![short_sale(j, "BIG1", huge, huge), short_sale(j, "BIG2", huge, huge)];

    let mut dividends = empty_request(j);
    dividends.dividend_income = vec![
        dividend("BIG1", huge, Decimal::ZERO, "Japan"),
        dividend("BIG2", huge, Decimal::ZERO, "Japan"),
    ];

    for request in [sales, dividends] {
        assert!(request.validate().is_err());
        match generate_report(&request) {
            Err(Error::InvalidRequest(msg)) => assert!(msg.contains("overflow"), "{msg}"),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }
}

#[test]
fn oversized_free_text_stays_inside_the_page() {
    common::init_logging();
    let mut request = empty_request(Jurisdiction::UnitedStates);
    request.account_holder.address = "addr ".repeat(2000);
    let mut item = opportunity("Harvest losses", dec!(100), false);
    item.notes = "word ".repeat(3000);
    request.savings_opportunities = vec![item];

    let config = LayoutConfig::default();
    let doc = generate_report_with(&request, &config).expect("generate");
    let floor = body_floor(&config);

    let (mut address_words, mut note_words) = (0, 0);
    for page in doc.pages() {
        for (y, text) in text_positions(page) {
            let count = text.split_whitespace().count();
            if text.starts_with("addr") {
                address_words += count;
            } else if text.starts_with("word") {
                note_words += count;
            } else {
                continue;
            }
            assert!(y >= floor, "page {}: {text:?} at y={y}", page.number());
        }
    }
    assert_eq!(address_words, 2000);
    assert_eq!(note_words, 3000);

    let savings: Vec<_> = pages_in_section(&doc, "Tax-Saving Opportunities").collect();
    assert!(savings.len() > 1);
    for page in savings {
        if page.texts().iter().any(|t| t == "Opportunity") {
            assert!(
                page.texts()
                    .iter()
                    .any(|t| t.starts_with("word") || t == "Total identified"),
                "page {} holds a header band with no rows",
                page.number()
            );
        }
    }
}

#[test]
fn per_jurisdiction_entry_points_check_the_request() {
    let us = empty_request(Jurisdiction::UnitedStates);
    assert!(generate_united_states_report(&us).is_ok());
    assert!(matches!(generate_india_report(&us), Err(Error::InvalidRequest(_))));
    assert!(matches!(generate_australia_report(&us), Err(Error::InvalidRequest(_))));
    assert!(generate_india_report(&empty_request(Jurisdiction::India)).is_ok());
    assert!(generate_australia_report(&empty_request(Jurisdiction::Australia)).is_ok());
}

#[test]
fn pdf_bytes_and_export_name() {
    let doc = generate_report(&empty_request(Jurisdiction::UnitedStates)).expect("generate");
    let bytes = doc.to_pdf();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.windows(11).any(|w| w == b"FlateDecode"));
    assert!(bytes.windows(9).any(|w| w == b"Helvetica"));

    assert_eq!(doc.file_name(1_700_000_000), "US_Tax_Report_FY_2023-24_1700000000.pdf");
    let india = generate_report(&empty_request(Jurisdiction::India)).expect("generate");
    assert_eq!(india.file_name(42), "India_Tax_Report_FY_2023-24_42.pdf");
}

#[test]
fn write_report_creates_the_named_file() {
    let dir = std::env::temp_dir().join(format!("taxdoc-pdf-test-{}", std::process::id()));
    let doc = generate_report(&empty_request(Jurisdiction::Australia)).expect("generate");

    let path = write_report(&doc, &dir, 1_700_000_000).expect("write");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("Australia_Tax_Report_FY_2023-24_1700000000.pdf")
    );
    let written = std::fs::read(&path).expect("read back");
    assert_eq!(written, doc.to_pdf());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn letter_pages_hold_fewer_rows_than_a4() {
    let request = many_sales(Jurisdiction::India, 200);
    let a4 = generate_report(&request).expect("a4");
    let letter = generate_report_with(
        &request,
        &LayoutConfig {
            page_size: PageSize::Letter,
            ..LayoutConfig::default()
        },
    )
    .expect("letter");
    assert!(letter.page_count() >= a4.page_count());
    assert_eq!(drawn_tickers(&letter).len(), 200);
}

#[test]
fn parallel_generation_is_deterministic() {
    let requests: Vec<_> = Jurisdiction::ALL
        .iter()
        .flat_map(|j| [empty_request(*j), many_sales(*j, 60)])
        .collect();

    let sequential: Vec<Vec<u8>> = requests
        .iter()
        .map(|r| generate_report(r).expect("generate").to_pdf())
        .collect();
    let parallel: Vec<Vec<u8>> = requests
        .par_iter()
        .map(|r| generate_report(r).expect("generate").to_pdf())
        .collect();

    assert_eq!(sequential, parallel);
}
