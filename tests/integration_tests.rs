use financial_valuation_engine::*;

fn balance_sheet_table() -> RawStatementTable {
    RawStatementTable::from_rows(vec![
        vec!["Consolidated Balance Sheet", "", "", ""],
        vec!["(all figures in thousands)", "", "", ""],
        vec!["Item", "2023", "2021", "2022"],
        vec!["Total Current Assets", "340", "280", "310"],
        vec!["Total Current Liabilities", "170", "140", "155"],
        vec!["Inventories", "70", "50", "60"],
        vec!["Total Assets", "1,250", "1,000", "1,100"],
        vec!["Total Liabilities", "480", "400", "440"],
        vec!["Shareholders' Equity", "770", "600", "660"],
        vec!["Cash and Cash Equivalents", "120", "80", "100"],
        vec!["Long-term Debt", "210", "250", "230"],
    ])
}

fn income_statement_table() -> RawStatementTable {
    RawStatementTable::from_rows(vec![
        vec!["Item", "2021", "2022", "2023"],
        vec!["Net Sales", "750", "830", "910"],
        vec!["Net Income", "95", "110", "125"],
        vec!["Gross Profit", "300", "330", "365"],
    ])
}

fn cash_flow_table() -> RawStatementTable {
    RawStatementTable::from_rows(vec![
        vec!["Item", "2021", "2022", "2023"],
        vec!["Net Cash from Operating Activities", "105", "118", "132"],
        vec!["Capital Expenditures", "(22)", "(26)", "(32)"],
    ])
}

fn all_tables() -> StatementTables {
    StatementTables {
        balance_sheet: Some(balance_sheet_table()),
        income_statement: Some(income_statement_table()),
        cash_flow: Some(cash_flow_table()),
    }
}

#[test]
fn test_full_pipeline_with_shuffled_columns() {
    let (financials, issues) = Financials::resolve(&all_tables(), &StatementSpecs::default());
    assert!(issues.is_empty());

    // Balance sheet columns arrive as 2023, 2021, 2022 but resolve ascending
    let periods: Vec<Period> = financials
        .balance_sheet
        .series("TotalAssets")
        .unwrap()
        .keys()
        .copied()
        .collect();
    assert_eq!(periods, vec![2021, 2022, 2023]);

    // Latest period drives every downstream figure
    assert_eq!(financials.balance_sheet.latest_or("TotalAssets", 0.0), 1250.0);
    assert_eq!(financials.income_statement.latest_or("NetIncome", 0.0), 125.0);
    assert_eq!(financials.cash_flow.latest_or("OperatingCashFlow", 0.0), 132.0);

    let result = value_company(&financials, &ValuationInputs::default()).unwrap();

    // Earnings multiple: 125 * 15
    assert!((result.earnings_multiple.value - 1875.0).abs() < 1e-9);
    // Asset-based: (1250 - 480) * 0.9
    assert!((result.asset_based.value - 693.0).abs() < 1e-9);
    assert!(!result.dcf.defaulted);

    let breakdown = result.dcf_breakdown.as_ref().unwrap();
    // FCF = 132 - |-32|
    assert!((breakdown.base_free_cash_flow - 100.0).abs() < 1e-9);

    let expected_weighted = result.dcf.value * 0.5
        + result.earnings_multiple.value * 0.3
        + result.asset_based.value * 0.2;
    assert!((result.weighted - expected_weighted).abs() < 1e-9);

    // Ratios come from the latest period
    assert!((result.ratios["current_ratio"] - 340.0 / 170.0).abs() < 1e-9);
    assert!((result.ratios["debt_to_equity"] - 480.0 / 770.0).abs() < 1e-9);
    assert!((result.ratios["profit_margin"] - 125.0 / 910.0).abs() < 1e-9);

    // Every resolved balance sheet metric carries all three periods
    let mut metric_count = 0;
    for (metric, periods) in financials.balance_sheet.metrics() {
        metric_count += 1;
        assert_eq!(
            periods.keys().copied().collect::<Vec<Period>>(),
            vec![2021, 2022, 2023],
            "unexpected periods for {}",
            metric
        );
    }
    assert_eq!(metric_count, 8);
}

#[test]
fn test_partial_failure_missing_equity_still_yields_full_result() {
    // Balance sheet with no equity row at all
    let balance_sheet = RawStatementTable::from_rows(vec![
        vec!["Item", "2023"],
        vec!["Total Current Assets", "340"],
        vec!["Total Current Liabilities", "170"],
        vec!["Total Assets", "1,250"],
        vec!["Total Liabilities", "480"],
    ]);

    let tables = StatementTables {
        balance_sheet: Some(balance_sheet),
        income_statement: Some(income_statement_table()),
        cash_flow: Some(cash_flow_table()),
    };

    let (financials, issues) = Financials::resolve(&tables, &StatementSpecs::default());
    assert!(issues.is_empty());
    assert!(!financials.balance_sheet.contains_metric("ShareholdersEquity"));

    let result = value_company(&financials, &ValuationInputs::default()).unwrap();

    // Complete ratio set with the zero-denominator defaults applied
    assert_eq!(result.ratios.len(), 7);
    assert_eq!(result.ratios["return_on_equity"], 0.0);
    assert_eq!(result.ratios["debt_to_equity"], f64::INFINITY);
    // Inventory absent: quick ratio falls back to current assets alone
    assert!((result.ratios["quick_ratio"] - 2.0).abs() < 1e-9);

    // Asset-based valuation still computed from what is present
    assert!(!result.asset_based.defaulted);
    assert!((result.asset_based.value - (1250.0 - 480.0) * 0.9).abs() < 1e-9);
}

#[test]
fn test_all_statements_unresolvable_degrades_to_defaults() {
    let prose: Vec<Vec<&str>> = (0..11).map(|_| vec!["narrative text", "more text"]).collect();
    let tables = StatementTables {
        balance_sheet: Some(RawStatementTable::from_rows(prose.clone())),
        income_statement: Some(RawStatementTable::from_rows(prose.clone())),
        cash_flow: Some(RawStatementTable::from_rows(prose)),
    };

    let (result, issues) =
        value_from_tables(&tables, &StatementSpecs::default(), &ValuationInputs::default())
            .unwrap();

    assert_eq!(issues.len(), 3);
    assert!(result.dcf.defaulted);
    assert!(result.earnings_multiple.defaulted);
    assert!(result.asset_based.defaulted);
    assert_eq!(result.weighted, 0.0);
    // Ratio set is still complete, at its policy defaults
    assert_eq!(result.ratios.len(), 7);
}

#[test]
fn test_custom_spec_substitution() {
    // A caller can resolve against an alternate synonym map without touching
    // any global state
    let spec = MetricSpec::new(
        StatementType::IncomeStatement,
        vec![("NetIncome", vec!["Profit for the Year"])],
    );

    let table = RawStatementTable::from_rows(vec![
        vec!["Item", "2023"],
        vec!["Profit for the Year", "88"],
        vec!["Net Income", "999"],
    ]);

    let series = resolve_statement(&table, &spec).unwrap();
    assert_eq!(series.latest_or("NetIncome", 0.0), 88.0);
}

#[test]
fn test_date_formatted_headers() {
    let table = RawStatementTable::from_rows(vec![
        vec!["Item", "2022-12-31", "2023-12-31"],
        vec!["Total Assets", "1,000", "1,100"],
    ]);

    let series = resolve_statement(&table, &MetricSpec::balance_sheet()).unwrap();
    assert_eq!(series.value_at("TotalAssets", 2022, 0.0), 1000.0);
    assert_eq!(series.value_at("TotalAssets", 2023, 0.0), 1100.0);
}

#[test]
fn test_result_serializes_for_export() -> anyhow::Result<()> {
    let (financials, _) = Financials::resolve(&all_tables(), &StatementSpecs::default());
    let result = value_company(&financials, &ValuationInputs::default())?;

    let json = serde_json::to_string_pretty(&result)?;
    assert!(json.contains("dcf_breakdown"));
    assert!(json.contains("terminal_value"));
    assert!(json.contains("current_ratio"));

    Ok(())
}

#[test]
fn test_metric_spec_json_round_trip() -> anyhow::Result<()> {
    let spec = MetricSpec::balance_sheet();
    let json = spec.to_json()?;
    let restored = MetricSpec::from_json(&json)?;

    let table = RawStatementTable::from_rows(vec![
        vec!["Item", "2023"],
        vec!["Total Assets", "500"],
    ]);
    let series = resolve_statement(&table, &restored)?;
    assert_eq!(series.latest_or("TotalAssets", 0.0), 500.0);

    Ok(())
}

#[test]
fn test_mixed_cell_types_in_one_table() {
    // Loaders may hand over numbers as numbers and years as numeric headers
    let table = RawStatementTable::new(vec![
        vec![
            Cell::text("Item"),
            Cell::Number(2022.0),
            Cell::Number(2023.0),
        ],
        vec![
            Cell::text("Total Assets"),
            Cell::Number(1000.0),
            Cell::text("1,100"),
        ],
        vec![Cell::text("Cash"), Cell::Blank, Cell::text("n/a")],
    ]);

    let series = resolve_statement(&table, &MetricSpec::balance_sheet()).unwrap();
    assert_eq!(series.value_at("TotalAssets", 2022, 0.0), 1000.0);
    assert_eq!(series.value_at("TotalAssets", 2023, 0.0), 1100.0);

    // Cash row matched, but both periods are unavailable; absence and
    // unavailability stay distinct
    assert!(series.contains_metric("Cash"));
    assert_eq!(series.latest("Cash"), None);
    assert_eq!(series.latest_or("Cash", 0.0), 0.0);
}
