use crate::Financials;
use std::collections::BTreeMap;

/// Named ratio values derived from the most recent period of each statement.
pub type RatioSet = BTreeMap<String, f64>;

// Zero-denominator policy: current_ratio, quick_ratio and debt_to_equity
// resolve to +infinity; return_on_assets, return_on_equity, profit_margin
// and debt_ratio resolve to 0. The asymmetry is intentional.

fn ratio_or(numerator: f64, denominator: f64, when_zero: f64) -> f64 {
    if denominator == 0.0 {
        when_zero
    } else {
        numerator / denominator
    }
}

pub fn liquidity_ratios(financials: &Financials) -> RatioSet {
    let bs = &financials.balance_sheet;
    let current_assets = bs.latest_or("CurrentAssets", 0.0);
    let current_liabilities = bs.latest_or("CurrentLiabilities", 0.0);
    let inventory = bs.latest_or("Inventory", 0.0);

    let mut ratios = RatioSet::new();
    ratios.insert(
        "current_ratio".to_string(),
        ratio_or(current_assets, current_liabilities, f64::INFINITY),
    );
    ratios.insert(
        "quick_ratio".to_string(),
        ratio_or(current_assets - inventory, current_liabilities, f64::INFINITY),
    );
    ratios
}

pub fn profitability_ratios(financials: &Financials) -> RatioSet {
    let net_income = financials.income_statement.latest_or("NetIncome", 0.0);
    let revenue = financials.income_statement.latest_or("Revenue", 0.0);
    let total_assets = financials.balance_sheet.latest_or("TotalAssets", 0.0);
    let equity = financials.balance_sheet.latest_or("ShareholdersEquity", 0.0);

    let mut ratios = RatioSet::new();
    ratios.insert(
        "return_on_assets".to_string(),
        ratio_or(net_income, total_assets, 0.0),
    );
    ratios.insert(
        "return_on_equity".to_string(),
        ratio_or(net_income, equity, 0.0),
    );
    ratios.insert(
        "profit_margin".to_string(),
        ratio_or(net_income, revenue, 0.0),
    );
    ratios
}

pub fn leverage_ratios(financials: &Financials) -> RatioSet {
    let bs = &financials.balance_sheet;
    let total_assets = bs.latest_or("TotalAssets", 0.0);
    let total_liabilities = bs.latest_or("TotalLiabilities", 0.0);
    let equity = bs.latest_or("ShareholdersEquity", 0.0);

    let mut ratios = RatioSet::new();
    ratios.insert(
        "debt_to_equity".to_string(),
        ratio_or(total_liabilities, equity, f64::INFINITY),
    );
    ratios.insert(
        "debt_ratio".to_string(),
        ratio_or(total_liabilities, total_assets, 0.0),
    );
    ratios
}

/// Union of the liquidity, profitability, and leverage ratio sets.
pub fn all_ratios(financials: &Financials) -> RatioSet {
    let mut ratios = liquidity_ratios(financials);
    ratios.extend(profitability_ratios(financials));
    ratios.extend(leverage_ratios(financials));
    ratios
}
