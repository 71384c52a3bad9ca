//! # Financial Valuation Engine
//!
//! A library for normalizing loosely structured financial-statement tables
//! (balance sheet, income statement, cash-flow statement) into a time-indexed
//! metric store, and deriving a company valuation from multiple independent
//! methods plus standard financial ratios.
//!
//! ## Core Concepts
//!
//! - **Raw Statement Table**: an ordered 2-D grid of cells as loaded from one
//!   statement's source sheet; row labels, column headers, and year ordering
//!   are not fixed
//! - **Metric Spec**: static configuration mapping canonical metric names to
//!   candidate row-label synonyms, per statement type
//! - **Metric Series**: the normalized store of per-period values keyed by
//!   canonical metric name, with periods always ascending
//! - **Valuation Result**: DCF, earnings-multiple, asset-based, and weighted
//!   valuations plus the ratio set and the DCF audit breakdown
//!
//! ## Example
//!
//! ```rust
//! use financial_valuation_engine::*;
//!
//! let balance_sheet = RawStatementTable::from_rows(vec![
//!     vec!["Item", "2022", "2023"],
//!     vec!["Total Assets", "1,000", "1,200"],
//!     vec!["Total Liabilities", "400", "450"],
//!     vec!["Cash", "90", "110"],
//! ]);
//!
//! let tables = StatementTables {
//!     balance_sheet: Some(balance_sheet),
//!     income_statement: None,
//!     cash_flow: None,
//! };
//!
//! let (financials, issues) = Financials::resolve(&tables, &StatementSpecs::default());
//! assert!(issues.is_empty());
//!
//! let result = value_company(&financials, &ValuationInputs::default()).unwrap();
//! assert!(!result.asset_based.defaulted);
//! ```

pub mod error;
pub mod normalize;
pub mod ratios;
pub mod resolver;
pub mod spec;
pub mod store;
pub mod table;
pub mod valuation;

pub use error::{Result, ValuationError};
pub use normalize::{normalize, MetricValue};
pub use ratios::{all_ratios, leverage_ratios, liquidity_ratios, profitability_ratios, RatioSet};
pub use resolver::resolve_statement;
pub use spec::{MetricMapping, MetricSpec, StatementType};
pub use store::{MetricSeries, Period, PeriodSeries};
pub use table::{Cell, RawStatementTable};
pub use valuation::{
    asset_based_valuation, dcf_valuation, multiple_valuation, run_valuation, weighted_valuation,
    DcfAssumptions, DcfBreakdown, MethodValuation, ValuationInputs, ValuationResult,
    ValuationWeights,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// The three raw statement tables for one company, any of which may be
/// missing when the source workbook lacks that sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementTables {
    pub balance_sheet: Option<RawStatementTable>,
    pub income_statement: Option<RawStatementTable>,
    pub cash_flow: Option<RawStatementTable>,
}

/// The metric spec to apply per statement. Defaults to the built-in synonym
/// maps; tests and callers may substitute their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementSpecs {
    pub balance_sheet: MetricSpec,
    pub income_statement: MetricSpec,
    pub cash_flow: MetricSpec,
}

impl Default for StatementSpecs {
    fn default() -> Self {
        Self {
            balance_sheet: MetricSpec::balance_sheet(),
            income_statement: MetricSpec::income_statement(),
            cash_flow: MetricSpec::cash_flow(),
        }
    }
}

/// A per-statement resolution failure, reported back to the caller who
/// decides whether to abort the run or continue with partial data.
#[derive(Debug)]
pub struct StatementIssue {
    pub statement_type: StatementType,
    pub error: ValuationError,
}

/// The normalized metric stores for the three statements. A statement that
/// was missing or failed to resolve is represented by an empty series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Financials {
    pub balance_sheet: MetricSeries,
    pub income_statement: MetricSeries,
    pub cash_flow: MetricSeries,
}

impl Financials {
    /// Resolves each provided statement table independently. A failure in one
    /// statement never aborts the others; it is reported as a
    /// [`StatementIssue`] and that statement's series is left empty.
    pub fn resolve(tables: &StatementTables, specs: &StatementSpecs) -> (Self, Vec<StatementIssue>) {
        let mut financials = Self::default();
        let mut issues = Vec::new();

        let statements = [
            (
                StatementType::BalanceSheet,
                &tables.balance_sheet,
                &specs.balance_sheet,
            ),
            (
                StatementType::IncomeStatement,
                &tables.income_statement,
                &specs.income_statement,
            ),
            (StatementType::CashFlow, &tables.cash_flow, &specs.cash_flow),
        ];

        for (statement_type, table, spec) in statements {
            let Some(table) = table else {
                continue;
            };
            match resolve_statement(table, spec) {
                Ok(series) => match statement_type {
                    StatementType::BalanceSheet => financials.balance_sheet = series,
                    StatementType::IncomeStatement => financials.income_statement = series,
                    StatementType::CashFlow => financials.cash_flow = series,
                },
                Err(error) => {
                    warn!("Failed to resolve {:?}: {}", statement_type, error);
                    issues.push(StatementIssue {
                        statement_type,
                        error,
                    });
                }
            }
        }

        (financials, issues)
    }
}

/// Computes the full valuation bundle for one set of resolved financials.
///
/// The only error path is invalid assumptions; individual valuation methods
/// missing their metrics degrade to defaulted zeros inside the result.
pub fn value_company(financials: &Financials, inputs: &ValuationInputs) -> Result<ValuationResult> {
    info!(
        "Running valuation (discount rate {}, growth rate {}, {} forecast years)",
        inputs.dcf.discount_rate, inputs.dcf.growth_rate, inputs.dcf.forecast_years
    );
    run_valuation(financials, inputs)
}

/// Resolves the statement tables and values the company in one call,
/// returning any per-statement resolution issues alongside the result.
pub fn value_from_tables(
    tables: &StatementTables,
    specs: &StatementSpecs,
    inputs: &ValuationInputs,
) -> Result<(ValuationResult, Vec<StatementIssue>)> {
    let (financials, issues) = Financials::resolve(tables, specs);
    let result = value_company(&financials, inputs)?;
    Ok((result, issues))
}
