use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum StatementType {
    #[schemars(description = "Point-in-time statement of assets, liabilities and equity")]
    BalanceSheet,

    #[schemars(description = "Period statement of revenues, costs and earnings")]
    IncomeStatement,

    #[schemars(description = "Period statement of cash generated and spent")]
    CashFlow,
}

/// One canonical metric and the row labels that may carry it in a source table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetricMapping {
    #[schemars(
        description = "The standardized internal name for this line item (e.g. 'TotalAssets'), decoupled from source wording"
    )]
    pub metric: String,

    #[schemars(
        description = "Accepted row labels, compared case-insensitively against the table's label column. Order is priority order: the first synonym that matches a row wins, so list more specific labels first."
    )]
    pub synonyms: Vec<String>,
}

/// The synonym configuration for one statement type.
///
/// This is static, versionable configuration rather than run-time input. It
/// is passed explicitly into the resolver so tests can substitute alternate
/// specs without process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetricSpec {
    #[schemars(description = "Which statement this spec applies to")]
    pub statement_type: StatementType,

    #[schemars(description = "Canonical metrics to extract, each with its candidate row labels")]
    pub mappings: Vec<MetricMapping>,
}

impl MetricSpec {
    pub fn new(statement_type: StatementType, mappings: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            statement_type,
            mappings: mappings
                .into_iter()
                .map(|(metric, synonyms)| MetricMapping {
                    metric: metric.to_string(),
                    synonyms: synonyms.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MetricSpec)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }

    /// Default balance sheet mappings, covering the metrics consumed by the
    /// ratio and valuation calculators.
    pub fn balance_sheet() -> Self {
        Self::new(
            StatementType::BalanceSheet,
            vec![
                (
                    "CurrentAssets",
                    vec!["Current Assets", "Total Current Assets"],
                ),
                (
                    "CurrentLiabilities",
                    vec!["Current Liabilities", "Total Current Liabilities"],
                ),
                ("Inventory", vec!["Inventories", "Inventory"]),
                ("TotalAssets", vec!["Total Assets"]),
                ("TotalLiabilities", vec!["Total Liabilities"]),
                (
                    "ShareholdersEquity",
                    vec![
                        "Shareholders' Equity",
                        "Total Equity",
                        "Stockholders' Equity",
                    ],
                ),
                ("Cash", vec!["Cash and Cash Equivalents", "Cash"]),
                ("TotalDebt", vec!["Long-term Debt", "Total Debt"]),
            ],
        )
    }

    pub fn income_statement() -> Self {
        Self::new(
            StatementType::IncomeStatement,
            vec![
                ("NetIncome", vec!["Net Income"]),
                ("Revenue", vec!["Revenue", "Net Sales"]),
                ("GrossProfit", vec!["Gross Profit"]),
                ("OperatingIncome", vec!["Operating Income"]),
            ],
        )
    }

    pub fn cash_flow() -> Self {
        Self::new(
            StatementType::CashFlow,
            vec![
                (
                    "OperatingCashFlow",
                    vec![
                        "Cash Flow from Operating Activities",
                        "Operating Cash Flow",
                        "Net Cash from Operating Activities",
                    ],
                ),
                (
                    "CapitalExpenditures",
                    vec![
                        "Capital Expenditures",
                        "CapEx",
                        "Purchases of Property and Equipment",
                    ],
                ),
                ("FreeCashFlow", vec!["Free Cash Flow"]),
            ],
        )
    }
}
