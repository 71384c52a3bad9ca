use crate::error::{Result, ValuationError};
use crate::ratios::{all_ratios, RatioSet};
use crate::Financials;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Assumptions driving the discounted cash flow projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct DcfAssumptions {
    #[schemars(description = "Annual rate used to discount projected cash flows to present value")]
    pub discount_rate: f64,

    #[schemars(description = "Projected annual growth rate of free cash flow")]
    pub growth_rate: f64,

    #[schemars(description = "Number of years to project explicitly before the terminal value")]
    pub forecast_years: u32,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        Self {
            discount_rate: 0.10,
            growth_rate: 0.03,
            forecast_years: 5,
        }
    }
}

impl DcfAssumptions {
    /// The perpetuity-growth terminal value is only defined when the discount
    /// rate exceeds the growth rate; fail fast instead of propagating a
    /// negative or infinite terminal value.
    pub fn validate(&self) -> Result<()> {
        if self.discount_rate <= self.growth_rate {
            return Err(ValuationError::InvalidAssumptions {
                discount_rate: self.discount_rate,
                growth_rate: self.growth_rate,
            });
        }
        if self.forecast_years == 0 {
            return Err(ValuationError::InvalidForecastYears(self.forecast_years));
        }
        Ok(())
    }
}

/// Weights for the composite valuation. Not required to sum to 1; the engine
/// performs no normalization, so a non-unit sum yields a non-convex blend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct ValuationWeights {
    pub dcf: f64,
    pub multiple: f64,
    pub asset: f64,
}

impl Default for ValuationWeights {
    fn default() -> Self {
        Self {
            dcf: 0.5,
            multiple: 0.3,
            asset: 0.2,
        }
    }
}

/// Full parameter set for one valuation run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValuationInputs {
    pub dcf: DcfAssumptions,

    #[schemars(description = "Price-to-earnings multiple applied to latest net income")]
    pub pe_multiple: f64,

    #[schemars(description = "Conservatism discount applied to book value (0.1 = 10% haircut)")]
    pub book_discount: f64,

    pub weights: ValuationWeights,
}

impl Default for ValuationInputs {
    fn default() -> Self {
        Self {
            dcf: DcfAssumptions::default(),
            pe_multiple: 15.0,
            book_discount: 0.1,
            weights: ValuationWeights::default(),
        }
    }
}

/// Outcome of one valuation method.
///
/// `defaulted` records that the method could not run (a required metric was
/// absent) and reported the 0 fallback, so the composite's consumers can see
/// which inputs are real rather than relying on a silent zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MethodValuation {
    pub value: f64,
    pub defaulted: bool,
}

impl MethodValuation {
    fn of(value: f64) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    fn defaulted() -> Self {
        Self {
            value: 0.0,
            defaulted: true,
        }
    }
}

/// Supporting detail behind a DCF figure, kept for audit and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfBreakdown {
    pub assumptions: DcfAssumptions,
    pub base_free_cash_flow: f64,
    pub projected_cash_flows: Vec<f64>,
    pub discounted_cash_flows: Vec<f64>,
    pub terminal_value: f64,
    pub discounted_terminal_value: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
}

/// The complete result bundle for one valuation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub dcf: MethodValuation,
    pub earnings_multiple: MethodValuation,
    pub asset_based: MethodValuation,
    pub weighted: f64,
    pub ratios: RatioSet,
    pub dcf_breakdown: Option<DcfBreakdown>,
}

/// Discounted cash flow valuation with perpetuity-growth terminal value.
///
/// Free cash flow is taken from a directly reported FreeCashFlow row when the
/// source provides one, otherwise derived as OperatingCashFlow minus the
/// magnitude of CapitalExpenditures (CapEx sign conventions vary by source;
/// the magnitude is used either way).
pub fn dcf_valuation(
    financials: &Financials,
    assumptions: &DcfAssumptions,
) -> Result<(MethodValuation, Option<DcfBreakdown>)> {
    assumptions.validate()?;

    let cf = &financials.cash_flow;
    let fcf = match cf.latest("FreeCashFlow") {
        Some(reported) => reported,
        None => match cf.latest("OperatingCashFlow") {
            Some(operating) => operating - cf.latest_or("CapitalExpenditures", 0.0).abs(),
            None => {
                warn!("DCF valuation defaulted to 0: no cash flow metrics available");
                return Ok((MethodValuation::defaulted(), None));
            }
        },
    };

    if fcf == 0.0 {
        debug!("Free cash flow is zero; DCF valuation may not be meaningful");
    }

    let years = assumptions.forecast_years;
    let growth = 1.0 + assumptions.growth_rate;

    let projected: Vec<f64> = (1..=years).map(|year| fcf * growth.powi(year as i32)).collect();

    let last_projected = *projected.last().unwrap_or(&fcf);
    let terminal_value =
        last_projected * growth / (assumptions.discount_rate - assumptions.growth_rate);

    let discount = 1.0 + assumptions.discount_rate;
    let discounted: Vec<f64> = projected
        .iter()
        .enumerate()
        .map(|(i, cash_flow)| cash_flow / discount.powi(i as i32 + 1))
        .collect();
    // The terminal value stands in for the year after the explicit forecast,
    // so it is discounted one period further than the last projection.
    let discounted_terminal_value = terminal_value / discount.powi(years as i32 + 1);

    let enterprise_value = discounted.iter().sum::<f64>() + discounted_terminal_value;

    let cash = financials.balance_sheet.latest_or("Cash", 0.0);
    let total_debt = financials.balance_sheet.latest_or("TotalDebt", 0.0);
    let equity_value = enterprise_value + cash - total_debt;

    let breakdown = DcfBreakdown {
        assumptions: *assumptions,
        base_free_cash_flow: fcf,
        projected_cash_flows: projected,
        discounted_cash_flows: discounted,
        terminal_value,
        discounted_terminal_value,
        enterprise_value,
        equity_value,
    };

    Ok((MethodValuation::of(equity_value), Some(breakdown)))
}

/// Earnings-multiple valuation: latest net income times a P/E multiple.
pub fn multiple_valuation(financials: &Financials, pe_multiple: f64) -> MethodValuation {
    match financials.income_statement.latest("NetIncome") {
        Some(net_income) => MethodValuation::of(net_income * pe_multiple),
        None => {
            warn!("Earnings multiple valuation defaulted to 0: NetIncome absent");
            MethodValuation::defaulted()
        }
    }
}

/// Asset-based valuation: discounted book value.
pub fn asset_based_valuation(financials: &Financials, book_discount: f64) -> MethodValuation {
    let bs = &financials.balance_sheet;
    if bs.latest("TotalAssets").is_none() && bs.latest("TotalLiabilities").is_none() {
        warn!("Asset-based valuation defaulted to 0: no balance sheet totals available");
        return MethodValuation::defaulted();
    }

    let book_value = bs.latest_or("TotalAssets", 0.0) - bs.latest_or("TotalLiabilities", 0.0);
    MethodValuation::of(book_value * (1.0 - book_discount))
}

/// Exact linear combination of the three method values; no weight
/// normalization is applied.
pub fn weighted_valuation(
    dcf: &MethodValuation,
    multiple: &MethodValuation,
    asset: &MethodValuation,
    weights: &ValuationWeights,
) -> f64 {
    dcf.value * weights.dcf + multiple.value * weights.multiple + asset.value * weights.asset
}

/// Runs all valuation methods and the ratio derivation over one set of
/// resolved financials.
///
/// Invalid DCF assumptions abort the run; any single method failing for lack
/// of metrics degrades to a defaulted 0 without affecting its siblings.
pub fn run_valuation(financials: &Financials, inputs: &ValuationInputs) -> Result<ValuationResult> {
    inputs.dcf.validate()?;

    let (dcf, dcf_breakdown) = dcf_valuation(financials, &inputs.dcf)?;
    let earnings_multiple = multiple_valuation(financials, inputs.pe_multiple);
    let asset_based = asset_based_valuation(financials, inputs.book_discount);
    let weighted = weighted_valuation(&dcf, &earnings_multiple, &asset_based, &inputs.weights);

    Ok(ValuationResult {
        dcf,
        earnings_multiple,
        asset_based,
        weighted,
        ratios: all_ratios(financials),
        dcf_breakdown,
    })
}
