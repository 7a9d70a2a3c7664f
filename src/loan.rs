use log::{debug, trace};
use std::fmt;

use crate::error::LoanError;

const DAYS_PER_YEAR: f64 = 365.;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepaymentFrequency {
    Weekly,
    Fortnightly,
    Monthly,
}

impl RepaymentFrequency {
    pub const ALL: [RepaymentFrequency; 3] = [
        RepaymentFrequency::Weekly,
        RepaymentFrequency::Fortnightly,
        RepaymentFrequency::Monthly,
    ];

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(RepaymentFrequency::Weekly),
            14 => Some(RepaymentFrequency::Fortnightly),
            30 => Some(RepaymentFrequency::Monthly),
            _ => None,
        }
    }

    pub fn days(self) -> u32 {
        match self {
            RepaymentFrequency::Weekly => 7,
            RepaymentFrequency::Fortnightly => 14,
            RepaymentFrequency::Monthly => 30,
        }
    }
}

impl fmt::Display for RepaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepaymentFrequency::Weekly => "Weekly",
            RepaymentFrequency::Fortnightly => "Fortnightly",
            RepaymentFrequency::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

/// Label for a repayment interval; intervals without a name read as "`n` days".
pub fn frequency_label(days: u32) -> String {
    match RepaymentFrequency::from_days(days) {
        Some(frequency) => frequency.to_string(),
        None => format!("{} days", days),
    }
}

/// Remaining balance at the end of a whole loan year.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalancePoint {
    pub year: u32,
    pub balance: f64,
}

impl fmt::Display for BalancePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year {}, balance ${:.2}",
            self.year,
            round(self.balance, 2)
        )
    }
}

/// Balance by year, ascending.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceSeries {
    points: Vec<BalancePoint>,
}

impl BalanceSeries {
    pub fn points(&self) -> &[BalancePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BalancePoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_balance(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|point| point.balance)
            .fold(None, |max, balance| match max {
                Some(max) if max >= balance => Some(max),
                _ => Some(balance),
            })
    }
}

impl From<Vec<BalancePoint>> for BalanceSeries {
    fn from(points: Vec<BalancePoint>) -> Self {
        Self { points }
    }
}

impl<'a> IntoIterator for &'a BalanceSeries {
    type Item = &'a BalancePoint;
    type IntoIter = std::slice::Iter<'a, BalancePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// A fixed-rate loan with daily compounding, repaid every
/// `repayment_interval_days` days.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    principal: f64,
    term_years: u32,
    annual_rate: f64,
    repayment_interval_days: u32,
}

impl LoanTerms {
    pub fn new(
        principal: f64,               // loan amount
        term_years: u32,              // term of loan in whole years
        annual_rate: f64,             // annual interest rate as percent (i.e., 5.5)
        repayment_interval_days: u32, // 7, 14 or 30
    ) -> Result<Self, LoanError> {
        validate(principal, term_years, annual_rate, repayment_interval_days)?;
        Ok(Self {
            principal,
            term_years,
            annual_rate,
            repayment_interval_days,
        })
    }

    pub fn with_frequency(
        principal: f64,
        term_years: u32,
        annual_rate: f64,
        frequency: RepaymentFrequency,
    ) -> Result<Self, LoanError> {
        Self::new(principal, term_years, annual_rate, frequency.days())
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn repayment_interval_days(&self) -> u32 {
        self.repayment_interval_days
    }

    pub fn frequency(&self) -> Option<RepaymentFrequency> {
        RepaymentFrequency::from_days(self.repayment_interval_days)
    }

    pub fn repayment_amount(&self) -> Result<f64, LoanError> {
        repayment_amount(
            self.principal,
            self.term_years,
            self.annual_rate,
            self.repayment_interval_days,
        )
    }

    pub fn balance_after(&self, elapsed_years: i32) -> Result<f64, LoanError> {
        balance_after(
            self.principal,
            self.term_years,
            self.annual_rate,
            self.repayment_interval_days,
            elapsed_years,
        )
    }

    /// Balances for years `1..=term_years`.
    pub fn balance_series(&self) -> Result<BalanceSeries, LoanError> {
        self.series_from(1)
    }

    /// Balances for years `0..=term_years`, starting at the principal.
    pub fn balance_series_with_start(&self) -> Result<BalanceSeries, LoanError> {
        self.series_from(0)
    }

    pub fn summary(&self) -> Result<String, LoanError> {
        Ok(describe(self, self.repayment_amount()?))
    }

    fn series_from(&self, first_year: u32) -> Result<BalanceSeries, LoanError> {
        self.repayment_amount()?;
        let points = (first_year..=self.term_years)
            .map(|year| {
                let balance =
                    balance_at(self.principal, self.term_years, self.annual_rate, year)?;
                Ok(BalancePoint { year, balance })
            })
            .collect::<Result<Vec<_>, LoanError>>()?;
        debug!(
            "balance series for {} years starting at year {}",
            points.len(),
            first_year
        );
        Ok(BalanceSeries::from(points))
    }
}

/// Formats the loan terms and the repayment due every interval.
pub fn describe(terms: &LoanTerms, repayment: f64) -> String {
    format!(
        "Loan Amount: {:.2} AUD\nLoan Term (Years): {}\nInterest: {:.2}%\n{} Repayments: {:.2} AUD",
        terms.principal,
        terms.term_years,
        terms.annual_rate,
        frequency_label(terms.repayment_interval_days),
        repayment
    )
}

/// Repayment due every `repayment_interval_days` days so that the loan is
/// fully repaid after `term_years` years of daily compounding.
pub fn repayment_amount(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
    repayment_interval_days: u32,
) -> Result<f64, LoanError> {
    validate(principal, term_years, annual_rate, repayment_interval_days)?;

    let factor = daily_factor(annual_rate);
    let term_growth = growth(factor, term_years);
    let interval_growth = factor.powf(repayment_interval_days as f64);

    let pmt_amount = principal * (term_growth / (term_growth - 1.)) * (interval_growth - 1.);
    trace!(
        "daily factor {}, term growth {}, repayment {}",
        factor,
        term_growth,
        pmt_amount
    );

    finite(pmt_amount, "repayment_amount")
}

/// Principal still owed after `elapsed_years` whole years of repayments.
pub fn balance_after(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
    repayment_interval_days: u32,
    elapsed_years: i32,
) -> Result<f64, LoanError> {
    // rejects terms whose repayment is not finite
    repayment_amount(
        principal,
        term_years,
        annual_rate,
        repayment_interval_days,
    )?;

    let elapsed = u32::try_from(elapsed_years)
        .ok()
        .filter(|years| *years <= term_years)
        .ok_or(LoanError::OutOfRange {
            elapsed_years,
            term_years,
        })?;

    balance_at(principal, term_years, annual_rate, elapsed)
}

// `L*g(m) - P*(g(m) - 1)/(f^k - 1)` with the repayment substituted, so the
// two large products never cancel.
fn balance_at(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
    elapsed_years: u32,
) -> Result<f64, LoanError> {
    let factor = daily_factor(annual_rate);
    let term_growth = growth(factor, term_years);
    let elapsed_growth = growth(factor, elapsed_years);

    let balance = principal * ((term_growth - elapsed_growth) / (term_growth - 1.));
    trace!("year {}, balance {}", elapsed_years, balance);

    finite(balance, "balance")
}

fn validate(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
    repayment_interval_days: u32,
) -> Result<(), LoanError> {
    if !(principal.is_finite() && principal > 0.) {
        return Err(LoanError::invalid(
            "principal",
            format!("must be a positive amount, got {}", principal),
        ));
    }
    if term_years == 0 {
        return Err(LoanError::invalid(
            "term_years",
            "must be at least one year",
        ));
    }
    if !(annual_rate.is_finite() && annual_rate > 0.) {
        return Err(LoanError::invalid(
            "annual_rate",
            format!("must be a positive percentage, got {}", annual_rate),
        ));
    }
    if RepaymentFrequency::from_days(repayment_interval_days).is_none() {
        return Err(LoanError::invalid(
            "repayment_interval_days",
            format!("must be 7, 14 or 30, got {}", repayment_interval_days),
        ));
    }
    Ok(())
}

fn finite(value: f64, field: &'static str) -> Result<f64, LoanError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoanError::invalid(
            field,
            format!("is not finite ({}) for these terms", value),
        ))
    }
}

fn daily_factor(annual_rate: f64) -> f64 {
    1. + (annual_rate / 100.) / DAYS_PER_YEAR
}

fn growth(factor: f64, years: u32) -> f64 {
    factor.powf(DAYS_PER_YEAR * years as f64)
}

/// Rounds to `dec` places; never yields negative zero.
pub(crate) fn round(amt: f64, dec: i32) -> f64 {
    let scale = 10_f64.powi(dec);
    let rounded = (amt * scale).round() / scale;
    if rounded == 0. {
        0.
    } else {
        rounded
    }
}
