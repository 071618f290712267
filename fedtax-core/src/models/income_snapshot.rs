use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::validation::{ValidationError, require_non_negative};

/// Net capital losses offset at most this much ordinary income in a year.
const CAPITAL_LOSS_LIMIT: Decimal = Decimal::from_parts(3000, 0, 0, true, 0);

/// Aggregated income totals feeding gross income and AGI.
///
/// Read-only input to the deduction and AMT functions. All fields are
/// non-negative except the capital gain fields, which may carry losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSnapshot {
    pub wages: Decimal,
    pub taxable_interest: Decimal,
    /// Tracked for reporting; excluded from gross income.
    pub tax_exempt_interest: Decimal,
    /// Total ordinary dividends, inclusive of the qualified portion.
    pub ordinary_dividends: Decimal,
    /// Portion of `ordinary_dividends` taxed at preferential rates.
    pub qualified_dividends: Decimal,
    /// May be negative (net short-term loss).
    pub short_term_capital_gains: Decimal,
    /// May be negative (net long-term loss).
    pub long_term_capital_gains: Decimal,
    pub self_employment_income: Decimal,
    pub retirement_distributions: Decimal,
    pub unemployment_compensation: Decimal,
    pub gambling_winnings: Decimal,
    pub other_income: Decimal,
}

impl IncomeSnapshot {
    /// All-zero snapshot, useful as a starting point.
    pub fn empty() -> Self {
        Self {
            wages: Decimal::ZERO,
            taxable_interest: Decimal::ZERO,
            tax_exempt_interest: Decimal::ZERO,
            ordinary_dividends: Decimal::ZERO,
            qualified_dividends: Decimal::ZERO,
            short_term_capital_gains: Decimal::ZERO,
            long_term_capital_gains: Decimal::ZERO,
            self_employment_income: Decimal::ZERO,
            retirement_distributions: Decimal::ZERO,
            unemployment_compensation: Decimal::ZERO,
            gambling_winnings: Decimal::ZERO,
            other_income: Decimal::ZERO,
        }
    }

    /// Net capital gain included in gross income. Losses are limited to the
    /// annual offset cap.
    pub fn net_capital_gain(&self) -> Decimal {
        let net = self.short_term_capital_gains + self.long_term_capital_gains;
        if net < CAPITAL_LOSS_LIMIT {
            warn!(
                net = %net,
                limit = %CAPITAL_LOSS_LIMIT,
                "net capital loss exceeds the annual offset limit; excess carries forward"
            );
            return CAPITAL_LOSS_LIMIT;
        }
        net
    }

    /// Total income before above-the-line adjustments.
    pub fn gross_income(&self) -> Decimal {
        self.wages
            + self.taxable_interest
            + self.ordinary_dividends
            + self.net_capital_gain()
            + self.self_employment_income
            + self.retirement_distributions
            + self.unemployment_compensation
            + self.gambling_winnings
            + self.other_income
    }

    /// Income taxed at preferential rates: qualified dividends plus net
    /// long-term gain after short-term losses are absorbed.
    pub fn preferential_income(&self) -> Decimal {
        let net_total = self.short_term_capital_gains + self.long_term_capital_gains;
        let preferential_gain = self
            .long_term_capital_gains
            .min(net_total)
            .max(Decimal::ZERO);
        self.qualified_dividends + preferential_gain
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("wages", self.wages)?;
        require_non_negative("taxable_interest", self.taxable_interest)?;
        require_non_negative("tax_exempt_interest", self.tax_exempt_interest)?;
        require_non_negative("ordinary_dividends", self.ordinary_dividends)?;
        require_non_negative("qualified_dividends", self.qualified_dividends)?;
        require_non_negative("self_employment_income", self.self_employment_income)?;
        require_non_negative("retirement_distributions", self.retirement_distributions)?;
        require_non_negative("unemployment_compensation", self.unemployment_compensation)?;
        require_non_negative("gambling_winnings", self.gambling_winnings)?;
        require_non_negative("other_income", self.other_income)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn gross_income_sums_ordinary_sources() {
        let mut income = IncomeSnapshot::empty();
        income.wages = dec!(80000);
        income.taxable_interest = dec!(1200);
        income.ordinary_dividends = dec!(3000);
        income.other_income = dec!(500);

        assert_eq!(income.gross_income(), dec!(84700));
    }

    #[test]
    fn gross_income_excludes_tax_exempt_interest() {
        let mut income = IncomeSnapshot::empty();
        income.wages = dec!(50000);
        income.tax_exempt_interest = dec!(10000);

        assert_eq!(income.gross_income(), dec!(50000));
    }

    #[test]
    fn net_capital_gain_nets_short_and_long() {
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(-2000);
        income.long_term_capital_gains = dec!(5000);

        assert_eq!(income.net_capital_gain(), dec!(3000));
    }

    #[test]
    fn net_capital_loss_is_limited() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .with_test_writer()
                .finish(),
        );
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(-10000);
        income.long_term_capital_gains = dec!(2000);

        assert_eq!(income.net_capital_gain(), dec!(-3000));
    }

    #[test]
    fn preferential_income_is_qualified_dividends_plus_net_long_term_gain() {
        let mut income = IncomeSnapshot::empty();
        income.qualified_dividends = dec!(1500);
        income.long_term_capital_gains = dec!(4000);

        assert_eq!(income.preferential_income(), dec!(5500));
    }

    #[test]
    fn short_term_losses_reduce_preferential_gain() {
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(-1000);
        income.long_term_capital_gains = dec!(4000);

        assert_eq!(income.preferential_income(), dec!(3000));
    }

    #[test]
    fn preferential_gain_never_negative() {
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(-9000);
        income.long_term_capital_gains = dec!(2000);
        income.qualified_dividends = dec!(100);

        assert_eq!(income.preferential_income(), dec!(100));
    }

    #[test]
    fn short_term_gains_are_not_preferential() {
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(5000);
        income.long_term_capital_gains = dec!(2000);

        assert_eq!(income.preferential_income(), dec!(2000));
    }

    #[test]
    fn validate_rejects_negative_wages() {
        let mut income = IncomeSnapshot::empty();
        income.wages = dec!(-1);

        assert!(income.validate().is_err());
    }

    #[test]
    fn validate_allows_capital_losses() {
        let mut income = IncomeSnapshot::empty();
        income.short_term_capital_gains = dec!(-5000);

        assert_eq!(income.validate(), Ok(()));
    }
}
