use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, require_non_negative};
use crate::calculations::common::{max, round_half_up};

/// Per-category itemized deduction amounts, as entered.
///
/// The derived methods compute each category's capped deductible amount.
/// Mortgage interest is limited separately by the debt-ceiling worksheet in
/// `calculations::mortgage`, which needs the filing status and year
/// parameters this model does not carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedDeductionSet {
    /// Unreimbursed medical and dental expenses before the AGI floor.
    pub medical_expenses: Decimal,

    /// State and local income taxes paid. Only the greater of income or
    /// general sales taxes enters the SALT total.
    pub state_local_income_taxes: Decimal,

    /// State and local general sales taxes paid.
    pub state_local_sales_taxes: Decimal,

    /// State and local real-estate and personal-property taxes.
    pub property_taxes: Decimal,

    /// Home-acquisition mortgage interest paid.
    pub mortgage_interest: Decimal,

    /// Points paid on home-acquisition debt.
    pub mortgage_points: Decimal,

    /// Average outstanding acquisition-debt principal. Zero means the
    /// principal is unknown and no limitation applies.
    pub mortgage_principal: Decimal,

    /// Debt incurred before the current-law ceiling took effect, entitled to
    /// the grandfathered ceiling.
    pub grandfathered_debt: bool,

    /// Interest on home-equity debt not used to buy, build, or improve the
    /// home. Tracked but never deductible.
    pub home_equity_interest: Decimal,

    pub charitable_cash: Decimal,
    pub charitable_noncash: Decimal,

    /// Casualty and theft losses, entered already limited to federally
    /// declared disasters.
    pub casualty_losses: Decimal,

    /// Deductible only up to gambling winnings.
    pub gambling_losses: Decimal,
}

impl ItemizedDeductionSet {
    /// All-zero set; itemizing with this always loses to the standard
    /// deduction.
    pub fn empty() -> Self {
        Self {
            medical_expenses: Decimal::ZERO,
            state_local_income_taxes: Decimal::ZERO,
            state_local_sales_taxes: Decimal::ZERO,
            property_taxes: Decimal::ZERO,
            mortgage_interest: Decimal::ZERO,
            mortgage_points: Decimal::ZERO,
            mortgage_principal: Decimal::ZERO,
            grandfathered_debt: false,
            home_equity_interest: Decimal::ZERO,
            charitable_cash: Decimal::ZERO,
            charitable_noncash: Decimal::ZERO,
            casualty_losses: Decimal::ZERO,
            gambling_losses: Decimal::ZERO,
        }
    }

    /// Medical expenses above the AGI floor (7.5% under current law).
    pub fn deductible_medical(&self, agi: Decimal, floor_rate: Decimal) -> Decimal {
        let floor = round_half_up(agi * floor_rate);
        max(self.medical_expenses - floor, Decimal::ZERO)
    }

    /// SALT total before the aggregate cap: the greater of income or sales
    /// taxes, plus property taxes.
    pub fn salt_before_cap(&self) -> Decimal {
        max(self.state_local_income_taxes, self.state_local_sales_taxes) + self.property_taxes
    }

    /// SALT after the aggregate cap.
    pub fn deductible_salt(&self, cap: Decimal) -> Decimal {
        self.salt_before_cap().min(cap)
    }

    /// Charitable contributions, cash capped at `cash_limit_rate` of AGI and
    /// non-cash at `noncash_limit_rate` of AGI.
    pub fn deductible_charitable(
        &self,
        agi: Decimal,
        cash_limit_rate: Decimal,
        noncash_limit_rate: Decimal,
    ) -> Decimal {
        let cash = self
            .charitable_cash
            .min(round_half_up(agi * cash_limit_rate));
        let noncash = self
            .charitable_noncash
            .min(round_half_up(agi * noncash_limit_rate));
        max(cash, Decimal::ZERO) + max(noncash, Decimal::ZERO)
    }

    /// Gambling losses capped at winnings.
    pub fn deductible_gambling_losses(&self, winnings: Decimal) -> Decimal {
        self.gambling_losses.min(max(winnings, Decimal::ZERO))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("medical_expenses", self.medical_expenses)?;
        require_non_negative("state_local_income_taxes", self.state_local_income_taxes)?;
        require_non_negative("state_local_sales_taxes", self.state_local_sales_taxes)?;
        require_non_negative("property_taxes", self.property_taxes)?;
        require_non_negative("mortgage_interest", self.mortgage_interest)?;
        require_non_negative("mortgage_points", self.mortgage_points)?;
        require_non_negative("mortgage_principal", self.mortgage_principal)?;
        require_non_negative("home_equity_interest", self.home_equity_interest)?;
        require_non_negative("charitable_cash", self.charitable_cash)?;
        require_non_negative("charitable_noncash", self.charitable_noncash)?;
        require_non_negative("casualty_losses", self.casualty_losses)?;
        require_non_negative("gambling_losses", self.gambling_losses)?;
        Ok(())
    }
}
