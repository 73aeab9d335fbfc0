use tracing::warn;

use crate::errors::CoreError;
use crate::models::liquidity::{LiquidityAccount, WithdrawalQuote};
use crate::models::settings::Settings;

/// Default share of the investment base that may be withdrawn.
pub const DEFAULT_LIQUIDITY_RATIO: f64 = 0.10;

/// Default withdrawal fee.
pub const DEFAULT_WITHDRAWAL_FEE_RATE: f64 = 0.04;

/// Liquidity allowance and withdrawal fees.
pub struct LiquidityService {
    liquidity_ratio: f64,
    withdrawal_fee_rate: f64,
}

impl LiquidityService {
    pub fn new() -> Self {
        Self {
            liquidity_ratio: DEFAULT_LIQUIDITY_RATIO,
            withdrawal_fee_rate: DEFAULT_WITHDRAWAL_FEE_RATE,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            liquidity_ratio: settings.liquidity_ratio,
            withdrawal_fee_rate: settings.withdrawal_fee_rate,
        }
    }

    /// Amount available for withdrawal: `base × liquidity_ratio`.
    pub fn liquidity_allowance(&self, total_investment_base: f64) -> f64 {
        total_investment_base * self.liquidity_ratio
    }

    /// Compute fee and net payout without touching any balance.
    ///
    /// Rejects a non-positive amount or a non-finite balance. An amount above
    /// `available_balance` is `InsufficientBalance`.
    pub fn quote_withdrawal(
        &self,
        amount: f64,
        available_balance: f64,
    ) -> Result<WithdrawalQuote, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Withdrawal amount must be positive".into(),
            ));
        }
        if !available_balance.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Available balance must be a finite amount, got {available_balance}"
            )));
        }
        if amount > available_balance {
            warn!(amount, available_balance, "withdrawal rejected: insufficient balance");
            return Err(CoreError::InsufficientBalance {
                amount,
                available: available_balance,
            });
        }

        let fee = amount * self.withdrawal_fee_rate;
        Ok(WithdrawalQuote {
            amount,
            fee,
            net: amount - fee,
        })
    }

    /// Withdraw from an account. On any error the balance is left unchanged.
    pub fn withdraw(
        &self,
        account: &mut LiquidityAccount,
        amount: f64,
    ) -> Result<WithdrawalQuote, CoreError> {
        let quote = self.quote_withdrawal(amount, account.balance)?;
        account.balance -= quote.amount;
        Ok(quote)
    }
}

impl Default for LiquidityService {
    fn default() -> Self {
        Self::new()
    }
}
