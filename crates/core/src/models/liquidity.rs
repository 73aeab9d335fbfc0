use serde::{Deserialize, Serialize};

/// Liquid balance a client can withdraw from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityAccount {
    pub balance: f64,
}

impl LiquidityAccount {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }
}

/// Breakdown of a withdrawal: what is requested, what the fee takes, what is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    pub amount: f64,
    pub fee: f64,
    pub net: f64,
}
