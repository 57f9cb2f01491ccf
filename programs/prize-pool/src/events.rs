use anchor_lang::prelude::*;

use crate::state::ControlledToken;

#[event]
pub struct PrizePoolInitialized {
    pub prize_pool: Pubkey,
    pub admin: Pubkey,
    pub underlying_mint: Pubkey,
    pub vault: Pubkey,
    pub max_exit_fee_mantissa: u128,
    pub max_timelock_duration: i64,
    pub reserve_rate_mantissa: u128,
    pub timestamp: i64,
}

#[event]
pub struct PrizeStrategyInitialized {
    pub prize_pool: Pubkey,
    pub prize_strategy: Pubkey,
    pub prize_period_seconds: i64,
    pub prize_period_started_at: i64,
    pub rng_oracle: Pubkey,
    pub credit_rate_mantissa: u128,
    pub exit_fee_mantissa: u128,
    pub min_ticket_balance: u64,
    pub external_erc20_awards: Vec<Pubkey>,
}

#[event]
pub struct CreditRateUpdated {
    pub prize_strategy: Pubkey,
    pub old_credit_rate_mantissa: u128,
    pub new_credit_rate_mantissa: u128,
}

#[event]
pub struct ExitFeeUpdated {
    pub prize_strategy: Pubkey,
    pub old_exit_fee_mantissa: u128,
    pub new_exit_fee_mantissa: u128,
}

#[event]
pub struct RngOracleUpdated {
    pub prize_strategy: Pubkey,
    pub old_rng_oracle: Pubkey,
    pub new_rng_oracle: Pubkey,
}

#[event]
pub struct ReserveRateUpdated {
    pub prize_pool: Pubkey,
    pub old_reserve_rate_mantissa: u128,
    pub new_reserve_rate_mantissa: u128,
}

#[event]
pub struct ReserveWithdrawn {
    pub prize_pool: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
pub struct Deposited {
    pub prize_pool: Pubkey,
    pub operator: Pubkey,
    pub to: Pubkey,
    pub token: ControlledToken,
    pub amount: u64,
}

#[event]
pub struct InstantWithdrawal {
    pub prize_pool: Pubkey,
    pub from: Pubkey,
    pub token: ControlledToken,
    pub amount: u64,
    pub exit_fee: u64,
    pub burned_credit: u64,
}

#[event]
pub struct TimelockedWithdrawal {
    pub prize_pool: Pubkey,
    pub from: Pubkey,
    pub token: ControlledToken,
    pub amount: u64,
    pub unlock_timestamp: i64,
    pub burned_credit: u64,
}

#[event]
pub struct TimelockSwept {
    pub prize_pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ControlledTokenTransferred {
    pub prize_pool: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub token: ControlledToken,
    pub amount: u64,
}

#[event]
pub struct PrizePoolAwardStarted {
    pub prize_strategy: Pubkey,
    pub operator: Pubkey,
    pub rng_request_id: u32,
    pub prize: u64,
    pub total_weight: u64,
    pub reserve_captured: u64,
    pub timestamp: i64,
}

#[event]
pub struct PrizePoolAwarded {
    pub prize_strategy: Pubkey,
    pub operator: Pubkey,
    pub winner: Option<Pubkey>,
    pub amount: u64,
    pub random_number: u128,
    pub next_prize_period_started_at: i64,
}

#[event]
pub struct ExternalAwardAdded {
    pub prize_strategy: Pubkey,
    pub token: Pubkey,
    pub token_ids: Vec<Pubkey>,
}

#[event]
pub struct ExternalAwardTransferred {
    pub prize_strategy: Pubkey,
    pub winner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RandomnessFulfilled {
    pub prize_strategy: Pubkey,
    pub rng_request_id: u32,
    pub fulfilled_at: i64,
}
