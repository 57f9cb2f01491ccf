use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod rng;
pub mod state;
pub mod utils;
pub mod yield_source;

use instructions::*;
use state::{ControlledToken, TimelockQuote, WithdrawalFee};

declare_id!("7CLKkrU4M1Bv9Mj2e7Bc7r6bCwcYYc3Je4S3ir1z2N9p");

#[program]
pub mod prize_pool {
    use super::*;

    /// Create a prize pool and its custody vault
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        pool_id: [u8; 32],
        max_exit_fee_mantissa: u128,
        max_timelock_duration: i64,
        reserve_rate_mantissa: u128,
        interest_rate_per_second_mantissa: u128,
    ) -> Result<()> {
        instructions::initialize_pool(
            ctx,
            pool_id,
            max_exit_fee_mantissa,
            max_timelock_duration,
            reserve_rate_mantissa,
            interest_rate_per_second_mantissa,
        )
    }

    /// Attach the draw engine to a pool and start the first prize period
    pub fn initialize_strategy(
        ctx: Context<InitializeStrategy>,
        prize_period_seconds: i64,
        rng_oracle: Pubkey,
        credit_rate_mantissa: u128,
        exit_fee_mantissa: u128,
        min_ticket_balance: u64,
        external_erc20_awards: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::initialize_strategy(
            ctx,
            prize_period_seconds,
            rng_oracle,
            credit_rate_mantissa,
            exit_fee_mantissa,
            min_ticket_balance,
            external_erc20_awards,
        )
    }

    pub fn set_credit_rate(ctx: Context<UpdateStrategyConfig>, credit_rate_mantissa: u128) -> Result<()> {
        instructions::set_credit_rate(ctx, credit_rate_mantissa)
    }

    pub fn set_exit_fee(ctx: Context<UpdateStrategyConfig>, exit_fee_mantissa: u128) -> Result<()> {
        instructions::set_exit_fee(ctx, exit_fee_mantissa)
    }

    pub fn set_rng_oracle(ctx: Context<UpdateStrategyConfig>, rng_oracle: Pubkey) -> Result<()> {
        instructions::set_rng_oracle(ctx, rng_oracle)
    }

    pub fn set_reserve_rate(ctx: Context<UpdatePoolConfig>, reserve_rate_mantissa: u128) -> Result<()> {
        instructions::set_reserve_rate(ctx, reserve_rate_mantissa)
    }

    /// Pay captured reserve out of the vault
    pub fn withdraw_reserve(ctx: Context<WithdrawReserve>, amount: u64) -> Result<()> {
        instructions::withdraw_reserve(ctx, amount)
    }

    /// Deposit on behalf of `to`
    pub fn deposit_to(
        ctx: Context<DepositTo>,
        to: Pubkey,
        token: ControlledToken,
        amount: u64,
    ) -> Result<()> {
        instructions::deposit_to(ctx, to, token, amount)
    }

    /// Withdraw now, paying whatever exit fee credit does not cover
    pub fn withdraw_instantly_from(
        ctx: Context<WithdrawInstantlyFrom>,
        amount: u64,
        token: ControlledToken,
        maximum_exit_fee: u64,
    ) -> Result<()> {
        instructions::withdraw_instantly_from(ctx, amount, token, maximum_exit_fee)
    }

    /// Withdraw fee-free once the timelock expires
    pub fn withdraw_with_timelock_from(
        ctx: Context<WithdrawWithTimelockFrom>,
        amount: u64,
        token: ControlledToken,
    ) -> Result<()> {
        instructions::withdraw_with_timelock_from(ctx, amount, token)
    }

    pub fn sweep_timelock(ctx: Context<SweepTimelock>) -> Result<()> {
        instructions::sweep_timelock(ctx)
    }

    pub fn transfer_controlled_tokens(
        ctx: Context<TransferControlledTokens>,
        to: Pubkey,
        token: ControlledToken,
        amount: u64,
    ) -> Result<()> {
        instructions::transfer_controlled_tokens(ctx, to, token, amount)
    }

    /// Request randomness and freeze the prize (permissionless after period end)
    pub fn start_award(ctx: Context<StartAward>) -> Result<()> {
        instructions::start_award(ctx)
    }

    /// Deliver randomness for the outstanding request (oracle only)
    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: u32,
        randomness: [u8; 32],
    ) -> Result<()> {
        instructions::fulfill_randomness(ctx, request_id, randomness)
    }

    /// Draw the winner, pay the prize and external awards, roll the period
    pub fn complete_award<'info>(ctx: Context<'_, '_, 'info, 'info, CompleteAward<'info>>) -> Result<()> {
        instructions::complete_award(ctx)
    }

    pub fn add_external_erc20_award(ctx: Context<AddExternalAward>, mint: Pubkey) -> Result<()> {
        instructions::add_external_erc20_award(ctx, mint)
    }

    pub fn add_external_nft_award<'info>(
        ctx: Context<'_, '_, 'info, 'info, AddExternalAward<'info>>,
        collection: Pubkey,
        mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::add_external_nft_award(ctx, collection, mints)
    }

    pub fn balance(ctx: Context<PoolView>) -> Result<u64> {
        instructions::balance(ctx)
    }

    pub fn award_balance(ctx: Context<PoolView>) -> Result<u64> {
        instructions::award_balance(ctx)
    }

    pub fn current_prize(ctx: Context<PoolView>) -> Result<u64> {
        instructions::current_prize(ctx)
    }

    pub fn estimate_prize(ctx: Context<StrategyView>) -> Result<u64> {
        instructions::estimate_prize(ctx)
    }

    pub fn can_start_award(ctx: Context<StrategyView>) -> Result<bool> {
        instructions::can_start_award(ctx)
    }

    pub fn can_complete_award(ctx: Context<StrategyView>) -> Result<bool> {
        instructions::can_complete_award(ctx)
    }

    pub fn calculate_next_prize_period_start_time(
        ctx: Context<StrategyView>,
        current_time: i64,
    ) -> Result<i64> {
        instructions::calculate_next_prize_period_start_time(ctx, current_time)
    }

    pub fn estimate_credit_accrual_time(
        ctx: Context<StrategyView>,
        balance: u64,
        interest: u64,
    ) -> Result<u64> {
        instructions::estimate_credit_accrual_time(ctx, balance, interest)
    }

    pub fn chance_of(ctx: Context<DepositorView>) -> Result<u64> {
        instructions::chance_of(ctx)
    }

    pub fn balance_of_credit(ctx: Context<DepositorView>) -> Result<u64> {
        instructions::balance_of_credit(ctx)
    }

    pub fn calculate_instant_withdrawal_fee(
        ctx: Context<DepositorView>,
        amount: u64,
        token: ControlledToken,
    ) -> Result<WithdrawalFee> {
        instructions::calculate_instant_withdrawal_fee(ctx, amount, token)
    }

    pub fn calculate_timelock_duration_and_fee(
        ctx: Context<DepositorView>,
        amount: u64,
        token: ControlledToken,
    ) -> Result<TimelockQuote> {
        instructions::calculate_timelock_duration_and_fee(ctx, amount, token)
    }
}
