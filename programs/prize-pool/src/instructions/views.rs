use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::{
    constants::*,
    state::{
        ControlledToken, Depositor, PrizePool, PrizeStrategy, RngRequest, SortitionTree, TimelockQuote,
        WithdrawalFee,
    },
    yield_source::{VaultReader, YieldSource},
};

// Read-only instructions meant for simulation; results come back as return data.

#[derive(Accounts)]
pub struct PoolView<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    pub vault: Box<Account<'info, TokenAccount>>,
}

#[derive(Accounts)]
pub struct StrategyView<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(has_one = rng_request)]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    pub rng_request: Box<Account<'info, RngRequest>>,

    pub vault: Box<Account<'info, TokenAccount>>,
}

#[derive(Accounts)]
pub struct DepositorView<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(has_one = sortition_tree)]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    pub sortition_tree: AccountLoader<'info, SortitionTree>,

    #[account(has_one = prize_pool)]
    pub depositor: Box<Account<'info, Depositor>>,
}

impl<'info> PoolView<'info> {
    fn reader(&self) -> VaultReader<'_, 'info> {
        VaultReader {
            vault: &self.vault,
            interest_rate_per_second_mantissa: self.prize_pool.interest_rate_per_second_mantissa,
        }
    }
}

pub fn balance(ctx: Context<PoolView>) -> Result<u64> {
    Ok(ctx.accounts.reader().balance())
}

pub fn award_balance(ctx: Context<PoolView>) -> Result<u64> {
    let vault_balance = ctx.accounts.reader().balance();
    Ok(ctx.accounts.prize_pool.award_balance(vault_balance))
}

pub fn current_prize(ctx: Context<PoolView>) -> Result<u64> {
    let vault_balance = ctx.accounts.reader().balance();
    ctx.accounts.prize_pool.current_prize(vault_balance)
}

pub fn estimate_prize(ctx: Context<StrategyView>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let source = VaultReader {
        vault: &ctx.accounts.vault,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    ctx.accounts
        .prize_strategy
        .estimate_prize(&ctx.accounts.prize_pool, &source, now)
}

pub fn can_start_award(ctx: Context<StrategyView>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.prize_strategy.can_start_award(now))
}

pub fn can_complete_award(ctx: Context<StrategyView>) -> Result<bool> {
    Ok(ctx
        .accounts
        .prize_strategy
        .can_complete_award(&**ctx.accounts.rng_request))
}

pub fn calculate_next_prize_period_start_time(ctx: Context<StrategyView>, current_time: i64) -> Result<i64> {
    Ok(ctx
        .accounts
        .prize_strategy
        .calculate_next_prize_period_start_time(current_time))
}

pub fn estimate_credit_accrual_time(ctx: Context<StrategyView>, balance: u64, interest: u64) -> Result<u64> {
    Ok(ctx
        .accounts
        .prize_strategy
        .estimate_credit_accrual_time(balance, interest))
}

pub fn chance_of(ctx: Context<DepositorView>) -> Result<u64> {
    let tree = ctx.accounts.sortition_tree.load()?;
    Ok(ctx.accounts.prize_strategy.chance_of(&tree, &ctx.accounts.depositor))
}

pub fn balance_of_credit(ctx: Context<DepositorView>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts
        .prize_strategy
        .balance_of_credit(&ctx.accounts.depositor, now)
}

pub fn calculate_instant_withdrawal_fee(
    ctx: Context<DepositorView>,
    amount: u64,
    token: ControlledToken,
) -> Result<WithdrawalFee> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts
        .prize_strategy
        .calculate_instant_withdrawal_fee(&ctx.accounts.depositor, amount, token, now)
}

pub fn calculate_timelock_duration_and_fee(
    ctx: Context<DepositorView>,
    amount: u64,
    token: ControlledToken,
) -> Result<TimelockQuote> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.prize_strategy.calculate_timelock_duration_and_fee(
        &ctx.accounts.depositor,
        amount,
        token,
        ctx.accounts.prize_pool.max_timelock_duration,
        now,
    )
}
