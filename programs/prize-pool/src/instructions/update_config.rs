use anchor_lang::prelude::*;

use crate::{
    constants::*,
    events::{CreditRateUpdated, ExitFeeUpdated, ReserveRateUpdated, RngOracleUpdated},
    state::{PrizePool, PrizeStrategy},
};

#[derive(Accounts)]
pub struct UpdateStrategyConfig<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(
        mut,
        seeds = [PRIZE_STRATEGY_SEED, prize_pool.key().as_ref()],
        bump = prize_strategy.bump
    )]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdatePoolConfig<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    pub admin: Signer<'info>,
}

pub fn set_credit_rate(ctx: Context<UpdateStrategyConfig>, credit_rate_mantissa: u128) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let prize_strategy = &mut ctx.accounts.prize_strategy;
    let old_credit_rate_mantissa = prize_strategy.set_credit_rate(&admin, credit_rate_mantissa)?;

    msg!("Credit rate updated");
    emit!(CreditRateUpdated {
        prize_strategy: prize_strategy.key(),
        old_credit_rate_mantissa,
        new_credit_rate_mantissa: credit_rate_mantissa,
    });
    Ok(())
}

pub fn set_exit_fee(ctx: Context<UpdateStrategyConfig>, exit_fee_mantissa: u128) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let prize_strategy = &mut ctx.accounts.prize_strategy;
    let old_exit_fee_mantissa =
        prize_strategy.set_exit_fee(&admin, &ctx.accounts.prize_pool, exit_fee_mantissa)?;

    msg!("Exit fee updated");
    emit!(ExitFeeUpdated {
        prize_strategy: prize_strategy.key(),
        old_exit_fee_mantissa,
        new_exit_fee_mantissa: exit_fee_mantissa,
    });
    Ok(())
}

pub fn set_rng_oracle(ctx: Context<UpdateStrategyConfig>, rng_oracle: Pubkey) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let prize_strategy = &mut ctx.accounts.prize_strategy;
    let old_rng_oracle = prize_strategy.set_rng_oracle(&admin, rng_oracle)?;

    msg!("Randomness oracle updated");
    emit!(RngOracleUpdated {
        prize_strategy: prize_strategy.key(),
        old_rng_oracle,
        new_rng_oracle: rng_oracle,
    });
    Ok(())
}

pub fn set_reserve_rate(ctx: Context<UpdatePoolConfig>, reserve_rate_mantissa: u128) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let prize_pool = &mut ctx.accounts.prize_pool;
    let old_reserve_rate_mantissa = prize_pool.set_reserve_rate(&admin, reserve_rate_mantissa)?;

    msg!("Reserve rate updated");
    emit!(ReserveRateUpdated {
        prize_pool: prize_pool.key(),
        old_reserve_rate_mantissa,
        new_reserve_rate_mantissa: reserve_rate_mantissa,
    });
    Ok(())
}
