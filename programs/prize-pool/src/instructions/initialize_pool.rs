use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::PrizePoolError,
    events::PrizePoolInitialized,
    state::PrizePool,
};

#[derive(Accounts)]
#[instruction(pool_id: [u8; 32])]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + PrizePool::INIT_SPACE,
        seeds = [PRIZE_POOL_SEED, pool_id.as_ref()],
        bump
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    /// Token users deposit and prizes are paid in
    pub underlying_mint: Box<Account<'info, Mint>>,

    /// Pool-owned custody account for principal and interest
    #[account(
        init,
        payer = admin,
        seeds = [VAULT_SEED, prize_pool.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = prize_pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_pool(
    ctx: Context<InitializePool>,
    pool_id: [u8; 32],
    max_exit_fee_mantissa: u128,
    max_timelock_duration: i64,
    reserve_rate_mantissa: u128,
    interest_rate_per_second_mantissa: u128,
) -> Result<()> {
    require!(max_exit_fee_mantissa <= MAX_FRACTION_MANTISSA, PrizePoolError::InvalidRate);
    require!(reserve_rate_mantissa <= MAX_FRACTION_MANTISSA, PrizePoolError::InvalidRate);
    require!(max_timelock_duration >= 0, PrizePoolError::InvalidAmount);

    let prize_pool = &mut ctx.accounts.prize_pool;
    prize_pool.pool_id = pool_id;
    prize_pool.admin = ctx.accounts.admin.key();
    prize_pool.underlying_mint = ctx.accounts.underlying_mint.key();
    prize_pool.vault = ctx.accounts.vault.key();
    prize_pool.prize_strategy = Pubkey::default();
    prize_pool.max_exit_fee_mantissa = max_exit_fee_mantissa;
    prize_pool.max_timelock_duration = max_timelock_duration;
    prize_pool.reserve_rate_mantissa = reserve_rate_mantissa;
    prize_pool.interest_rate_per_second_mantissa = interest_rate_per_second_mantissa;
    prize_pool.bump = ctx.bumps.prize_pool;
    prize_pool.vault_bump = ctx.bumps.vault;

    msg!("Prize pool initialized");

    emit!(PrizePoolInitialized {
        prize_pool: prize_pool.key(),
        admin: prize_pool.admin,
        underlying_mint: prize_pool.underlying_mint,
        vault: prize_pool.vault,
        max_exit_fee_mantissa,
        max_timelock_duration,
        reserve_rate_mantissa,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
