use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    events::TimelockSwept,
    state::{Depositor, PrizePool},
    yield_source::TokenVault,
};

/// Anyone may sweep; funds always go to the depositor's own token account.
#[derive(Accounts)]
pub struct SweepTimelock<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(
        mut,
        seeds = [DEPOSITOR_SEED, prize_pool.key().as_ref(), depositor.owner.as_ref()],
        bump = depositor.bump
    )]
    pub depositor: Box<Account<'info, Depositor>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_account.mint == prize_pool.underlying_mint,
        constraint = owner_token_account.owner == depositor.owner
    )]
    pub owner_token_account: Box<Account<'info, TokenAccount>>,

    pub operator: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn sweep_timelock(ctx: Context<SweepTimelock>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let pool_id = ctx.accounts.prize_pool.pool_id;
    let bump = [ctx.accounts.prize_pool.bump];
    let seeds: &[&[u8]] = &[PRIZE_POOL_SEED, pool_id.as_ref(), &bump];
    let signer = &[seeds];

    let mut source = TokenVault {
        vault: &mut ctx.accounts.vault,
        token_program: ctx.accounts.token_program.to_account_info(),
        counterparty: ctx.accounts.owner_token_account.to_account_info(),
        counterparty_authority: ctx.accounts.operator.to_account_info(),
        pool_authority: ctx.accounts.prize_pool.to_account_info(),
        pool_signer_seeds: signer,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    let amount = ctx
        .accounts
        .prize_pool
        .sweep_timelock(&mut source, &mut ctx.accounts.depositor, now)?;

    emit!(TimelockSwept {
        prize_pool: ctx.accounts.prize_pool.key(),
        owner: ctx.accounts.depositor.owner,
        amount,
    });

    Ok(())
}
