use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    events::ReserveWithdrawn,
    state::PrizePool,
    yield_source::TokenVault,
};

#[derive(Accounts)]
pub struct WithdrawReserve<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = recipient.mint == prize_pool.underlying_mint
    )]
    pub recipient: Box<Account<'info, TokenAccount>>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_reserve(ctx: Context<WithdrawReserve>, amount: u64) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let pool_id = ctx.accounts.prize_pool.pool_id;
    let bump = [ctx.accounts.prize_pool.bump];
    let seeds: &[&[u8]] = &[PRIZE_POOL_SEED, pool_id.as_ref(), &bump];
    let signer = &[seeds];

    let mut source = TokenVault {
        vault: &mut ctx.accounts.vault,
        token_program: ctx.accounts.token_program.to_account_info(),
        counterparty: ctx.accounts.recipient.to_account_info(),
        counterparty_authority: ctx.accounts.admin.to_account_info(),
        pool_authority: ctx.accounts.prize_pool.to_account_info(),
        pool_signer_seeds: signer,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    let paid = ctx.accounts.prize_pool.withdraw_reserve(&admin, &mut source, amount)?;

    msg!("Reserve withdrawn: {}", paid);
    emit!(ReserveWithdrawn {
        prize_pool: ctx.accounts.prize_pool.key(),
        recipient: ctx.accounts.recipient.key(),
        amount: paid,
    });
    Ok(())
}
