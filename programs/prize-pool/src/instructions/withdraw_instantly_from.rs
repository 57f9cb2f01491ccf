use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    errors::PrizePoolError,
    events::InstantWithdrawal,
    state::{ControlledToken, Depositor, PrizePool, PrizeStrategy, SortitionTree},
    yield_source::TokenVault,
};

#[derive(Accounts)]
pub struct WithdrawInstantlyFrom<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(has_one = sortition_tree)]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    #[account(mut)]
    pub sortition_tree: AccountLoader<'info, SortitionTree>,

    #[account(
        mut,
        seeds = [DEPOSITOR_SEED, prize_pool.key().as_ref(), owner.key().as_ref()],
        bump = depositor.bump,
        constraint = depositor.owner == owner.key() @ PrizePoolError::Unauthorized
    )]
    pub depositor: Box<Account<'info, Depositor>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_account.mint == prize_pool.underlying_mint
    )]
    pub owner_token_account: Box<Account<'info, TokenAccount>>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_instantly_from(
    ctx: Context<WithdrawInstantlyFrom>,
    amount: u64,
    token: ControlledToken,
    maximum_exit_fee: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let pool_id = ctx.accounts.prize_pool.pool_id;
    let bump = [ctx.accounts.prize_pool.bump];
    let seeds: &[&[u8]] = &[PRIZE_POOL_SEED, pool_id.as_ref(), &bump];
    let signer = &[seeds];

    let mut source = TokenVault {
        vault: &mut ctx.accounts.vault,
        token_program: ctx.accounts.token_program.to_account_info(),
        counterparty: ctx.accounts.owner_token_account.to_account_info(),
        counterparty_authority: ctx.accounts.owner.to_account_info(),
        pool_authority: ctx.accounts.prize_pool.to_account_info(),
        pool_signer_seeds: signer,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    let mut tree = ctx.accounts.sortition_tree.load_mut()?;

    let receipt = ctx.accounts.prize_strategy.withdraw_instantly_from(
        &mut ctx.accounts.prize_pool,
        &mut source,
        &mut tree,
        &mut ctx.accounts.depositor,
        token,
        amount,
        maximum_exit_fee,
        now,
    )?;

    msg!("Instant withdrawal: paid {}, fee {}", receipt.paid, receipt.exit_fee);
    emit!(InstantWithdrawal {
        prize_pool: ctx.accounts.prize_pool.key(),
        from: ctx.accounts.owner.key(),
        token,
        amount,
        exit_fee: receipt.exit_fee,
        burned_credit: receipt.burned_credit,
    });

    Ok(())
}
