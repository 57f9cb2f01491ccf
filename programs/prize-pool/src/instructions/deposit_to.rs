use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    events::Deposited,
    state::{ControlledToken, Depositor, PrizePool, PrizeStrategy, SortitionTree},
    yield_source::TokenVault,
};

#[derive(Accounts)]
#[instruction(to: Pubkey)]
pub struct DepositTo<'info> {
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

    /// Balances of `to`, created on first deposit
    #[account(
        init_if_needed,
        payer = operator,
        space = 8 + Depositor::INIT_SPACE,
        seeds = [DEPOSITOR_SEED, prize_pool.key().as_ref(), to.as_ref()],
        bump
    )]
    pub depositor: Box<Account<'info, Depositor>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Funds the deposit
    #[account(
        mut,
        constraint = operator_token_account.mint == prize_pool.underlying_mint,
        constraint = operator_token_account.owner == operator.key()
    )]
    pub operator_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn deposit_to(ctx: Context<DepositTo>, to: Pubkey, token: ControlledToken, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let depositor = &mut ctx.accounts.depositor;
    if depositor.owner == Pubkey::default() {
        depositor.prize_pool = ctx.accounts.prize_pool.key();
        depositor.owner = to;
        depositor.bump = ctx.bumps.depositor;
    }

    let pool_id = ctx.accounts.prize_pool.pool_id;
    let bump = [ctx.accounts.prize_pool.bump];
    let seeds: &[&[u8]] = &[PRIZE_POOL_SEED, pool_id.as_ref(), &bump];
    let signer = &[seeds];

    let mut source = TokenVault {
        vault: &mut ctx.accounts.vault,
        token_program: ctx.accounts.token_program.to_account_info(),
        counterparty: ctx.accounts.operator_token_account.to_account_info(),
        counterparty_authority: ctx.accounts.operator.to_account_info(),
        pool_authority: ctx.accounts.prize_pool.to_account_info(),
        pool_signer_seeds: signer,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    let mut tree = ctx.accounts.sortition_tree.load_mut()?;

    ctx.accounts.prize_strategy.deposit_to(
        &mut ctx.accounts.prize_pool,
        &mut source,
        &mut tree,
        &mut ctx.accounts.depositor,
        token,
        amount,
        now,
    )?;

    emit!(Deposited {
        prize_pool: ctx.accounts.prize_pool.key(),
        operator: ctx.accounts.operator.key(),
        to,
        token,
        amount,
    });

    Ok(())
}
