use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::PrizePoolError,
    events::ControlledTokenTransferred,
    state::{ControlledToken, Depositor, PrizePool, PrizeStrategy, SortitionTree},
};

#[derive(Accounts)]
#[instruction(to: Pubkey)]
pub struct TransferControlledTokens<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
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
        bump = from.bump,
        constraint = from.owner == owner.key() @ PrizePoolError::Unauthorized,
        constraint = to != owner.key() @ PrizePoolError::InvalidRecipient
    )]
    pub from: Box<Account<'info, Depositor>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Depositor::INIT_SPACE,
        seeds = [DEPOSITOR_SEED, prize_pool.key().as_ref(), to.as_ref()],
        bump
    )]
    pub recipient: Box<Account<'info, Depositor>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn transfer_controlled_tokens(
    ctx: Context<TransferControlledTokens>,
    to: Pubkey,
    token: ControlledToken,
    amount: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let recipient = &mut ctx.accounts.recipient;
    if recipient.owner == Pubkey::default() {
        recipient.prize_pool = ctx.accounts.prize_pool.key();
        recipient.owner = to;
        recipient.bump = ctx.bumps.recipient;
    }

    let mut tree = ctx.accounts.sortition_tree.load_mut()?;
    ctx.accounts.prize_strategy.transfer(
        &ctx.accounts.prize_pool,
        &mut tree,
        &mut ctx.accounts.from,
        &mut ctx.accounts.recipient,
        token,
        amount,
        now,
    )?;

    emit!(ControlledTokenTransferred {
        prize_pool: ctx.accounts.prize_pool.key(),
        from: ctx.accounts.owner.key(),
        to,
        token,
        amount,
    });

    Ok(())
}
