use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::{
    constants::*,
    events::PrizePoolAwardStarted,
    state::{PrizePool, PrizeStrategy, RngRequest, SortitionTree},
    yield_source::VaultReader,
};

/// Permissionless once the prize period has ended.
#[derive(Accounts)]
pub struct StartAward<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = vault,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(
        mut,
        has_one = sortition_tree,
        has_one = rng_request
    )]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    pub sortition_tree: AccountLoader<'info, SortitionTree>,

    #[account(mut)]
    pub rng_request: Box<Account<'info, RngRequest>>,

    pub vault: Box<Account<'info, TokenAccount>>,

    pub operator: Signer<'info>,
}

pub fn start_award(ctx: Context<StartAward>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let source = VaultReader {
        vault: &ctx.accounts.vault,
        interest_rate_per_second_mantissa: ctx.accounts.prize_pool.interest_rate_per_second_mantissa,
    };
    let tree = ctx.accounts.sortition_tree.load()?;

    let (snapshot, reserve_captured) = ctx.accounts.prize_strategy.start_award(
        &mut ctx.accounts.prize_pool,
        &source,
        &tree,
        &mut **ctx.accounts.rng_request,
        now,
    )?;

    msg!(
        "Award started: request {}, prize {}, weight {}",
        snapshot.rng_request_id,
        snapshot.prize,
        snapshot.total_weight
    );
    emit!(PrizePoolAwardStarted {
        prize_strategy: ctx.accounts.prize_strategy.key(),
        operator: ctx.accounts.operator.key(),
        rng_request_id: snapshot.rng_request_id,
        prize: snapshot.prize,
        total_weight: snapshot.total_weight,
        reserve_captured,
        timestamp: now,
    });

    Ok(())
}
