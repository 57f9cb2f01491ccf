use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::{
    constants::*,
    events::{ExternalAwardTransferred, PrizePoolAwarded},
    state::{Depositor, ExternalAwardRegistry, PrizePool, PrizeStrategy, RngRequest, SortitionTree},
    utils::transfer_external_award,
};

#[derive(Accounts)]
pub struct CompleteAward<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(
        mut,
        has_one = sortition_tree,
        has_one = rng_request,
        has_one = external_awards
    )]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    #[account(mut)]
    pub sortition_tree: AccountLoader<'info, SortitionTree>,

    pub rng_request: Box<Account<'info, RngRequest>>,

    #[account(mut)]
    pub external_awards: Box<Account<'info, ExternalAwardRegistry>>,

    /// Depositor account of the drawn winner; omitted when nobody holds tickets
    #[account(mut, has_one = prize_pool)]
    pub winner: Option<Box<Account<'info, Depositor>>>,

    pub operator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    // Remaining accounts pair up per queued external award, in registry order:
    // [pool_token_account_0, winner_ata_0, pool_token_account_1, winner_ata_1, ...]
}

pub fn complete_award<'info>(ctx: Context<'_, '_, 'info, 'info, CompleteAward<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let mut tree = ctx.accounts.sortition_tree.load_mut()?;
    let winner = ctx.accounts.winner.as_mut().map(|winner| &mut ***winner);
    let outcome = ctx.accounts.prize_strategy.complete_award(
        &mut ctx.accounts.prize_pool,
        &mut tree,
        &**ctx.accounts.rng_request,
        winner,
        now,
    )?;
    drop(tree);

    let prize_strategy = ctx.accounts.prize_strategy.key();
    let payouts = ctx
        .accounts
        .external_awards
        .drain(outcome.winner, ctx.remaining_accounts)?;

    if let Some(winner) = outcome.winner {
        let pool_id = ctx.accounts.prize_pool.pool_id;
        let bump = [ctx.accounts.prize_pool.bump];
        let seeds: &[&[u8]] = &[PRIZE_POOL_SEED, pool_id.as_ref(), &bump];
        let token_program = ctx.accounts.token_program.to_account_info();
        let pool_authority = ctx.accounts.prize_pool.to_account_info();

        for (mint, pool_token_account, winner_token_account) in payouts {
            let amount = transfer_external_award(
                &token_program,
                pool_token_account,
                winner_token_account,
                &pool_authority,
                &[seeds],
                &winner,
                &mint,
            )?;
            emit!(ExternalAwardTransferred {
                prize_strategy,
                winner,
                mint,
                amount,
            });
        }
    }

    msg!(
        "Award completed: prize {}, next period starts {}",
        outcome.prize,
        outcome.next_prize_period_started_at
    );
    emit!(PrizePoolAwarded {
        prize_strategy,
        operator: ctx.accounts.operator.key(),
        winner: outcome.winner,
        amount: outcome.prize,
        random_number: outcome.random_number,
        next_prize_period_started_at: outcome.next_prize_period_started_at,
    });

    Ok(())
}
