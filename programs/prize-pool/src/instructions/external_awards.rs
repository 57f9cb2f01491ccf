use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::PrizePoolError,
    events::ExternalAwardAdded,
    state::{ExternalAwardRegistry, PrizePool, PrizeStrategy},
    utils::is_held_by_pool,
};

#[derive(Accounts)]
pub struct AddExternalAward<'info> {
    #[account(
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        has_one = prize_strategy
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(has_one = external_awards)]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    #[account(mut)]
    pub external_awards: Box<Account<'info, ExternalAwardRegistry>>,

    pub admin: Signer<'info>,
}

pub fn add_external_erc20_award(ctx: Context<AddExternalAward>, mint: Pubkey) -> Result<()> {
    ctx.accounts.prize_strategy.require_admin(&ctx.accounts.admin.key())?;
    ctx.accounts
        .external_awards
        .add_erc20(&ctx.accounts.prize_pool, mint)?;

    emit!(ExternalAwardAdded {
        prize_strategy: ctx.accounts.prize_strategy.key(),
        token: mint,
        token_ids: Vec::new(),
    });
    Ok(())
}

/// Remaining accounts: the pool-owned token account for each mint, in order.
pub fn add_external_nft_award<'info>(
    ctx: Context<'_, '_, 'info, 'info, AddExternalAward<'info>>,
    collection: Pubkey,
    mints: Vec<Pubkey>,
) -> Result<()> {
    ctx.accounts.prize_strategy.require_admin(&ctx.accounts.admin.key())?;
    require!(
        ctx.remaining_accounts.len() == mints.len(),
        PrizePoolError::InvalidExternalAwardAccounts
    );

    let pool = ctx.accounts.prize_pool.key();
    let holdings = ctx.remaining_accounts;
    let is_held = |mint: &Pubkey| {
        mints
            .iter()
            .position(|candidate| candidate == mint)
            .and_then(|index| holdings.get(index))
            .map_or(false, |info| is_held_by_pool(info, &pool, mint))
    };
    ctx.accounts
        .external_awards
        .add_nfts(&ctx.accounts.prize_pool, collection, &mints, is_held)?;

    emit!(ExternalAwardAdded {
        prize_strategy: ctx.accounts.prize_strategy.key(),
        token: collection,
        token_ids: mints,
    });
    Ok(())
}
