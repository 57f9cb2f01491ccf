use anchor_lang::prelude::*;

use crate::{
    errors::PrizePoolError,
    events::RandomnessFulfilled,
    state::{PrizeStrategy, RngRequest},
};

#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    #[account(
        has_one = rng_request,
        has_one = rng_oracle @ PrizePoolError::Unauthorized
    )]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    #[account(mut)]
    pub rng_request: Box<Account<'info, RngRequest>>,

    pub rng_oracle: Signer<'info>,
}

pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: u32,
    randomness: [u8; 32],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.rng_request.fulfill(request_id, randomness, now)?;

    msg!("Randomness fulfilled: request {}", request_id);
    emit!(RandomnessFulfilled {
        prize_strategy: ctx.accounts.prize_strategy.key(),
        rng_request_id: request_id,
        fulfilled_at: now,
    });

    Ok(())
}
