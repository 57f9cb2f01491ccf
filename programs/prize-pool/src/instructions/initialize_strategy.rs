use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::PrizePoolError,
    events::PrizeStrategyInitialized,
    state::{ExternalAwardRegistry, PrizePool, PrizeStrategy, RngRequest, SortitionTree},
};

#[derive(Accounts)]
pub struct InitializeStrategy<'info> {
    #[account(
        mut,
        seeds = [PRIZE_POOL_SEED, prize_pool.pool_id.as_ref()],
        bump = prize_pool.bump,
        constraint = prize_pool.prize_strategy == Pubkey::default() @ PrizePoolError::Unauthorized
    )]
    pub prize_pool: Box<Account<'info, PrizePool>>,

    #[account(
        init,
        payer = admin,
        space = 8 + PrizeStrategy::INIT_SPACE,
        seeds = [PRIZE_STRATEGY_SEED, prize_pool.key().as_ref()],
        bump
    )]
    pub prize_strategy: Box<Account<'info, PrizeStrategy>>,

    /// Allocated by the client at `SortitionTree::LEN` bytes, owned by this program
    #[account(zero)]
    pub sortition_tree: AccountLoader<'info, SortitionTree>,

    #[account(
        init,
        payer = admin,
        space = 8 + RngRequest::INIT_SPACE,
        seeds = [RNG_REQUEST_SEED, prize_strategy.key().as_ref()],
        bump
    )]
    pub rng_request: Box<Account<'info, RngRequest>>,

    #[account(
        init,
        payer = admin,
        space = 8 + ExternalAwardRegistry::INIT_SPACE,
        seeds = [EXTERNAL_AWARDS_SEED, prize_strategy.key().as_ref()],
        bump
    )]
    pub external_awards: Box<Account<'info, ExternalAwardRegistry>>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_strategy(
    ctx: Context<InitializeStrategy>,
    prize_period_seconds: i64,
    rng_oracle: Pubkey,
    credit_rate_mantissa: u128,
    exit_fee_mantissa: u128,
    min_ticket_balance: u64,
    external_erc20_awards: Vec<Pubkey>,
) -> Result<()> {
    ctx.accounts.prize_pool.require_admin(&ctx.accounts.admin.key())?;
    require!(prize_period_seconds > 0, PrizePoolError::InvalidPrizePeriod);
    require!(credit_rate_mantissa <= MAX_FRACTION_MANTISSA, PrizePoolError::InvalidRate);
    ctx.accounts.prize_pool.check_exit_fee(exit_fee_mantissa)?;

    let now = Clock::get()?.unix_timestamp;
    let prize_pool_key = ctx.accounts.prize_pool.key();
    let prize_strategy_key = ctx.accounts.prize_strategy.key();

    let mut tree = ctx.accounts.sortition_tree.load_init()?;
    tree.prize_strategy = prize_strategy_key;
    drop(tree);

    let rng_request = &mut ctx.accounts.rng_request;
    rng_request.prize_strategy = prize_strategy_key;
    rng_request.bump = ctx.bumps.rng_request;

    let external_awards = &mut ctx.accounts.external_awards;
    external_awards.prize_strategy = prize_strategy_key;
    external_awards.bump = ctx.bumps.external_awards;
    for mint in external_erc20_awards.iter() {
        external_awards.add_erc20(&ctx.accounts.prize_pool, *mint)?;
    }

    let prize_strategy = &mut ctx.accounts.prize_strategy;
    prize_strategy.prize_pool = prize_pool_key;
    prize_strategy.admin = ctx.accounts.admin.key();
    prize_strategy.sortition_tree = ctx.accounts.sortition_tree.key();
    prize_strategy.rng_request = rng_request.key();
    prize_strategy.external_awards = external_awards.key();
    prize_strategy.rng_oracle = rng_oracle;
    prize_strategy.prize_period_seconds = prize_period_seconds;
    prize_strategy.prize_period_started_at = now;
    prize_strategy.credit_rate_mantissa = credit_rate_mantissa;
    prize_strategy.exit_fee_mantissa = exit_fee_mantissa;
    prize_strategy.min_ticket_balance = min_ticket_balance;
    prize_strategy.pending_award = None;
    prize_strategy.bump = ctx.bumps.prize_strategy;

    ctx.accounts.prize_pool.prize_strategy = prize_strategy_key;

    msg!("Prize strategy initialized: period {}s", prize_period_seconds);

    emit!(PrizeStrategyInitialized {
        prize_pool: prize_pool_key,
        prize_strategy: prize_strategy_key,
        prize_period_seconds,
        prize_period_started_at: now,
        rng_oracle,
        credit_rate_mantissa,
        exit_fee_mantissa,
        min_ticket_balance,
        external_erc20_awards,
    });

    Ok(())
}
