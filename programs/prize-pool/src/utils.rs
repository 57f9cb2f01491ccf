use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};
use solana_program::program_pack::Pack;
use spl_associated_token_account::get_associated_token_address;
use spl_token::state::Account as SplTokenAccount;

use crate::errors::PrizePoolError;

/// Reads an SPL token account handed in through `remaining_accounts`.
pub fn unpack_token_account(info: &AccountInfo) -> Result<SplTokenAccount> {
    require_keys_eq!(*info.owner, spl_token::id(), PrizePoolError::InvalidExternalAwardAccounts);
    let data = info.try_borrow_data()?;
    SplTokenAccount::unpack(&data).map_err(|_| error!(PrizePoolError::InvalidExternalAwardAccounts))
}

/// Whether `info` is a token account owned by `pool` holding at least one `mint`.
pub fn is_held_by_pool(info: &AccountInfo, pool: &Pubkey, mint: &Pubkey) -> bool {
    unpack_token_account(info)
        .map(|account| account.owner == *pool && account.mint == *mint && account.amount >= 1)
        .unwrap_or(false)
}

/// Sends the pool's whole `mint` balance to the winner's associated token
/// account. Returns the amount moved.
pub fn transfer_external_award<'info>(
    token_program: &AccountInfo<'info>,
    pool_token_account: &AccountInfo<'info>,
    winner_token_account: &AccountInfo<'info>,
    pool_authority: &AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    winner: &Pubkey,
    mint: &Pubkey,
) -> Result<u64> {
    let held = unpack_token_account(pool_token_account)?;
    require!(
        held.owner == pool_authority.key() && held.mint == *mint,
        PrizePoolError::InvalidExternalAwardAccounts
    );
    require_keys_eq!(
        winner_token_account.key(),
        get_associated_token_address(winner, mint),
        PrizePoolError::InvalidExternalAwardAccounts
    );

    if held.amount == 0 {
        return Ok(0);
    }

    token::transfer(
        CpiContext::new_with_signer(
            token_program.clone(),
            Transfer {
                from: pool_token_account.clone(),
                to: winner_token_account.clone(),
                authority: pool_authority.clone(),
            },
            signer_seeds,
        ),
        held.amount,
    )?;
    Ok(held.amount)
}
