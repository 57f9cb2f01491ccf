use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::math::rate_over_time;

/// Interest-bearing custodian behind a prize pool.
///
/// The pool only ever sees the total it holds; how that total grows is the
/// adapter's business.
pub trait YieldSource {
    /// Underlying held, principal plus accrued interest.
    fn balance(&self) -> u64;

    /// Portion of `balance` that can be redeemed right now.
    fn liquidity(&self) -> u64 {
        self.balance()
    }

    /// Interest `principal` is expected to earn over `seconds`.
    fn estimate_accrued_interest(&self, principal: u64, seconds: u64) -> u64;
}

/// A yield source the pool can move funds in and out of.
pub trait YieldSourceMut: YieldSource {
    fn supply(&mut self, amount: u64) -> Result<()>;

    /// Returns the amount actually released.
    fn redeem(&mut self, amount: u64) -> Result<u64>;
}

/// Read-only view of the pool vault.
pub struct VaultReader<'a, 'info> {
    pub vault: &'a Account<'info, TokenAccount>,
    pub interest_rate_per_second_mantissa: u128,
}

impl<'a, 'info> YieldSource for VaultReader<'a, 'info> {
    fn balance(&self) -> u64 {
        self.vault.amount
    }

    fn estimate_accrued_interest(&self, principal: u64, seconds: u64) -> u64 {
        rate_over_time(principal, self.interest_rate_per_second_mantissa, seconds)
    }
}

/// Yield source backed by the pool's SPL token vault.
///
/// Interest shows up as tokens an external adapter transfers into the vault,
/// so anything held beyond the accounted balance is prize.
pub struct TokenVault<'a, 'info> {
    pub vault: &'a mut Account<'info, TokenAccount>,
    pub token_program: AccountInfo<'info>,
    /// Source of supplies and destination of redemptions
    pub counterparty: AccountInfo<'info>,
    /// Signs supplies out of `counterparty`
    pub counterparty_authority: AccountInfo<'info>,
    /// Prize pool PDA that owns the vault
    pub pool_authority: AccountInfo<'info>,
    pub pool_signer_seeds: &'a [&'a [&'a [u8]]],
    pub interest_rate_per_second_mantissa: u128,
}

impl<'a, 'info> YieldSource for TokenVault<'a, 'info> {
    fn balance(&self) -> u64 {
        self.vault.amount
    }

    fn estimate_accrued_interest(&self, principal: u64, seconds: u64) -> u64 {
        rate_over_time(principal, self.interest_rate_per_second_mantissa, seconds)
    }
}

impl<'a, 'info> YieldSourceMut for TokenVault<'a, 'info> {
    fn supply(&mut self, amount: u64) -> Result<()> {
        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                Transfer {
                    from: self.counterparty.clone(),
                    to: self.vault.to_account_info(),
                    authority: self.counterparty_authority.clone(),
                },
            ),
            amount,
        )?;
        self.vault.reload()
    }

    fn redeem(&mut self, amount: u64) -> Result<u64> {
        let before = self.vault.amount;
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault.to_account_info(),
                    to: self.counterparty.clone(),
                    authority: self.pool_authority.clone(),
                },
                self.pool_signer_seeds,
            ),
            amount,
        )?;
        self.vault.reload()?;
        Ok(before.saturating_sub(self.vault.amount))
    }
}
