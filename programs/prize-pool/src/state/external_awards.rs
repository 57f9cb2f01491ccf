use anchor_lang::prelude::*;

use crate::constants::{MAX_EXTERNAL_ERC20_AWARDS, MAX_EXTERNAL_NFT_AWARDS};
use crate::errors::PrizePoolError;
use crate::state::PrizePool;

/// A single non-fungible award: a supply-one mint inside a collection.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct ExternalNftAward {
    pub collection: Pubkey,
    pub mint: Pubkey,
}

/// Tokens the pool holds on top of interest, handed in full to the next winner.
#[account]
#[derive(Default, InitSpace)]
pub struct ExternalAwardRegistry {
    /// Associated prize strategy
    pub prize_strategy: Pubkey,

    #[max_len(MAX_EXTERNAL_ERC20_AWARDS)]
    pub erc20_awards: Vec<Pubkey>,

    #[max_len(MAX_EXTERNAL_NFT_AWARDS)]
    pub nft_awards: Vec<ExternalNftAward>,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl ExternalAwardRegistry {
    /// Registers a fungible award mint. Re-adding a mint is a no-op.
    pub fn add_erc20(&mut self, pool: &PrizePool, mint: Pubkey) -> Result<()> {
        require!(pool.can_award_external(&mint), PrizePoolError::UnapprovedExternalToken);
        if self.erc20_awards.contains(&mint) {
            return Ok(());
        }
        require!(
            self.erc20_awards.len() < MAX_EXTERNAL_ERC20_AWARDS,
            PrizePoolError::ExternalAwardRegistryFull
        );
        self.erc20_awards.push(mint);
        Ok(())
    }

    /// Registers non-fungible awards. `is_held` reports whether the pool
    /// currently custodies a given mint.
    pub fn add_nfts<F>(
        &mut self,
        pool: &PrizePool,
        collection: Pubkey,
        mints: &[Pubkey],
        is_held: F,
    ) -> Result<()>
    where
        F: Fn(&Pubkey) -> bool,
    {
        require!(pool.can_award_external(&collection), PrizePoolError::UnapprovedExternalToken);
        for mint in mints {
            require!(pool.can_award_external(mint), PrizePoolError::UnapprovedExternalToken);
            require!(is_held(mint), PrizePoolError::TokenNotHeldByPool);

            let award = ExternalNftAward { collection, mint: *mint };
            if self.nft_awards.contains(&award) {
                continue;
            }
            require!(
                self.nft_awards.len() < MAX_EXTERNAL_NFT_AWARDS,
                PrizePoolError::ExternalAwardRegistryFull
            );
            self.nft_awards.push(award);
        }
        Ok(())
    }

    /// Every mint queued for the next winner, fungible awards first.
    pub fn award_mints(&self) -> Vec<Pubkey> {
        self.erc20_awards
            .iter()
            .copied()
            .chain(self.nft_awards.iter().map(|award| award.mint))
            .collect()
    }

    pub fn clear(&mut self) {
        self.erc20_awards.clear();
        self.nft_awards.clear();
    }

    /// Hands every queued award to `winner`, pairing each mint with its
    /// `[pool account, winner account]` from `accounts` in `award_mints` order.
    /// Without a winner the queue is kept for the next draw and `accounts`
    /// is ignored.
    pub fn drain<'a, T>(
        &mut self,
        winner: Option<Pubkey>,
        accounts: &'a [T],
    ) -> Result<Vec<(Pubkey, &'a T, &'a T)>> {
        if winner.is_none() {
            return Ok(Vec::new());
        }

        let mints = self.award_mints();
        require!(
            accounts.len() == mints.len() * 2,
            PrizePoolError::InvalidExternalAwardAccounts
        );
        self.clear();

        Ok(mints
            .into_iter()
            .zip(accounts.chunks_exact(2))
            .map(|(mint, pair)| (mint, &pair[0], &pair[1]))
            .collect())
    }
}
