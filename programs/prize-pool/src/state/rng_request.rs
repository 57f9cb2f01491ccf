use anchor_lang::prelude::*;

use crate::errors::PrizePoolError;

/// Outstanding randomness request for a prize strategy.
///
/// One account per strategy, reused across draws. The request id increments
/// with every draw so a late fulfilment for an old draw is rejected.
#[account]
#[derive(Default, InitSpace)]
pub struct RngRequest {
    /// Associated prize strategy
    pub prize_strategy: Pubkey,

    /// Id of the latest request, zero before the first draw
    pub request_id: u32,

    pub requested_at: i64,

    pub fulfilled: bool,

    pub fulfilled_at: i64,

    /// Entropy delivered by the oracle
    pub randomness: [u8; 32],

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl RngRequest {
    pub fn open(&mut self, now: i64) -> u32 {
        self.request_id = self.request_id.wrapping_add(1).max(1);
        self.requested_at = now;
        self.fulfilled = false;
        self.fulfilled_at = 0;
        self.randomness = [0u8; 32];
        self.request_id
    }

    pub fn fulfill(&mut self, request_id: u32, randomness: [u8; 32], now: i64) -> Result<()> {
        require!(
            request_id != 0 && request_id == self.request_id && !self.fulfilled,
            PrizePoolError::InvalidRngRequest
        );
        self.randomness = randomness;
        self.fulfilled = true;
        self.fulfilled_at = now;
        Ok(())
    }

    pub fn is_fulfilled(&self, request_id: u32) -> bool {
        self.fulfilled && request_id == self.request_id
    }

    /// Low 16 bytes of the entropy, little-endian.
    pub fn random_value(&self) -> u128 {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.randomness[..16]);
        u128::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_advance_per_draw() {
        let mut request = RngRequest::default();
        assert_eq!(request.open(10), 1);
        request.fulfill(1, [7u8; 32], 20).unwrap();
        assert!(request.is_fulfilled(1));

        assert_eq!(request.open(30), 2);
        assert!(!request.is_fulfilled(1));
        assert!(!request.is_fulfilled(2));
        assert_eq!(request.requested_at, 30);
    }

    #[test]
    fn test_fulfill_rejects_stale_or_repeated_ids() {
        let mut request = RngRequest::default();
        assert!(request.fulfill(0, [1u8; 32], 5).is_err());

        request.open(10);
        request.open(11);
        assert!(request.fulfill(1, [1u8; 32], 12).is_err());
        request.fulfill(2, [1u8; 32], 12).unwrap();
        assert!(request.fulfill(2, [2u8; 32], 13).is_err());
        assert_eq!(request.randomness, [1u8; 32]);
    }

    #[test]
    fn test_random_value_reads_low_bytes() {
        let mut randomness = [0xffu8; 32];
        randomness[..16].copy_from_slice(&42u128.to_le_bytes());
        let request = RngRequest { randomness, ..RngRequest::default() };
        assert_eq!(request.random_value(), 42);
    }
}
