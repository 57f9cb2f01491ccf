use anchor_lang::prelude::*;

use crate::errors::PrizePoolError;
use crate::state::RngRequest;

/// Two-phase randomness source: a draw opens a request, and a later call
/// polls for the result.
pub trait RngService {
    /// Opens a request and returns its id.
    fn request_random_number(&mut self, now: i64) -> Result<u32>;

    fn is_request_complete(&self, request_id: u32) -> bool;

    fn random_number(&self, request_id: u32) -> Result<u128>;
}

impl RngService for RngRequest {
    fn request_random_number(&mut self, now: i64) -> Result<u32> {
        let request_id = self.open(now);
        msg!("Randomness requested: id {}", request_id);
        Ok(request_id)
    }

    fn is_request_complete(&self, request_id: u32) -> bool {
        self.is_fulfilled(request_id)
    }

    fn random_number(&self, request_id: u32) -> Result<u128> {
        require!(self.is_fulfilled(request_id), PrizePoolError::DrawNotComplete);
        Ok(self.random_value())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Oracle whose answer the test decides.
    #[derive(Debug, Default)]
    pub struct MockRng {
        pub last_request_id: u32,
        pub complete: bool,
        pub random: u128,
    }

    impl MockRng {
        pub fn answer(&mut self, random: u128) {
            self.random = random;
            self.complete = true;
        }
    }

    impl RngService for MockRng {
        fn request_random_number(&mut self, _now: i64) -> Result<u32> {
            self.last_request_id += 1;
            self.complete = false;
            Ok(self.last_request_id)
        }

        fn is_request_complete(&self, request_id: u32) -> bool {
            self.complete && request_id == self.last_request_id
        }

        fn random_number(&self, request_id: u32) -> Result<u128> {
            require!(self.is_request_complete(request_id), PrizePoolError::DrawNotComplete);
            Ok(self.random)
        }
    }
}
