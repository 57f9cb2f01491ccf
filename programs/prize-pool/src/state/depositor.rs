use anchor_lang::prelude::*;

use crate::errors::PrizePoolError;
use crate::math::{credit_limit, rate_over_time};

/// Balance ledgers the pool controls for each depositor.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlledToken {
    /// Weighted in the draw, subject to exit fees
    Ticket,
    /// Principal that funds the prize without competing for it
    Sponsorship,
}

impl ControlledToken {
    pub fn is_weighted(&self) -> bool {
        matches!(self, ControlledToken::Ticket)
    }
}

/// Anti-gaming credit earned by holding tickets over time.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct CreditAccount {
    pub balance: u64,
    pub last_updated_at: i64,
}

impl CreditAccount {
    /// Credit as of `now` without recording it.
    pub fn accrued(
        &self,
        ticket_balance: u64,
        credit_rate_mantissa: u128,
        exit_fee_mantissa: u128,
        now: i64,
    ) -> Result<u64> {
        let elapsed = now.saturating_sub(self.last_updated_at).max(0) as u64;
        let earned = rate_over_time(ticket_balance, credit_rate_mantissa, elapsed);
        let limit = credit_limit(ticket_balance, exit_fee_mantissa)?;
        Ok(self.balance.saturating_add(earned).min(limit))
    }

    pub fn accrue(
        &mut self,
        ticket_balance: u64,
        credit_rate_mantissa: u128,
        exit_fee_mantissa: u128,
        now: i64,
    ) -> Result<()> {
        self.balance = self.accrued(ticket_balance, credit_rate_mantissa, exit_fee_mantissa, now)?;
        self.last_updated_at = now;
        Ok(())
    }

    pub fn burn(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    /// Re-applies the cap after the ticket balance changed.
    pub fn clamp(&mut self, ticket_balance: u64, exit_fee_mantissa: u128) -> Result<()> {
        self.balance = self.balance.min(credit_limit(ticket_balance, exit_fee_mantissa)?);
        Ok(())
    }
}

/// Principal waiting out a timelocked withdrawal.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct TimelockEntry {
    pub amount: u64,
    pub unlock_timestamp: i64,
}

impl TimelockEntry {
    /// Pending withdrawals coalesce: amounts add up and the later unlock wins.
    pub fn lock(&mut self, amount: u64, unlock_timestamp: i64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        self.unlock_timestamp = self.unlock_timestamp.max(unlock_timestamp);
        Ok(())
    }

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.unlock_timestamp
    }

    pub fn take(&mut self) -> u64 {
        let amount = self.amount;
        *self = TimelockEntry::default();
        amount
    }
}

#[account]
#[derive(Default, InitSpace)]
pub struct Depositor {
    /// Associated prize pool
    pub prize_pool: Pubkey,

    /// Wallet that owns these balances
    pub owner: Pubkey,

    pub ticket_balance: u64,

    pub sponsorship_balance: u64,

    pub credit: CreditAccount,

    pub timelock: TimelockEntry,

    /// Leaf in the sortition tree while the ticket balance is non-zero
    pub sortition_slot: Option<u32>,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Depositor {
    pub fn balance_of(&self, token: ControlledToken) -> u64 {
        match token {
            ControlledToken::Ticket => self.ticket_balance,
            ControlledToken::Sponsorship => self.sponsorship_balance,
        }
    }

    pub fn credit_ledger(&mut self, token: ControlledToken, amount: u64) -> Result<()> {
        let balance = self.ledger_mut(token);
        *balance = balance
            .checked_add(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    pub fn debit_ledger(&mut self, token: ControlledToken, amount: u64) -> Result<()> {
        let balance = self.ledger_mut(token);
        *balance = balance
            .checked_sub(amount)
            .ok_or(PrizePoolError::InsufficientBalance)?;
        Ok(())
    }

    fn ledger_mut(&mut self, token: ControlledToken) -> &mut u64 {
        match token {
            ControlledToken::Ticket => &mut self.ticket_balance,
            ControlledToken::Sponsorship => &mut self.sponsorship_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MANTISSA_SCALE;

    const EXIT_FEE: u128 = MANTISSA_SCALE / 10;
    const CREDIT_RATE: u128 = EXIT_FEE / 1000;

    #[test]
    fn test_credit_accrues_up_to_exit_fee_limit() {
        let mut credit = CreditAccount { balance: 0, last_updated_at: 100 };

        credit.accrue(1_000, CREDIT_RATE, EXIT_FEE, 600).unwrap();
        assert_eq!(credit.balance, 50);
        assert_eq!(credit.last_updated_at, 600);

        // far beyond one period the credit is capped at 10% of the balance
        credit.accrue(1_000, CREDIT_RATE, EXIT_FEE, 100_000).unwrap();
        assert_eq!(credit.balance, 100);
    }

    #[test]
    fn test_credit_view_does_not_mutate() {
        let credit = CreditAccount { balance: 7, last_updated_at: 0 };
        assert_eq!(credit.accrued(1_000, CREDIT_RATE, EXIT_FEE, 500).unwrap(), 57);
        assert_eq!(credit.balance, 7);
    }

    #[test]
    fn test_credit_clamps_after_balance_drop() {
        let mut credit = CreditAccount { balance: 100, last_updated_at: 0 };
        credit.clamp(400, EXIT_FEE).unwrap();
        assert_eq!(credit.balance, 40);
    }

    #[test]
    fn test_timelocks_coalesce() {
        let mut entry = TimelockEntry::default();
        entry.lock(10, 500).unwrap();
        entry.lock(5, 300).unwrap();
        assert_eq!(entry, TimelockEntry { amount: 15, unlock_timestamp: 500 });

        entry.lock(1, 900).unwrap();
        assert_eq!(entry.unlock_timestamp, 900);
        assert!(!entry.is_unlocked(899));
        assert!(entry.is_unlocked(900));
        assert_eq!(entry.take(), 16);
        assert_eq!(entry, TimelockEntry::default());
    }

    #[test]
    fn test_ledger_debit_rejects_overdraw() {
        let mut depositor = Depositor::default();
        depositor.credit_ledger(ControlledToken::Sponsorship, 5).unwrap();
        assert!(depositor.debit_ledger(ControlledToken::Sponsorship, 6).is_err());
        assert!(depositor.debit_ledger(ControlledToken::Ticket, 1).is_err());
        depositor.debit_ledger(ControlledToken::Sponsorship, 5).unwrap();
        assert_eq!(depositor.balance_of(ControlledToken::Sponsorship), 0);
    }
}
