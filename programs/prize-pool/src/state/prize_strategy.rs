use anchor_lang::prelude::*;

use crate::constants::MAX_FRACTION_MANTISSA;
use crate::errors::PrizePoolError;
use crate::math::{estimate_credit_accrual_time, mul_mantissa};
use crate::rng::RngService;
use crate::state::{ControlledToken, Depositor, PrizePool, SortitionTree};
use crate::yield_source::{YieldSource, YieldSourceMut};

/// Prize and weight frozen when a draw starts.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct AwardSnapshot {
    pub rng_request_id: u32,
    pub prize: u64,
    pub total_weight: u64,
    pub requested_at: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizePeriodState {
    Idle,
    /// Randomness requested, ticket balances frozen
    Locked,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalFee {
    pub remaining_fee: u64,
    pub burned_credit: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimelockQuote {
    pub duration_seconds: i64,
    pub burned_credit: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstantWithdrawalReceipt {
    pub paid: u64,
    pub exit_fee: u64,
    pub burned_credit: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelockReceipt {
    pub unlock_timestamp: i64,
    pub burned_credit: u64,
    /// Paid out immediately when the timelock had already expired
    pub paid: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AwardOutcome {
    pub winner: Option<Pubkey>,
    pub prize: u64,
    pub random_number: u128,
    pub next_prize_period_started_at: i64,
}

#[account]
#[derive(Default, InitSpace)]
pub struct PrizeStrategy {
    /// Pool whose interest this strategy awards
    pub prize_pool: Pubkey,

    /// Administrator allowed to change draw configuration
    pub admin: Pubkey,

    pub sortition_tree: Pubkey,

    pub rng_request: Pubkey,

    pub external_awards: Pubkey,

    /// Key allowed to fulfil randomness requests
    pub rng_oracle: Pubkey,

    pub prize_period_seconds: i64,

    pub prize_period_started_at: i64,

    /// Credit earned per ticket per second
    pub credit_rate_mantissa: u128,

    pub exit_fee_mantissa: u128,

    /// Smallest nonzero ticket balance that may hold a draw slot
    pub min_ticket_balance: u64,

    /// Present while a draw is in flight
    pub pending_award: Option<AwardSnapshot>,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl PrizeStrategy {
    pub fn state(&self) -> PrizePeriodState {
        if self.pending_award.is_some() {
            PrizePeriodState::Locked
        } else {
            PrizePeriodState::Idle
        }
    }

    pub fn is_rng_requested(&self) -> bool {
        self.state() == PrizePeriodState::Locked
    }

    pub fn require_admin(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.admin, PrizePoolError::Unauthorized);
        Ok(())
    }

    pub fn require_not_locked(&self) -> Result<()> {
        require!(!self.is_rng_requested(), PrizePoolError::RngInFlight);
        Ok(())
    }

    pub fn prize_period_end_at(&self) -> i64 {
        self.prize_period_started_at
            .saturating_add(self.prize_period_seconds)
    }

    pub fn prize_period_remaining_seconds(&self, now: i64) -> i64 {
        self.prize_period_end_at().saturating_sub(now).max(0)
    }

    pub fn can_start_award(&self, now: i64) -> bool {
        now >= self.prize_period_end_at() && !self.is_rng_requested()
    }

    pub fn can_complete_award<R: RngService>(&self, rng: &R) -> bool {
        self.pending_award
            .map_or(false, |pending| rng.is_request_complete(pending.rng_request_id))
    }

    /// Rolls the period start forward by whole periods so that `now` falls
    /// inside the returned period.
    pub fn calculate_next_prize_period_start_time(&self, now: i64) -> i64 {
        let elapsed = now.saturating_sub(self.prize_period_started_at);
        if elapsed < self.prize_period_seconds || self.prize_period_seconds <= 0 {
            return self.prize_period_started_at;
        }
        let periods = elapsed / self.prize_period_seconds;
        self.prize_period_started_at
            .saturating_add(periods.saturating_mul(self.prize_period_seconds))
    }

    pub fn set_credit_rate(&mut self, admin: &Pubkey, credit_rate_mantissa: u128) -> Result<u128> {
        self.require_admin(admin)?;
        self.require_not_locked()?;
        require!(credit_rate_mantissa <= MAX_FRACTION_MANTISSA, PrizePoolError::InvalidRate);
        Ok(std::mem::replace(&mut self.credit_rate_mantissa, credit_rate_mantissa))
    }

    pub fn set_exit_fee(&mut self, admin: &Pubkey, pool: &PrizePool, exit_fee_mantissa: u128) -> Result<u128> {
        self.require_admin(admin)?;
        self.require_not_locked()?;
        pool.check_exit_fee(exit_fee_mantissa)?;
        Ok(std::mem::replace(&mut self.exit_fee_mantissa, exit_fee_mantissa))
    }

    /// An in-flight request stays bound to the oracle it was sent to.
    pub fn set_rng_oracle(&mut self, admin: &Pubkey, rng_oracle: Pubkey) -> Result<Pubkey> {
        self.require_admin(admin)?;
        self.require_not_locked()?;
        Ok(std::mem::replace(&mut self.rng_oracle, rng_oracle))
    }

    pub fn balance_of_credit(&self, depositor: &Depositor, now: i64) -> Result<u64> {
        depositor.credit.accrued(
            depositor.ticket_balance,
            self.credit_rate_mantissa,
            self.exit_fee_mantissa,
            now,
        )
    }

    pub fn chance_of(&self, tree: &SortitionTree, depositor: &Depositor) -> u64 {
        tree.weight_of(depositor.sortition_slot)
    }

    pub fn estimate_credit_accrual_time(&self, balance: u64, interest: u64) -> u64 {
        estimate_credit_accrual_time(balance, interest, self.credit_rate_mantissa)
    }

    pub fn estimate_prize<Y: YieldSource>(&self, pool: &PrizePool, source: &Y, now: i64) -> Result<u64> {
        let remaining = self.prize_period_remaining_seconds(now) as u64;
        pool.estimate_prize(source, remaining)
    }

    pub fn calculate_instant_withdrawal_fee(
        &self,
        depositor: &Depositor,
        amount: u64,
        token: ControlledToken,
        now: i64,
    ) -> Result<WithdrawalFee> {
        if !token.is_weighted() {
            return Ok(WithdrawalFee::default());
        }
        let fee = mul_mantissa(amount, self.exit_fee_mantissa)?;
        let burned_credit = self.balance_of_credit(depositor, now)?.min(fee);
        Ok(WithdrawalFee {
            remaining_fee: fee - burned_credit,
            burned_credit,
        })
    }

    /// Credit covering the whole fee releases funds now; otherwise they wait
    /// for the end of the current period, capped by the pool maximum.
    pub fn calculate_timelock_duration_and_fee(
        &self,
        depositor: &Depositor,
        amount: u64,
        token: ControlledToken,
        max_timelock_duration: i64,
        now: i64,
    ) -> Result<TimelockQuote> {
        if !token.is_weighted() {
            return Ok(TimelockQuote::default());
        }
        let fee = mul_mantissa(amount, self.exit_fee_mantissa)?;
        let credit = self.balance_of_credit(depositor, now)?;
        if credit >= fee {
            return Ok(TimelockQuote {
                duration_seconds: 0,
                burned_credit: fee,
            });
        }
        Ok(TimelockQuote {
            duration_seconds: self
                .prize_period_remaining_seconds(now)
                .min(max_timelock_duration.max(0)),
            burned_credit: 0,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn deposit_to<Y: YieldSourceMut>(
        &self,
        pool: &mut PrizePool,
        source: &mut Y,
        tree: &mut SortitionTree,
        to: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        now: i64,
    ) -> Result<()> {
        if !token.is_weighted() {
            return pool.deposit_to(source, to, token, amount);
        }
        self.require_not_locked()?;
        self.accrue_credit(to, now)?;
        pool.deposit_to(source, to, token, amount)?;
        self.sync_weight(tree, to)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn withdraw_instantly_from<Y: YieldSourceMut>(
        &self,
        pool: &mut PrizePool,
        source: &mut Y,
        tree: &mut SortitionTree,
        from: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        maximum_exit_fee: u64,
        now: i64,
    ) -> Result<InstantWithdrawalReceipt> {
        if !token.is_weighted() {
            let paid = pool.withdraw_instantly_from(source, from, token, amount, 0)?;
            return Ok(InstantWithdrawalReceipt { paid, exit_fee: 0, burned_credit: 0 });
        }
        self.require_not_locked()?;

        let fee = self.calculate_instant_withdrawal_fee(from, amount, token, now)?;
        require!(
            fee.remaining_fee <= maximum_exit_fee,
            PrizePoolError::ExitFeeExceedsLimit
        );

        self.accrue_credit(from, now)?;
        from.credit.burn(fee.burned_credit)?;
        let paid = pool.withdraw_instantly_from(source, from, token, amount, fee.remaining_fee)?;
        self.settle_balance_change(tree, from)?;

        Ok(InstantWithdrawalReceipt {
            paid,
            exit_fee: fee.remaining_fee,
            burned_credit: fee.burned_credit,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn withdraw_with_timelock_from<Y: YieldSourceMut>(
        &self,
        pool: &mut PrizePool,
        source: &mut Y,
        tree: &mut SortitionTree,
        from: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        now: i64,
    ) -> Result<TimelockReceipt> {
        let quote = if token.is_weighted() {
            self.require_not_locked()?;
            let quote = self.calculate_timelock_duration_and_fee(
                from,
                amount,
                token,
                pool.max_timelock_duration,
                now,
            )?;
            self.accrue_credit(from, now)?;
            from.credit.burn(quote.burned_credit)?;
            quote
        } else {
            TimelockQuote::default()
        };

        let unlock_timestamp = now
            .checked_add(quote.duration_seconds)
            .ok_or(PrizePoolError::MathOverflow)?;
        pool.lock_for_timelock(from, token, amount, unlock_timestamp)?;
        if token.is_weighted() {
            self.settle_balance_change(tree, from)?;
        }

        let unlock_timestamp = from.timelock.unlock_timestamp;
        let paid = if from.timelock.is_unlocked(now) {
            pool.sweep_timelock(source, from, now)?
        } else {
            0
        };

        Ok(TimelockReceipt {
            unlock_timestamp,
            burned_credit: quote.burned_credit,
            paid,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn transfer(
        &self,
        pool: &PrizePool,
        tree: &mut SortitionTree,
        from: &mut Depositor,
        to: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        now: i64,
    ) -> Result<()> {
        if !token.is_weighted() {
            return pool.transfer(from, to, token, amount);
        }
        self.require_not_locked()?;
        self.accrue_credit(from, now)?;
        self.accrue_credit(to, now)?;
        pool.transfer(from, to, token, amount)?;
        self.settle_balance_change(tree, from)?;
        self.sync_weight(tree, to)
    }

    /// Opens a randomness request and freezes the prize and ticket weight.
    /// Returns the snapshot and the reserve set aside.
    pub fn start_award<Y: YieldSource, R: RngService>(
        &mut self,
        pool: &mut PrizePool,
        source: &Y,
        tree: &SortitionTree,
        rng: &mut R,
        now: i64,
    ) -> Result<(AwardSnapshot, u64)> {
        require!(self.can_start_award(now), PrizePoolError::DrawNotReady);

        let rng_request_id = rng.request_random_number(now)?;
        let (prize, reserve) = pool.capture_award_balance(source.balance())?;
        let snapshot = AwardSnapshot {
            rng_request_id,
            prize,
            total_weight: tree.total(),
            requested_at: now,
        };
        self.pending_award = Some(snapshot);
        Ok((snapshot, reserve))
    }

    /// Draws a winner with the fulfilled randomness, pays the frozen prize and
    /// rolls the period forward. A draw over zero weight pays no one and the
    /// prize stays in the pool for the next period.
    pub fn complete_award<R: RngService>(
        &mut self,
        pool: &mut PrizePool,
        tree: &mut SortitionTree,
        rng: &R,
        winner: Option<&mut Depositor>,
        now: i64,
    ) -> Result<AwardOutcome> {
        let snapshot = self.pending_award.ok_or(PrizePoolError::DrawNotComplete)?;
        require!(self.can_complete_award(rng), PrizePoolError::DrawNotComplete);

        let random_number = rng.random_number(snapshot.rng_request_id)?;
        let drawn = if snapshot.total_weight == 0 {
            None
        } else {
            tree.draw((random_number % snapshot.total_weight as u128) as u64)
        };

        if let Some(drawn) = drawn {
            let winner = winner.ok_or(PrizePoolError::WinnerAccountMismatch)?;
            require_keys_eq!(winner.owner, drawn, PrizePoolError::WinnerAccountMismatch);
            self.pay_winner(pool, tree, winner, snapshot.prize, now)?;
        } else {
            pool.roll_over_prize(snapshot.prize);
        }

        let next_prize_period_started_at = self.calculate_next_prize_period_start_time(now);
        self.prize_period_started_at = next_prize_period_started_at;
        self.pending_award = None;

        Ok(AwardOutcome {
            winner: drawn,
            prize: if drawn.is_some() { snapshot.prize } else { 0 },
            random_number,
            next_prize_period_started_at,
        })
    }

    /// Winnings carry their own exit-fee credit so they can leave fee-free.
    fn pay_winner(
        &self,
        pool: &mut PrizePool,
        tree: &mut SortitionTree,
        winner: &mut Depositor,
        prize: u64,
        now: i64,
    ) -> Result<()> {
        self.accrue_credit(winner, now)?;
        pool.award(winner, ControlledToken::Ticket, prize)?;

        let bonus = mul_mantissa(prize, self.exit_fee_mantissa)?;
        winner.credit.balance = winner
            .credit
            .balance
            .checked_add(bonus)
            .ok_or(PrizePoolError::MathOverflow)?;
        winner.credit.clamp(winner.ticket_balance, self.exit_fee_mantissa)?;
        self.sync_weight(tree, winner)
    }

    fn accrue_credit(&self, depositor: &mut Depositor, now: i64) -> Result<()> {
        depositor.credit.accrue(
            depositor.ticket_balance,
            self.credit_rate_mantissa,
            self.exit_fee_mantissa,
            now,
        )
    }

    fn settle_balance_change(&self, tree: &mut SortitionTree, depositor: &mut Depositor) -> Result<()> {
        depositor
            .credit
            .clamp(depositor.ticket_balance, self.exit_fee_mantissa)?;
        self.sync_weight(tree, depositor)
    }

    /// A holder keeps either no tickets or at least `min_ticket_balance`.
    fn sync_weight(&self, tree: &mut SortitionTree, depositor: &mut Depositor) -> Result<()> {
        require!(
            depositor.ticket_balance == 0 || depositor.ticket_balance >= self.min_ticket_balance,
            PrizePoolError::TicketBalanceBelowMinimum
        );
        depositor.sortition_slot =
            tree.set(depositor.sortition_slot, depositor.owner, depositor.ticket_balance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MANTISSA_SCALE, SORTITION_CAPACITY};
    use crate::errors::assert_error;
    use crate::rng::mock::MockRng;
    use crate::yield_source::mock::MockYieldSource;
    use bytemuck::Zeroable;

    const ONE: u64 = 1_000_000_000;
    const START: i64 = 1_600_000_000;
    const PERIOD: i64 = 1_000;
    const EXIT_FEE: u128 = MANTISSA_SCALE / 10;
    const CREDIT_RATE: u128 = EXIT_FEE / PERIOD as u128;

    struct Fixture {
        pool: PrizePool,
        source: MockYieldSource,
        tree: Box<SortitionTree>,
        rng: MockRng,
        strategy: PrizeStrategy,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                pool: PrizePool {
                    underlying_mint: Pubkey::new_unique(),
                    max_exit_fee_mantissa: MANTISSA_SCALE / 2,
                    max_timelock_duration: 10_000,
                    ..PrizePool::default()
                },
                source: MockYieldSource::default(),
                tree: Box::new(SortitionTree::zeroed()),
                rng: MockRng::default(),
                strategy: PrizeStrategy {
                    admin: Pubkey::new_unique(),
                    prize_period_seconds: PERIOD,
                    prize_period_started_at: START,
                    credit_rate_mantissa: CREDIT_RATE,
                    exit_fee_mantissa: EXIT_FEE,
                    ..PrizeStrategy::default()
                },
            }
        }

        fn deposit(&mut self, to: &mut Depositor, token: ControlledToken, amount: u64, now: i64) -> Result<()> {
            self.strategy
                .deposit_to(&mut self.pool, &mut self.source, &mut self.tree, to, token, amount, now)
        }

        fn withdraw_instantly(
            &mut self,
            from: &mut Depositor,
            token: ControlledToken,
            amount: u64,
            maximum_exit_fee: u64,
            now: i64,
        ) -> Result<InstantWithdrawalReceipt> {
            self.strategy.withdraw_instantly_from(
                &mut self.pool,
                &mut self.source,
                &mut self.tree,
                from,
                token,
                amount,
                maximum_exit_fee,
                now,
            )
        }

        fn withdraw_with_timelock(
            &mut self,
            from: &mut Depositor,
            token: ControlledToken,
            amount: u64,
            now: i64,
        ) -> Result<TimelockReceipt> {
            self.strategy.withdraw_with_timelock_from(
                &mut self.pool,
                &mut self.source,
                &mut self.tree,
                from,
                token,
                amount,
                now,
            )
        }

        fn transfer(
            &mut self,
            from: &mut Depositor,
            to: &mut Depositor,
            token: ControlledToken,
            amount: u64,
            now: i64,
        ) -> Result<()> {
            self.strategy
                .transfer(&self.pool, &mut self.tree, from, to, token, amount, now)
        }

        fn start_award(&mut self, now: i64) -> Result<(AwardSnapshot, u64)> {
            self.strategy
                .start_award(&mut self.pool, &self.source, &self.tree, &mut self.rng, now)
        }

        fn complete_award(&mut self, winner: Option<&mut Depositor>, now: i64) -> Result<AwardOutcome> {
            self.strategy
                .complete_award(&mut self.pool, &mut self.tree, &self.rng, winner, now)
        }
    }

    fn depositor() -> Depositor {
        Depositor {
            owner: Pubkey::new_unique(),
            ..Depositor::default()
        }
    }

    #[test]
    fn test_deposits_track_ticket_weight_only() {
        let mut f = Fixture::new();
        let mut alice = depositor();

        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, START).unwrap();
        f.deposit(&mut alice, ControlledToken::Sponsorship, 5 * ONE, START).unwrap();

        assert_eq!(f.tree.total(), 10 * ONE);
        assert_eq!(f.strategy.chance_of(&f.tree, &alice), 10 * ONE);
        assert_eq!(f.pool.accounted_balance, 15 * ONE);
        assert_eq!(f.tree.draw(0), Some(alice.owner));
    }

    #[test]
    fn test_next_prize_period_start_time() {
        let f = Fixture::new();
        let s = &f.strategy;
        assert_eq!(s.calculate_next_prize_period_start_time(START + 14 * PERIOD), START + 14 * PERIOD);
        assert_eq!(s.calculate_next_prize_period_start_time(START + PERIOD / 2), START);
        assert_eq!(s.calculate_next_prize_period_start_time(START + PERIOD * 3 / 2), START + PERIOD);
    }

    #[test]
    fn test_start_award_waits_for_period_end() {
        let mut f = Fixture::new();
        assert!(!f.strategy.can_start_award(START + PERIOD - 1));
        assert_error(f.start_award(START + PERIOD - 1), PrizePoolError::DrawNotReady);

        assert!(f.strategy.can_start_award(START + PERIOD));
        f.start_award(START + PERIOD).unwrap();
        assert_eq!(f.strategy.state(), PrizePeriodState::Locked);
        assert_error(f.start_award(START + PERIOD), PrizePoolError::DrawNotReady);
    }

    #[test]
    fn test_complete_award_waits_for_randomness() {
        let mut f = Fixture::new();
        assert_error(f.complete_award(None, START), PrizePoolError::DrawNotComplete);

        f.start_award(START + PERIOD).unwrap();
        assert!(!f.strategy.can_complete_award(&f.rng));
        assert_error(f.complete_award(None, START + PERIOD), PrizePoolError::DrawNotComplete);

        f.rng.answer(7);
        assert!(f.strategy.can_complete_award(&f.rng));
    }

    #[test]
    fn test_weighted_operations_fail_while_locked() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        let mut bob = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, START).unwrap();
        f.deposit(&mut alice, ControlledToken::Sponsorship, 10 * ONE, START).unwrap();
        let now = START + PERIOD;
        f.start_award(now).unwrap();

        assert_error(f.deposit(&mut alice, ControlledToken::Ticket, ONE, now), PrizePoolError::RngInFlight);
        assert_error(
            f.withdraw_instantly(&mut alice, ControlledToken::Ticket, ONE, ONE, now),
            PrizePoolError::RngInFlight,
        );
        assert_error(
            f.withdraw_with_timelock(&mut alice, ControlledToken::Ticket, ONE, now),
            PrizePoolError::RngInFlight,
        );
        assert_error(
            f.transfer(&mut alice, &mut bob, ControlledToken::Ticket, ONE, now),
            PrizePoolError::RngInFlight,
        );

        f.deposit(&mut bob, ControlledToken::Sponsorship, ONE, now).unwrap();
        f.transfer(&mut alice, &mut bob, ControlledToken::Sponsorship, ONE, now).unwrap();
        let receipt = f
            .withdraw_instantly(&mut bob, ControlledToken::Sponsorship, 2 * ONE, 0, now)
            .unwrap();
        assert_eq!(receipt.paid, 2 * ONE);
        assert_eq!(f.tree.total(), 10 * ONE);
    }

    #[test]
    fn test_configuration_is_frozen_while_locked() {
        let mut f = Fixture::new();
        let admin = f.strategy.admin;
        assert_eq!(f.strategy.set_credit_rate(&admin, 2 * CREDIT_RATE).unwrap(), CREDIT_RATE);
        assert_error(
            f.strategy.set_credit_rate(&admin, MANTISSA_SCALE + 1),
            PrizePoolError::InvalidRate,
        );
        assert_error(
            f.strategy.set_exit_fee(&admin, &f.pool, MANTISSA_SCALE),
            PrizePoolError::ExitFeeExceedsMax,
        );

        f.start_award(START + PERIOD).unwrap();
        assert_error(f.strategy.set_credit_rate(&admin, CREDIT_RATE), PrizePoolError::RngInFlight);
        assert_error(f.strategy.set_exit_fee(&admin, &f.pool, EXIT_FEE), PrizePoolError::RngInFlight);
        assert_error(
            f.strategy.set_rng_oracle(&admin, Pubkey::new_unique()),
            PrizePoolError::RngInFlight,
        );
    }

    #[test]
    fn test_configuration_requires_admin() {
        let mut f = Fixture::new();
        let stranger = Pubkey::new_unique();
        let oracle = f.strategy.rng_oracle;

        assert_error(f.strategy.require_admin(&stranger), PrizePoolError::Unauthorized);
        assert_error(f.strategy.set_credit_rate(&stranger, 0), PrizePoolError::Unauthorized);
        assert_error(f.strategy.set_exit_fee(&stranger, &f.pool, 0), PrizePoolError::Unauthorized);
        assert_error(
            f.strategy.set_rng_oracle(&stranger, Pubkey::new_unique()),
            PrizePoolError::Unauthorized,
        );
        assert_eq!(f.strategy.credit_rate_mantissa, CREDIT_RATE);
        assert_eq!(f.strategy.exit_fee_mantissa, EXIT_FEE);
        assert_eq!(f.strategy.rng_oracle, oracle);

        let admin = f.strategy.admin;
        f.strategy.require_admin(&admin).unwrap();
        let new_oracle = Pubkey::new_unique();
        assert_eq!(f.strategy.set_rng_oracle(&admin, new_oracle).unwrap(), oracle);
        assert_eq!(f.strategy.rng_oracle, new_oracle);
    }

    #[test]
    fn test_end_to_end_draw() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, START).unwrap();

        let end = START + PERIOD;
        f.source.accrue(ONE);
        let (snapshot, reserve) = f.start_award(end).unwrap();
        assert_eq!(snapshot.prize, ONE);
        assert_eq!(snapshot.total_weight, 10 * ONE);
        assert_eq!(reserve, 0);

        f.rng.answer(123_456_789);
        let outcome = f.complete_award(Some(&mut alice), end).unwrap();

        assert_eq!(outcome.winner, Some(alice.owner));
        assert_eq!(outcome.prize, ONE);
        assert_eq!(alice.ticket_balance, 11 * ONE);
        assert_eq!(f.tree.total(), 11 * ONE);
        assert_eq!(f.strategy.balance_of_credit(&alice, end).unwrap(), ONE + ONE / 10);
        assert_eq!(f.strategy.prize_period_started_at, START + PERIOD);
        assert_eq!(f.strategy.state(), PrizePeriodState::Idle);
        assert_eq!(f.pool.accounted_balance, 11 * ONE);
        assert_eq!(f.pool.award_balance(f.source.balance()), 0);
    }

    #[test]
    fn test_empty_draw_rolls_prize_over() {
        let mut f = Fixture::new();
        f.source.accrue(5 * ONE);
        let late = START + PERIOD * 5 / 2;
        f.start_award(late).unwrap();
        f.rng.answer(99);

        let outcome = f.complete_award(None, late).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.prize, 0);
        assert_eq!(outcome.next_prize_period_started_at, START + 2 * PERIOD);
        assert_eq!(f.pool.award_balance(f.source.balance()), 5 * ONE);
    }

    #[test]
    fn test_rolled_over_prize_keeps_its_reserve_cut() {
        let mut f = Fixture::new();
        f.pool.reserve_rate_mantissa = MANTISSA_SCALE / 10;
        f.source.accrue(100 * ONE);

        let end = START + PERIOD;
        let (first, reserve) = f.start_award(end).unwrap();
        assert_eq!((first.prize, reserve), (90 * ONE, 10 * ONE));
        f.rng.answer(1);
        f.complete_award(None, end).unwrap();
        assert_eq!(f.pool.current_prize(f.source.balance()).unwrap(), 90 * ONE);

        let next = end + PERIOD;
        let (second, reserve) = f.start_award(next).unwrap();
        assert_eq!((second.prize, reserve), (90 * ONE, 0));
        assert_eq!(f.pool.reserve_total, 10 * ONE);

        let mut alice = depositor();
        f.rng.answer(2);
        f.complete_award(None, next).unwrap();
        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, next).unwrap();
        f.source.accrue(10 * ONE);

        let last = next + PERIOD;
        let (third, reserve) = f.start_award(last).unwrap();
        assert_eq!((third.prize, reserve), (99 * ONE, ONE));
        f.rng.answer(3);
        f.complete_award(Some(&mut alice), last).unwrap();
        assert_eq!(alice.ticket_balance, 109 * ONE);
        assert_eq!(f.pool.rolled_over_prize, 0);
        assert_eq!(f.pool.award_balance(f.source.balance()), 0);
    }

    fn holder_above_minimum() -> (Fixture, Depositor) {
        let mut f = Fixture::new();
        f.strategy.min_ticket_balance = ONE;
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 2 * ONE, START).unwrap();
        (f, alice)
    }

    #[test]
    fn test_dust_balances_cannot_claim_slots() {
        let mut f = Fixture::new();
        f.strategy.min_ticket_balance = ONE;
        let mut dust = depositor();
        assert_error(
            f.deposit(&mut dust, ControlledToken::Ticket, ONE - 1, START),
            PrizePoolError::TicketBalanceBelowMinimum,
        );
        let mut sponsor = depositor();
        f.deposit(&mut sponsor, ControlledToken::Sponsorship, 1, START).unwrap();
        assert_eq!(f.tree.leaf_count, 0);

        let (mut f, mut alice) = holder_above_minimum();
        assert_error(
            f.withdraw_instantly(&mut alice, ControlledToken::Ticket, 2 * ONE - 1, ONE, START),
            PrizePoolError::TicketBalanceBelowMinimum,
        );

        let (mut f, mut alice) = holder_above_minimum();
        assert_error(
            f.withdraw_with_timelock(&mut alice, ControlledToken::Ticket, 2 * ONE - 1, START),
            PrizePoolError::TicketBalanceBelowMinimum,
        );

        let (mut f, mut alice) = holder_above_minimum();
        let mut bob = depositor();
        assert_error(
            f.transfer(&mut alice, &mut bob, ControlledToken::Ticket, 1, START),
            PrizePoolError::TicketBalanceBelowMinimum,
        );

        let (mut f, mut alice) = holder_above_minimum();
        f.withdraw_instantly(&mut alice, ControlledToken::Ticket, ONE, ONE, START)
            .unwrap();
        assert_eq!(f.strategy.chance_of(&f.tree, &alice), ONE);
        f.withdraw_instantly(&mut alice, ControlledToken::Ticket, ONE, ONE, START)
            .unwrap();
        assert_eq!(alice.sortition_slot, None);
        assert_eq!(f.tree.total(), 0);
    }

    #[test]
    fn test_minimum_keeps_the_tree_open_to_new_holders() {
        let mut f = Fixture::new();
        f.strategy.min_ticket_balance = ONE;
        for _ in 0..SORTITION_CAPACITY {
            let mut dust = depositor();
            assert_error(
                f.deposit(&mut dust, ControlledToken::Ticket, 1, START),
                PrizePoolError::TicketBalanceBelowMinimum,
            );
        }

        let mut whale = depositor();
        f.deposit(&mut whale, ControlledToken::Ticket, 1_000_000 * ONE, START)
            .unwrap();
        assert_eq!(f.tree.total(), 1_000_000 * ONE);
        assert_eq!(f.strategy.chance_of(&f.tree, &whale), 1_000_000 * ONE);
    }

    #[test]
    fn test_winner_account_must_match_draw() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        let mut bob = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, START).unwrap();
        f.deposit(&mut bob, ControlledToken::Ticket, 10 * ONE, START).unwrap();

        let end = START + PERIOD;
        f.source.accrue(ONE);
        f.start_award(end).unwrap();
        // lands in bob's half of the weight
        f.rng.answer(20 * ONE as u128 + 15 * ONE as u128);

        assert_error(f.complete_award(None, end), PrizePoolError::WinnerAccountMismatch);
        assert_error(f.complete_award(Some(&mut alice), end), PrizePoolError::WinnerAccountMismatch);

        let outcome = f.complete_award(Some(&mut bob), end).unwrap();
        assert_eq!(outcome.winner, Some(bob.owner));
        assert_eq!(bob.ticket_balance, 11 * ONE);
        assert_eq!(alice.ticket_balance, 10 * ONE);
    }

    #[test]
    fn test_instant_withdrawal_burns_credit_against_fee() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 100 * ONE, START).unwrap();

        let quote = f
            .strategy
            .calculate_instant_withdrawal_fee(&alice, 50 * ONE, ControlledToken::Ticket, START)
            .unwrap();
        assert_eq!(quote, WithdrawalFee { remaining_fee: 5 * ONE, burned_credit: 0 });
        assert_error(
            f.withdraw_instantly(&mut alice, ControlledToken::Ticket, 50 * ONE, 0, START),
            PrizePoolError::ExitFeeExceedsLimit,
        );

        let half = START + PERIOD / 2;
        assert_eq!(f.strategy.balance_of_credit(&alice, half).unwrap(), 5 * ONE);
        let receipt = f
            .withdraw_instantly(&mut alice, ControlledToken::Ticket, 50 * ONE, 0, half)
            .unwrap();
        assert_eq!(receipt.paid, 50 * ONE);
        assert_eq!(receipt.exit_fee, 0);
        assert_eq!(receipt.burned_credit, 5 * ONE);
        assert_eq!(alice.credit.balance, 0);
        assert_eq!(f.tree.total(), 50 * ONE);
    }

    #[test]
    fn test_instant_withdrawal_fee_becomes_prize() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 100 * ONE, START).unwrap();

        let receipt = f
            .withdraw_instantly(&mut alice, ControlledToken::Ticket, 100 * ONE, 10 * ONE, START)
            .unwrap();
        assert_eq!(receipt.paid, 90 * ONE);
        assert_eq!(alice.sortition_slot, None);
        assert_eq!(f.tree.total(), 0);
        assert_eq!(f.pool.current_prize(f.source.balance()).unwrap(), 10 * ONE);
    }

    #[test]
    fn test_timelock_quote_without_credit() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 100 * ONE, START).unwrap();

        let quote = f
            .strategy
            .calculate_timelock_duration_and_fee(&alice, 50 * ONE, ControlledToken::Ticket, 10_000, START)
            .unwrap();
        assert_eq!(quote, TimelockQuote { duration_seconds: PERIOD, burned_credit: 0 });

        let capped = f
            .strategy
            .calculate_timelock_duration_and_fee(&alice, 50 * ONE, ControlledToken::Ticket, 300, START)
            .unwrap();
        assert_eq!(capped.duration_seconds, 300);
    }

    #[test]
    fn test_timelocks_coalesce_and_release_when_covered() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 100 * ONE, START).unwrap();

        let first = f
            .withdraw_with_timelock(&mut alice, ControlledToken::Ticket, 50 * ONE, START)
            .unwrap();
        assert_eq!(first.unlock_timestamp, START + PERIOD);
        assert_eq!(first.paid, 0);
        assert_eq!(f.tree.total(), 50 * ONE);
        assert_eq!(f.pool.accounted_balance, 100 * ONE);

        // a full period of credit on the remaining 50 covers the fee
        let end = START + PERIOD;
        let second = f
            .withdraw_with_timelock(&mut alice, ControlledToken::Ticket, 50 * ONE, end)
            .unwrap();
        assert_eq!(second.burned_credit, 5 * ONE);
        assert_eq!(second.paid, 100 * ONE);
        assert_eq!(alice.timelock.amount, 0);
        assert_eq!(f.pool.accounted_balance, 0);
        assert_eq!(f.tree.total(), 0);
    }

    #[test]
    fn test_ticket_transfer_moves_weight() {
        let mut f = Fixture::new();
        let mut alice = depositor();
        let mut bob = depositor();
        f.deposit(&mut alice, ControlledToken::Ticket, 10 * ONE, START).unwrap();

        let end = START + PERIOD;
        f.transfer(&mut alice, &mut bob, ControlledToken::Ticket, 4 * ONE, end).unwrap();

        assert_eq!(f.strategy.chance_of(&f.tree, &alice), 6 * ONE);
        assert_eq!(f.strategy.chance_of(&f.tree, &bob), 4 * ONE);
        assert_eq!(f.tree.total(), 10 * ONE);
        // a full period of credit, clamped to the smaller balance
        assert_eq!(alice.credit.balance, 6 * ONE / 10);
        assert_eq!(bob.credit.balance, 0);
    }

    #[test]
    fn test_estimate_credit_accrual_time() {
        let f = Fixture::new();
        assert_eq!(f.strategy.estimate_credit_accrual_time(100, 10), PERIOD as u64);
        assert_eq!(f.strategy.estimate_credit_accrual_time(100, 30), 3 * PERIOD as u64);
    }

    #[test]
    fn test_estimate_prize_over_remaining_period() {
        let mut f = Fixture::new();
        let mut sponsor = depositor();
        f.source.interest_rate_per_second_mantissa = MANTISSA_SCALE / 100_000;
        f.deposit(&mut sponsor, ControlledToken::Sponsorship, 1_000, START).unwrap();
        f.source.accrue(100);

        assert_eq!(f.strategy.estimate_prize(&f.pool, &f.source, START).unwrap(), 110);
    }
}
