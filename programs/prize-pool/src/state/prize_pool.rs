use anchor_lang::prelude::*;

use crate::constants::MAX_FRACTION_MANTISSA;
use crate::errors::PrizePoolError;
use crate::math::split_reserve;
use crate::state::{ControlledToken, Depositor};
use crate::yield_source::{YieldSource, YieldSourceMut};

#[account]
#[derive(Default, InitSpace)]
pub struct PrizePool {
    /// Unique pool identifier
    pub pool_id: [u8; 32],

    /// Administrator allowed to change pool configuration
    pub admin: Pubkey,

    /// Mint of the deposited token
    pub underlying_mint: Pubkey,

    /// Pool-owned token account holding principal and interest
    pub vault: Pubkey,

    /// Strategy running draws for this pool, default until initialized
    pub prize_strategy: Pubkey,

    /// Principal tracked across tickets, sponsorship and timelocks
    pub accounted_balance: u64,

    pub ticket_supply: u64,

    pub sponsorship_supply: u64,

    /// Principal waiting in timelocks, included in `accounted_balance`
    pub timelock_supply: u64,

    /// Reserve captured at draws and held back from prizes
    pub reserve_total: u64,

    /// Prize left behind by a draw nobody could win, already net of reserve
    pub rolled_over_prize: u64,

    pub reserve_rate_mantissa: u128,

    pub max_exit_fee_mantissa: u128,

    pub max_timelock_duration: i64,

    /// Expected vault yield per second, used only for prize estimates
    pub interest_rate_per_second_mantissa: u128,

    /// Bump seed for PDA derivation
    pub bump: u8,

    pub vault_bump: u8,
}

impl PrizePool {
    pub fn total_supply(&self, token: ControlledToken) -> u64 {
        match token {
            ControlledToken::Ticket => self.ticket_supply,
            ControlledToken::Sponsorship => self.sponsorship_supply,
        }
    }

    /// Moves `amount` into the yield source and starts tracking it.
    pub fn supply<Y: YieldSourceMut>(&mut self, source: &mut Y, amount: u64) -> Result<()> {
        source.supply(amount)?;
        self.accounted_balance = self
            .accounted_balance
            .checked_add(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    /// Pulls tracked principal back out of the yield source.
    pub fn redeem<Y: YieldSourceMut>(&mut self, source: &mut Y, amount: u64) -> Result<u64> {
        require!(amount <= self.accounted_balance, PrizePoolError::InsufficientLiquidity);
        let actual = Self::release(source, amount)?;
        self.accounted_balance = self
            .accounted_balance
            .checked_sub(actual)
            .ok_or(PrizePoolError::InsufficientLiquidity)?;
        Ok(actual)
    }

    fn release<Y: YieldSourceMut>(source: &mut Y, amount: u64) -> Result<u64> {
        require!(amount <= source.liquidity(), PrizePoolError::InsufficientLiquidity);
        source.redeem(amount)
    }

    /// Interest held beyond tracked principal and captured reserve.
    pub fn award_balance(&self, vault_balance: u64) -> u64 {
        vault_balance
            .saturating_sub(self.accounted_balance)
            .saturating_sub(self.reserve_total)
    }

    /// What a draw started now would award.
    pub fn current_prize(&self, vault_balance: u64) -> Result<u64> {
        let (prize, _) = self.split_award(self.award_balance(vault_balance), 0)?;
        Ok(prize)
    }

    /// Current prize plus interest the principal is expected to earn in `seconds`.
    pub fn estimate_prize<Y: YieldSource>(&self, source: &Y, seconds: u64) -> Result<u64> {
        let expected = source.estimate_accrued_interest(self.accounted_balance, seconds);
        let (prize, _) = self.split_award(self.award_balance(source.balance()), expected)?;
        Ok(prize)
    }

    /// Freezes the award balance for a draw, moving the reserve cut aside.
    /// Returns `(prize, reserve)`.
    pub fn capture_award_balance(&mut self, vault_balance: u64) -> Result<(u64, u64)> {
        let (prize, reserve) = self.split_award(self.award_balance(vault_balance), 0)?;
        self.reserve_total = self
            .reserve_total
            .checked_add(reserve)
            .ok_or(PrizePoolError::MathOverflow)?;
        self.rolled_over_prize = 0;
        Ok((prize, reserve))
    }

    /// Keeps an unclaimed prize out of the next reserve cut.
    pub(crate) fn roll_over_prize(&mut self, prize: u64) {
        self.rolled_over_prize = prize;
    }

    /// Splits `award_balance` plus `expected` interest into `(prize, reserve)`.
    /// A rolled-over prize was reserved when first captured and passes through whole.
    fn split_award(&self, award_balance: u64, expected: u64) -> Result<(u64, u64)> {
        let carried = self.rolled_over_prize.min(award_balance);
        let interest = (award_balance - carried)
            .checked_add(expected)
            .ok_or(PrizePoolError::MathOverflow)?;
        let (prize, reserve) = split_reserve(interest, self.reserve_rate_mantissa)?;
        let prize = prize.checked_add(carried).ok_or(PrizePoolError::MathOverflow)?;
        Ok((prize, reserve))
    }

    pub fn deposit_to<Y: YieldSourceMut>(
        &mut self,
        source: &mut Y,
        depositor: &mut Depositor,
        token: ControlledToken,
        amount: u64,
    ) -> Result<()> {
        require!(amount > 0, PrizePoolError::InvalidAmount);
        self.supply(source, amount)?;
        self.mint(depositor, token, amount)
    }

    /// Burns `amount`, pays out everything but `exit_fee` and leaves the fee
    /// in the vault as prize. Returns the amount paid out.
    pub fn withdraw_instantly_from<Y: YieldSourceMut>(
        &mut self,
        source: &mut Y,
        depositor: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        exit_fee: u64,
    ) -> Result<u64> {
        require!(amount > 0, PrizePoolError::InvalidAmount);
        let payout = amount
            .checked_sub(exit_fee)
            .ok_or(PrizePoolError::MathOverflow)?;

        self.burn(depositor, token, amount)?;
        let paid = if payout > 0 { self.redeem(source, payout)? } else { 0 };
        self.forfeit(exit_fee)?;
        Ok(paid)
    }

    /// Burns `amount` and parks it in the depositor's timelock. The principal
    /// stays accounted until swept.
    pub fn lock_for_timelock(
        &mut self,
        depositor: &mut Depositor,
        token: ControlledToken,
        amount: u64,
        unlock_timestamp: i64,
    ) -> Result<()> {
        require!(amount > 0, PrizePoolError::InvalidAmount);
        self.burn(depositor, token, amount)?;
        depositor.timelock.lock(amount, unlock_timestamp)?;
        self.timelock_supply = self
            .timelock_supply
            .checked_add(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    pub fn sweep_timelock<Y: YieldSourceMut>(
        &mut self,
        source: &mut Y,
        depositor: &mut Depositor,
        now: i64,
    ) -> Result<u64> {
        require!(depositor.timelock.amount > 0, PrizePoolError::InvalidAmount);
        require!(depositor.timelock.is_unlocked(now), PrizePoolError::TimelockNotExpired);

        let amount = depositor.timelock.amount;
        let paid = self.redeem(source, amount)?;
        depositor.timelock.take();
        self.timelock_supply = self
            .timelock_supply
            .checked_sub(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(paid)
    }

    pub fn transfer(
        &self,
        from: &mut Depositor,
        to: &mut Depositor,
        token: ControlledToken,
        amount: u64,
    ) -> Result<()> {
        require!(amount > 0, PrizePoolError::InvalidAmount);
        from.debit_ledger(token, amount)?;
        to.credit_ledger(token, amount)
    }

    /// Credits a prize that is already sitting in the vault.
    pub(crate) fn award(&mut self, winner: &mut Depositor, token: ControlledToken, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.accounted_balance = self
            .accounted_balance
            .checked_add(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        self.mint(winner, token, amount)
    }

    pub fn require_admin(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.admin, PrizePoolError::Unauthorized);
        Ok(())
    }

    /// Returns the previous rate.
    pub fn set_reserve_rate(&mut self, admin: &Pubkey, reserve_rate_mantissa: u128) -> Result<u128> {
        self.require_admin(admin)?;
        require!(reserve_rate_mantissa <= MAX_FRACTION_MANTISSA, PrizePoolError::InvalidRate);
        Ok(std::mem::replace(&mut self.reserve_rate_mantissa, reserve_rate_mantissa))
    }

    pub fn withdraw_reserve<Y: YieldSourceMut>(
        &mut self,
        admin: &Pubkey,
        source: &mut Y,
        amount: u64,
    ) -> Result<u64> {
        self.require_admin(admin)?;
        require!(amount > 0, PrizePoolError::InvalidAmount);
        require!(amount <= self.reserve_total, PrizePoolError::InsufficientReserve);
        let paid = Self::release(source, amount)?;
        self.reserve_total -= amount;
        Ok(paid)
    }

    /// The underlying is the only mint the pool accounts for; anything else
    /// it holds may be handed to a winner.
    pub fn can_award_external(&self, mint: &Pubkey) -> bool {
        *mint != self.underlying_mint
    }

    /// Validates a proposed exit fee against the pool cap.
    pub fn check_exit_fee(&self, exit_fee_mantissa: u128) -> Result<()> {
        require!(
            exit_fee_mantissa <= self.max_exit_fee_mantissa,
            PrizePoolError::ExitFeeExceedsMax
        );
        Ok(())
    }

    fn forfeit(&mut self, amount: u64) -> Result<()> {
        self.accounted_balance = self
            .accounted_balance
            .checked_sub(amount)
            .ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    fn mint(&mut self, depositor: &mut Depositor, token: ControlledToken, amount: u64) -> Result<()> {
        depositor.credit_ledger(token, amount)?;
        let supply = self.supply_mut(token);
        *supply = supply.checked_add(amount).ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    fn burn(&mut self, depositor: &mut Depositor, token: ControlledToken, amount: u64) -> Result<()> {
        depositor.debit_ledger(token, amount)?;
        let supply = self.supply_mut(token);
        *supply = supply.checked_sub(amount).ok_or(PrizePoolError::MathOverflow)?;
        Ok(())
    }

    fn supply_mut(&mut self, token: ControlledToken) -> &mut u64 {
        match token {
            ControlledToken::Ticket => &mut self.ticket_supply,
            ControlledToken::Sponsorship => &mut self.sponsorship_supply,
        }
    }
}
