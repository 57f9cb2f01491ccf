use anchor_lang::prelude::*;

#[error_code]
pub enum PrizePoolError {
    #[msg("Redemption exceeds the withdrawable vault balance")]
    InsufficientLiquidity,

    #[msg("A randomness request is in flight; balances and configuration are locked")]
    RngInFlight,

    #[msg("External award token is not approved by the prize pool")]
    UnapprovedExternalToken,

    #[msg("Non-fungible award is not held by the prize pool")]
    TokenNotHeldByPool,

    #[msg("Unauthorized authority for this operation")]
    Unauthorized,

    #[msg("Prize period has not ended or a draw is already in progress")]
    DrawNotReady,

    #[msg("No draw in progress or randomness not yet available")]
    DrawNotComplete,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Prize period must be greater than zero seconds")]
    InvalidPrizePeriod,

    #[msg("Exit fee exceeds the pool maximum")]
    ExitFeeExceedsMax,

    #[msg("Exit fee exceeds the caller's limit")]
    ExitFeeExceedsLimit,

    #[msg("Rate must not exceed 1.0")]
    InvalidRate,

    #[msg("Insufficient controlled token balance")]
    InsufficientBalance,

    #[msg("Timelocked funds are not yet unlocked")]
    TimelockNotExpired,

    #[msg("Sortition tree has no free slots")]
    SortitionTreeFull,

    #[msg("Winner depositor account does not match the drawn winner")]
    WinnerAccountMismatch,

    #[msg("Randomness request id does not match the outstanding request")]
    InvalidRngRequest,

    #[msg("External award registry is full")]
    ExternalAwardRegistryFull,

    #[msg("External award token accounts are missing or invalid")]
    InvalidExternalAwardAccounts,

    #[msg("Requested amount exceeds the captured reserve")]
    InsufficientReserve,

    #[msg("Sender and recipient must differ")]
    InvalidRecipient,

    #[msg("Ticket balance must be zero or at least the minimum")]
    TicketBalanceBelowMinimum,
}

#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: PrizePoolError) {
    use anchor_lang::error::ERROR_CODE_OFFSET;

    match result {
        Err(Error::AnchorError(error)) => {
            assert_eq!(error.error_code_number, expected as u32 + ERROR_CODE_OFFSET)
        }
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}
