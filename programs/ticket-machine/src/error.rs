use anchor_lang::prelude::*;

/// Every way a ticket machine operation can be rejected.
/// Callers branch on the variant, never on the message text.
#[error_code]
pub enum TicketError {
    // Machine Errors
    #[msg("Only the machine authority can perform this action")]
    Unauthorized,

    #[msg("Balance cap must not be negative")]
    InvalidBalanceCap,

    // Ledger Errors
    #[msg("Ticket balance is too small for this entry")]
    InsufficientFunds,

    // Raffle Errors
    #[msg("No active raffle uses this keyword")]
    RaffleNotFound,

    #[msg("Keyword is already in use by an active raffle")]
    KeywordInUse,

    #[msg("User has already entered this free raffle")]
    AlreadyEntered,

    #[msg("Entry amount is below the raffle cost")]
    BelowMinimum,

    #[msg("Entry amount must be at least one ticket")]
    InvalidEntryAmount,

    #[msg("Keyword must not be empty")]
    KeywordEmpty,

    #[msg("Keyword exceeds the maximum length in bytes")]
    KeywordTooLong,

    #[msg("Entry account does not belong to this raffle")]
    InvalidEntryAccount,

    #[msg("Entry account was passed more than once")]
    DuplicateEntryAccount,

    #[msg("Raffle must be resolved before its entries are published")]
    RaffleStillActive,

    #[msg("Entry has already been published")]
    EntryAlreadyPublished,

    // Award Event Errors
    #[msg("Award event not found")]
    EventNotFound,

    #[msg("Award event is closed")]
    EventClosed,

    #[msg("Award event has expired")]
    EventExpired,

    #[msg("Event duration exceeds the maximum")]
    InvalidEventDuration,

    #[msg("Account is not a writable award event of this machine")]
    InvalidEventAccount,

    #[msg("Too many events in one sweep")]
    SweepBatchTooLarge,

    // General Errors
    #[msg("Description exceeds the maximum length")]
    DescriptionTooLong,

    #[msg("Mathematical overflow in calculations")]
    MathOverflow,
}

impl TicketError {
    /// Get error code as u32 for logging
    pub fn error_code(&self) -> u32 {
        match self {
            // Machine errors: 1000-1099
            TicketError::Unauthorized => 1001,
            TicketError::InvalidBalanceCap => 1002,

            // Ledger errors: 1100-1199
            TicketError::InsufficientFunds => 1101,

            // Raffle errors: 1200-1299
            TicketError::RaffleNotFound => 1201,
            TicketError::KeywordInUse => 1202,
            TicketError::AlreadyEntered => 1203,
            TicketError::BelowMinimum => 1204,
            TicketError::InvalidEntryAmount => 1205,
            TicketError::KeywordEmpty => 1206,
            TicketError::KeywordTooLong => 1207,
            TicketError::InvalidEntryAccount => 1208,
            TicketError::DuplicateEntryAccount => 1209,
            TicketError::RaffleStillActive => 1210,
            TicketError::EntryAlreadyPublished => 1211,

            // Award event errors: 1300-1399
            TicketError::EventNotFound => 1301,
            TicketError::EventClosed => 1302,
            TicketError::EventExpired => 1303,
            TicketError::InvalidEventDuration => 1304,
            TicketError::InvalidEventAccount => 1305,
            TicketError::SweepBatchTooLarge => 1306,

            // General errors: 1400-1499
            TicketError::DescriptionTooLong => 1401,
            TicketError::MathOverflow => 1402,
        }
    }

    /// Get human-readable error category
    pub fn category(&self) -> &'static str {
        match self.error_code() {
            1000..=1099 => "Machine Management",
            1100..=1199 => "Ledger Operations",
            1200..=1299 => "Raffle Operations",
            1300..=1399 => "Award Events",
            1400..=1499 => "Validation",
            _ => "Unknown",
        }
    }
}

/// Helper macro for logging errors with context
#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        msg!(
            "Error {}: {} in context: {}",
            $error.error_code(),
            $error.category(),
            $context
        );
    };
}

/// Log a rejection and hand back the error so call sites can `return Err(reject(..))`
pub fn reject(error: TicketError, context: &str) -> Error {
    log_error!(error, context);
    error.into()
}

/// Helper function to safely add two u64 values
pub fn safe_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(TicketError::MathOverflow.into())
}

/// Convert an unsigned ticket amount into the signed ledger domain
pub fn to_ledger_amount(amount: u64) -> Result<i64> {
    i64::try_from(amount).map_err(|_| TicketError::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TicketError::Unauthorized.error_code(), 1001);
        assert_eq!(TicketError::InsufficientFunds.error_code(), 1101);
        assert_eq!(TicketError::RaffleNotFound.error_code(), 1201);
        assert_eq!(TicketError::EventExpired.error_code(), 1303);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(TicketError::InvalidBalanceCap.category(), "Machine Management");
        assert_eq!(TicketError::InsufficientFunds.category(), "Ledger Operations");
        assert_eq!(TicketError::AlreadyEntered.category(), "Raffle Operations");
        assert_eq!(TicketError::EventClosed.category(), "Award Events");
        assert_eq!(TicketError::MathOverflow.category(), "Validation");
    }

    #[test]
    fn test_distinct_kinds_are_distinct_errors() {
        let not_found: Error = TicketError::RaffleNotFound.into();
        let in_use: Error = TicketError::KeywordInUse.into();
        assert_ne!(not_found, in_use);
        assert_eq!(not_found, TicketError::RaffleNotFound.into());
    }

    #[test]
    fn test_safe_math_functions() {
        assert_eq!(safe_add_u64(3, 5).unwrap(), 8);
        assert!(safe_add_u64(u64::MAX, 1).is_err());

        assert_eq!(to_ledger_amount(42).unwrap(), 42);
        assert!(to_ledger_amount(u64::MAX).is_err());
    }
}
