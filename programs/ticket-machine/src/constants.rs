use anchor_lang::solana_program::hash::hash;

// PDA Seeds for deterministic address generation

/// Seed for Machine PDAs: ["machine", authority.key()]
/// One machine per bot authority
pub const MACHINE_SEED: &[u8] = b"machine";

/// Seed for TicketAccount PDAs: ["tickets", machine.key(), user_id]
/// This ensures one balance row per user per machine
pub const ACCOUNT_SEED: &[u8] = b"tickets";

/// Seed for AwardEvent PDAs: ["award_event", machine.key(), event_id]
pub const EVENT_SEED: &[u8] = b"award_event";

/// Seed for EventParticipation PDAs: ["participation", award_event.key(), user_id]
/// The (event, user) pair can only ever map to one address
pub const PARTICIPATION_SEED: &[u8] = b"participation";

/// Seed for KeywordLock PDAs: ["keyword", machine.key(), keyword_seed(keyword)]
pub const KEYWORD_SEED: &[u8] = b"keyword";

/// Seed for Raffle PDAs: ["raffle", machine.key(), raffle_id]
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Seed for RaffleEntry PDAs: ["entry", raffle.key(), user_id]
pub const ENTRY_SEED: &[u8] = b"entry";

// Account Space Constants

/// Anchor discriminator size (8 bytes)
pub const ANCHOR_DISCRIMINATOR: usize = 8;

// Text Limits

/// Maximum raffle keyword length in bytes
pub const MAX_KEYWORD_LEN: usize = 100;

/// Maximum raffle/event description length in bytes
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Description used for award events created without one
pub const DEFAULT_EVENT_DESCRIPTION: &str = "A pile of tickets lies on the ground.";

// Ledger Limits

/// Upper bound applied to balances on adjustment unless the machine overrides it
pub const DEFAULT_BALANCE_CAP: i64 = i32::MAX as i64;

// Raffle Defaults

/// Cost per entry when the caller does not give one (0 = free raffle)
pub const DEFAULT_RAFFLE_COST: u64 = 1;

/// Winners drawn when the caller does not ask for a specific number
pub const DEFAULT_WINNER_COUNT: u32 = 1;

// Award Event Defaults

/// Tickets granted per redemption when not specified
pub const DEFAULT_EVENT_VALUE: u64 = 1;

/// Default event lifetime (1 day in minutes)
pub const DEFAULT_EVENT_DURATION_MINUTES: u32 = 24 * 60; // 1,440 minutes

/// Maximum event lifetime (7 days in minutes)
pub const MAX_EVENT_DURATION_MINUTES: u32 = 7 * 24 * 60; // 10,080 minutes

pub const SECONDS_PER_MINUTE: i64 = 60;

/// Most events one sweep accepts; the closed list has to fit in 1 KiB of return data
pub const MAX_SWEEP_BATCH: usize = 30;

/// Case-folded hash of a keyword, used as the KeywordLock seed.
/// Keywords can be longer than the 32-byte seed limit, so the PDA is keyed
/// by the hash instead of the raw bytes.
pub fn keyword_seed(keyword: &str) -> [u8; 32] {
    hash(keyword.to_lowercase().as_bytes()).to_bytes()
}

/// Check if a raffle keyword is usable.
/// The limit is in bytes, so multi-byte characters count for more than one.
pub fn is_valid_keyword(keyword: &str) -> bool {
    !keyword.trim().is_empty() && keyword.len() <= MAX_KEYWORD_LEN
}

/// Check if a description fits in its account slot
pub fn is_valid_description(description: &str) -> bool {
    description.len() <= MAX_DESCRIPTION_LEN
}

/// Check if an award event duration is within bounds
pub fn is_valid_event_duration(minutes: u32) -> bool {
    minutes <= MAX_EVENT_DURATION_MINUTES
}

/// Check if a balance cap can be used as the clamp ceiling
pub fn is_valid_balance_cap(cap: i64) -> bool {
    cap >= 0
}

/// Expiry timestamp for an event opened at `now` lasting `minutes`
pub fn event_expiry(now: i64, minutes: u32) -> Option<i64> {
    (minutes as i64)
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(|secs| now.checked_add(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_seed_is_case_insensitive() {
        assert_eq!(keyword_seed("Giveaway"), keyword_seed("giveaway"));
        assert_eq!(keyword_seed("GIVEAWAY"), keyword_seed("giveaway"));
        assert_ne!(keyword_seed("giveaway"), keyword_seed("give away"));
    }

    #[test]
    fn test_validation_functions() {
        // Keyword validation
        assert!(is_valid_keyword("spring"));
        assert!(is_valid_keyword(&"k".repeat(MAX_KEYWORD_LEN)));
        assert!(!is_valid_keyword(&"k".repeat(MAX_KEYWORD_LEN + 1)));
        assert!(!is_valid_keyword(""));
        assert!(!is_valid_keyword("   "));
        // 50 characters, 100 bytes
        assert!(is_valid_keyword(&"é".repeat(50)));
        assert!(!is_valid_keyword(&"é".repeat(51)));

        // Description validation
        assert!(is_valid_description(DEFAULT_EVENT_DESCRIPTION));
        assert!(!is_valid_description(&"d".repeat(MAX_DESCRIPTION_LEN + 1)));

        // Duration validation
        assert!(is_valid_event_duration(0));
        assert!(is_valid_event_duration(DEFAULT_EVENT_DURATION_MINUTES));
        assert!(is_valid_event_duration(MAX_EVENT_DURATION_MINUTES));
        assert!(!is_valid_event_duration(MAX_EVENT_DURATION_MINUTES + 1));

        // Balance cap validation
        assert!(is_valid_balance_cap(DEFAULT_BALANCE_CAP));
        assert!(is_valid_balance_cap(0));
        assert!(!is_valid_balance_cap(-1));
    }

    #[test]
    fn test_event_expiry() {
        assert_eq!(event_expiry(1_000, 0), Some(1_000));
        assert_eq!(event_expiry(1_000, 2), Some(1_120));
        assert_eq!(
            event_expiry(0, DEFAULT_EVENT_DURATION_MINUTES),
            Some(24 * 60 * 60)
        );
        assert_eq!(event_expiry(i64::MAX, 1), None);
    }
}
