use anchor_lang::prelude::*;

use crate::state::DisplayRef;

/// A balance was adjusted by a moderator
#[event]
pub struct BalanceAdjusted {
    pub user_id: u64,
    pub delta: i64,
    pub new_balance: i64,
    pub timestamp: i64,
}

/// A balance was overwritten by a moderator
#[event]
pub struct BalanceSet {
    pub user_id: u64,
    pub new_balance: i64,
    pub timestamp: i64,
}

#[event]
pub struct AwardEventCreated {
    pub event_id: u64,
    pub ticket_value: u64,
    pub expiry: i64,
    pub display: DisplayRef,
}

/// A user claimed an award event
#[event]
pub struct AwardRedeemed {
    pub event_id: u64,
    pub user_id: u64,
    pub tickets_awarded: u64,
    pub new_balance: i64,
    pub timestamp: i64,
}

/// An award event stopped accepting redemptions.
/// The chat layer uses `display` to take the message down.
#[event]
pub struct AwardEventClosed {
    pub event_id: u64,
    pub display: DisplayRef,
    /// True when the event lapsed, false when closed early
    pub expired: bool,
    pub timestamp: i64,
}

#[event]
pub struct RaffleCreated {
    pub raffle_id: u64,
    pub keyword: String,
    pub cost: u64,
    pub display: DisplayRef,
}

/// A user bought into a raffle; `total_entries` feeds the public counter
#[event]
pub struct RaffleEntered {
    pub raffle_id: u64,
    pub user_id: u64,
    pub entry_amount: u64,
    pub new_balance: i64,
    pub total_entries: u64,
    pub display: DisplayRef,
}

/// A raffle was closed; its pool follows in RaffleEntriesPublished batches
#[event]
pub struct RaffleResolved {
    pub raffle_id: u64,
    pub keyword: String,
    pub entrant_count: u32,
    pub total_entries: u64,
    pub display: DisplayRef,
    pub timestamp: i64,
}

/// One batch of a resolved raffle's pool.
/// Winner selection starts once a batch arrives with `complete` set.
#[event]
pub struct RaffleEntriesPublished {
    pub raffle_id: u64,
    pub entries: Vec<crate::selection::EntryWeight>,
    pub published_entries: u32,
    pub entrant_count: u32,
    pub complete: bool,
}
