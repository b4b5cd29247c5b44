use anchor_lang::prelude::*;

use crate::{constants::*, error::TicketError};

/// Where the chat layer rendered something, so it can update or delete it later.
/// All three are platform snowflakes.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayRef {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

/// Configuration row for one bot deployment
/// Every other account hangs off a machine
#[account]
#[derive(InitSpace, Debug)]
pub struct Machine {
    /// The bot key; the only signer allowed to mutate anything
    pub authority: Pubkey,

    /// Ceiling applied to balances when they are adjusted
    pub balance_cap: i64,

    /// Next raffle id to hand out
    pub next_raffle_id: u64,

    /// Next award event id to hand out
    pub next_event_id: u64,

    pub created_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Machine {
    /// Reserve a raffle id
    pub fn take_raffle_id(&mut self) -> Result<u64> {
        let id = self.next_raffle_id;
        self.next_raffle_id = id.checked_add(1).ok_or(TicketError::MathOverflow)?;
        Ok(id)
    }

    /// Reserve an award event id
    pub fn take_event_id(&mut self) -> Result<u64> {
        let id = self.next_event_id;
        self.next_event_id = id.checked_add(1).ok_or(TicketError::MathOverflow)?;
        Ok(id)
    }
}

/// A user's ticket balance - one per user per machine
/// Created lazily the first time anything touches the user's balance
#[account]
#[derive(InitSpace, Debug)]
pub struct TicketAccount {
    /// Machine this balance belongs to (default until first use)
    pub machine: Pubkey,

    /// Chat-platform user snowflake
    pub user_id: u64,

    /// Current balance
    pub tickets: i64,

    pub created_at: i64,
    pub updated_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl TicketAccount {
    /// Whether the row has been written before (init_if_needed hands back zeroed data)
    pub fn is_open(&self) -> bool {
        self.machine != Pubkey::default()
    }

    /// Fill in a freshly allocated row with a zero balance
    pub fn open(&mut self, machine: Pubkey, user_id: u64, now: i64, bump: u8) {
        self.machine = machine;
        self.user_id = user_id;
        self.tickets = 0;
        self.created_at = now;
        self.updated_at = now;
        self.bump = bump;
    }

    /// Add `delta` and clamp the result into `[0, cap]`.
    /// A fresh row holds 0, so it ends up at `max(delta, 0)` bounded by the cap.
    pub fn apply_delta(&mut self, delta: i64, cap: i64, now: i64) -> i64 {
        self.tickets = clamp_balance(self.tickets.saturating_add(delta), cap);
        self.updated_at = now;
        self.tickets
    }

    /// Open the row on first use; existing rows are left alone
    pub fn ensure_open(&mut self, machine: Pubkey, user_id: u64, now: i64, bump: u8) {
        if !self.is_open() {
            self.open(machine, user_id, now, bump);
        }
    }

    /// Overwrite the balance, no clamping
    pub fn set(&mut self, value: i64, now: i64) -> i64 {
        self.tickets = value;
        self.updated_at = now;
        self.tickets
    }

    /// Take exactly `amount` tickets out of the balance
    pub fn debit(&mut self, amount: u64, now: i64) -> Result<i64> {
        let amount = crate::error::to_ledger_amount(amount)?;
        require!(self.tickets >= amount, TicketError::InsufficientFunds);
        self.tickets -= amount;
        self.updated_at = now;
        Ok(self.tickets)
    }
}

/// Clamp a raw balance into `[0, cap]`
pub fn clamp_balance(raw: i64, cap: i64) -> i64 {
    raw.max(0).min(cap.max(0))
}

/// Balance of a possibly missing account; absent means zero
pub fn balance_of(account: Option<&TicketAccount>) -> i64 {
    account.map(|a| a.tickets).unwrap_or(0)
}

/// Deserialize a program account that may not have been created yet.
/// Absence (or an account this program does not own) is reported as `missing`.
pub fn load_account<T: AccountDeserialize + anchor_lang::Owner>(
    info: &AccountInfo,
    missing: TicketError,
) -> Result<T> {
    if info.owner != &T::owner() || info.data_is_empty() {
        return Err(missing.into());
    }
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Like `load_account`, but absence is not an error
pub fn load_optional<T: AccountDeserialize + anchor_lang::Owner>(
    info: &AccountInfo,
) -> Result<Option<T>> {
    if info.owner != &T::owner() || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map(Some)
}

/// Write an account loaded with `load_account` back into its data
pub fn store_account<T: AccountSerialize>(value: &T, info: &AccountInfo) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    value.try_serialize(&mut writer)
}

/// Time-limited click-to-claim grant
/// Flips from open to closed exactly once
#[account]
#[derive(InitSpace, Debug)]
pub struct AwardEvent {
    pub machine: Pubkey,

    pub event_id: u64,

    /// Tickets credited per redemption
    pub ticket_value: u64,

    /// Unix timestamp at which the event stops accepting redemptions
    pub expiry: i64,

    pub active: bool,

    #[max_len(MAX_DESCRIPTION_LEN)]
    pub description: String,

    /// Message announcing the event
    pub display: DisplayRef,

    pub redemption_count: u64,

    pub created_at: i64,

    /// When the event was closed (0 while open)
    pub closed_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl AwardEvent {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expiry
    }

    /// Reject redemptions on closed or lapsed events.
    /// An event past its expiry is treated as gone even before the sweeper flips it.
    pub fn check_redeemable(&self, now: i64) -> Result<()> {
        require!(self.active, TicketError::EventClosed);
        require!(!self.is_expired(now), TicketError::EventExpired);
        Ok(())
    }

    /// Whether a sweep at `now` should close this event
    pub fn is_sweepable(&self, now: i64) -> bool {
        self.active && self.is_expired(now)
    }

    /// Credit a user for this event.
    ///
    /// A user who already holds a participation record gets `awarded: false`
    /// and an untouched balance. Closed or lapsed events reject either way.
    pub fn redeem(
        &mut self,
        account: &mut TicketAccount,
        already_recorded: bool,
        cap: i64,
        now: i64,
    ) -> Result<RedeemOutcome> {
        self.check_redeemable(now)?;

        if already_recorded {
            return Ok(RedeemOutcome {
                awarded: false,
                new_balance: account.tickets,
            });
        }

        let credit = crate::error::to_ledger_amount(self.ticket_value)?;
        let new_balance = account.apply_delta(credit, cap, now);
        self.redemption_count = self
            .redemption_count
            .checked_add(1)
            .ok_or(TicketError::MathOverflow)?;

        Ok(RedeemOutcome {
            awarded: true,
            new_balance,
        })
    }

    pub fn close(&mut self, now: i64) -> Result<()> {
        require!(self.active, TicketError::EventClosed);
        self.active = false;
        self.closed_at = now;
        Ok(())
    }
}

/// Result of a redemption attempt
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemOutcome {
    /// False when the user had already claimed this event
    pub awarded: bool,
    pub new_balance: i64,
}

/// Proof that a user already claimed an award event (prevents double claims)
#[account]
#[derive(InitSpace, Debug)]
pub struct EventParticipation {
    pub award_event: Pubkey,
    pub user_id: u64,
    pub tickets_awarded: u64,
    pub redeemed_at: i64,
    pub bump: u8,
}

impl EventParticipation {
    pub fn is_recorded(&self) -> bool {
        self.award_event != Pubkey::default()
    }
}

/// Keyword reservation - a keyword is unique among active raffles only
/// The lock outlives its raffle and is re-held when the keyword is reused
#[account]
#[derive(InitSpace, Debug)]
pub struct KeywordLock {
    pub machine: Pubkey,

    /// Keyword as first written
    #[max_len(MAX_KEYWORD_LEN)]
    pub keyword: String,

    /// Most recent raffle created with this keyword
    pub raffle_id: u64,

    /// True while that raffle is active
    pub held: bool,

    pub bump: u8,
}

impl KeywordLock {
    /// Point the lock at a new raffle.
    /// A brand-new lock also records the machine, keyword and bump.
    pub fn claim(&mut self, machine: Pubkey, keyword: &str, raffle_id: u64, bump: u8) -> Result<()> {
        require!(!self.held, TicketError::KeywordInUse);
        if self.machine == Pubkey::default() {
            self.machine = machine;
            self.keyword = keyword.to_string();
            self.bump = bump;
        }
        self.raffle_id = raffle_id;
        self.held = true;
        Ok(())
    }

    /// Free the keyword once its raffle is resolved
    pub fn release(&mut self) {
        self.held = false;
    }

    /// Raffle id currently holding the keyword
    pub fn active_raffle_id(&self) -> Result<u64> {
        require!(self.held, TicketError::RaffleNotFound);
        Ok(self.raffle_id)
    }
}

/// Weighted lottery pool users buy into with tickets
#[account]
#[derive(InitSpace, Debug)]
pub struct Raffle {
    pub machine: Pubkey,

    pub raffle_id: u64,

    #[max_len(MAX_KEYWORD_LEN)]
    pub keyword: String,

    #[max_len(MAX_DESCRIPTION_LEN)]
    pub description: String,

    /// Minimum tickets per entry; 0 makes it a free, one-entry-per-user raffle
    pub cost: u64,

    pub active: bool,

    /// Message announcing the raffle
    pub display: DisplayRef,

    /// Number of distinct users with an entry
    pub entrant_count: u32,

    /// Sum of every entry_count, shown as the public entry counter
    pub total_entries: u64,

    pub created_at: i64,

    /// When the raffle was resolved (0 while active)
    pub resolved_at: i64,

    /// Entries published after resolution; the pool is complete once this
    /// reaches entrant_count
    pub published_entries: u32,

    pub bump: u8,
}

/// What an entry request turns into once validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPlan {
    /// Weight added to the user's entry
    pub entry_amount: u64,
    /// Tickets taken from the user's balance
    pub debit: u64,
}

impl Raffle {
    /// Resolve a keyword to its active raffle.
    /// The raffle account must be the one the keyword lock currently points at.
    pub fn find_active(
        keyword_lock: &AccountInfo,
        raffle: &AccountInfo,
        machine: Pubkey,
    ) -> Result<(KeywordLock, Raffle)> {
        let lock: KeywordLock = load_account(keyword_lock, TicketError::RaffleNotFound)?;
        let raffle_id = lock.active_raffle_id()?;

        let raffle: Raffle = load_account(raffle, TicketError::RaffleNotFound)?;
        require_keys_eq!(raffle.machine, machine, TicketError::RaffleNotFound);
        require!(
            raffle.raffle_id == raffle_id && raffle.active,
            TicketError::RaffleNotFound
        );

        Ok((lock, raffle))
    }

    pub fn is_free(&self) -> bool {
        self.cost == 0
    }

    /// Validate an entry request against the raffle and the user's state.
    ///
    /// Free raffles always give exactly one entry and debit nothing, whatever was
    /// requested. Paid raffles default to the cost and debit what they enter.
    pub fn plan_entry(
        &self,
        balance: i64,
        already_entered: bool,
        requested: Option<u64>,
    ) -> Result<EntryPlan> {
        require!(self.active, TicketError::RaffleNotFound);
        require!(requested != Some(0), TicketError::InvalidEntryAmount);

        if self.is_free() {
            require!(!already_entered, TicketError::AlreadyEntered);
            return Ok(EntryPlan {
                entry_amount: 1,
                debit: 0,
            });
        }

        let entry_amount = requested.unwrap_or(self.cost);
        require!(entry_amount >= self.cost, TicketError::BelowMinimum);

        let spendable = u64::try_from(balance).unwrap_or(0);
        require!(entry_amount <= spendable, TicketError::InsufficientFunds);

        Ok(EntryPlan {
            entry_amount,
            debit: entry_amount,
        })
    }

    /// Count an accepted entry towards the public counters
    pub fn record_entry(&mut self, entry_amount: u64, new_entrant: bool) -> Result<()> {
        self.total_entries = crate::error::safe_add_u64(self.total_entries, entry_amount)?;
        if new_entrant {
            self.entrant_count = self
                .entrant_count
                .checked_add(1)
                .ok_or(TicketError::MathOverflow)?;
        }
        Ok(())
    }

    pub fn resolve(&mut self, now: i64) -> Result<()> {
        require!(self.active, TicketError::RaffleNotFound);
        self.active = false;
        self.resolved_at = now;
        Ok(())
    }

    pub fn is_fully_published(&self) -> bool {
        self.published_entries >= self.entrant_count
    }

    /// Count a batch of published entries; returns whether the pool is now complete
    pub fn record_published(&mut self, batch: u32) -> Result<bool> {
        require!(!self.active, TicketError::RaffleStillActive);
        let published = self
            .published_entries
            .checked_add(batch)
            .ok_or(TicketError::MathOverflow)?;
        require!(published <= self.entrant_count, TicketError::EntryAlreadyPublished);
        self.published_entries = published;
        Ok(self.is_fully_published())
    }
}

/// One user's stake in one raffle
#[account]
#[derive(InitSpace, Debug)]
pub struct RaffleEntry {
    pub raffle: Pubkey,
    pub user_id: u64,
    /// Weight on the number line
    pub entry_count: u64,
    pub entered_at: i64,
    /// Set once the entry went out in a RaffleEntriesPublished batch
    pub published: bool,
    pub bump: u8,
}

impl RaffleEntry {
    pub fn has_entered(&self) -> bool {
        self.entry_count > 0
    }

    /// Mark the entry as published; each entry goes out exactly once
    pub fn publish(&mut self) -> Result<()> {
        require!(!self.published, TicketError::EntryAlreadyPublished);
        self.published = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_account() -> TicketAccount {
        TicketAccount {
            machine: Pubkey::default(),
            user_id: 0,
            tickets: 0,
            created_at: 0,
            updated_at: 0,
            bump: 0,
        }
    }

    fn mock_raffle(cost: u64) -> Raffle {
        Raffle {
            machine: Pubkey::new_unique(),
            raffle_id: 0,
            keyword: "spring".to_string(),
            description: "spring".to_string(),
            cost,
            active: true,
            display: DisplayRef::default(),
            entrant_count: 0,
            total_entries: 0,
            created_at: 0,
            resolved_at: 0,
            published_entries: 0,
            bump: 0,
        }
    }

    fn mock_event(expiry: i64) -> AwardEvent {
        AwardEvent {
            machine: Pubkey::new_unique(),
            event_id: 0,
            ticket_value: DEFAULT_EVENT_VALUE,
            expiry,
            active: true,
            description: DEFAULT_EVENT_DESCRIPTION.to_string(),
            display: DisplayRef::default(),
            redemption_count: 0,
            created_at: 0,
            closed_at: 0,
            bump: 0,
        }
    }

    #[test]
    fn test_fresh_account_clamps_negative_delta_to_zero() {
        let mut account = fresh_account();
        assert!(!account.is_open());
        account.open(Pubkey::new_unique(), 7, 100, 255);
        assert!(account.is_open());

        assert_eq!(account.apply_delta(-5, DEFAULT_BALANCE_CAP, 100), 0);
    }

    #[test]
    fn test_fresh_account_takes_positive_delta() {
        let mut account = fresh_account();
        assert_eq!(account.apply_delta(10, DEFAULT_BALANCE_CAP, 100), 10);
        assert_eq!(account.updated_at, 100);
    }

    #[test]
    fn test_existing_account_never_goes_negative() {
        let mut account = fresh_account();
        account.apply_delta(5, DEFAULT_BALANCE_CAP, 0);
        assert_eq!(account.apply_delta(-10, DEFAULT_BALANCE_CAP, 0), 0);
    }

    #[test]
    fn test_balance_is_capped() {
        let mut account = fresh_account();
        account.set(DEFAULT_BALANCE_CAP - 1, 0);
        assert_eq!(account.apply_delta(5, DEFAULT_BALANCE_CAP, 0), DEFAULT_BALANCE_CAP);
        assert_eq!(account.apply_delta(i64::MAX, DEFAULT_BALANCE_CAP, 0), DEFAULT_BALANCE_CAP);

        // A smaller machine cap applies on the next adjustment
        assert_eq!(account.apply_delta(0, 50, 0), 50);
    }

    #[test]
    fn test_set_is_not_clamped() {
        let mut account = fresh_account();
        assert_eq!(account.set(i64::MAX, 0), i64::MAX);
        assert_eq!(account.set(-3, 0), -3);
    }

    #[test]
    fn test_debit_is_exact() {
        let mut account = fresh_account();
        account.set(10, 0);
        assert_eq!(account.debit(3, 0).unwrap(), 7);
        assert!(account.debit(8, 0).is_err());
        assert_eq!(account.tickets, 7);
    }

    #[test]
    fn test_balance_of_missing_account_is_zero() {
        assert_eq!(balance_of(None), 0);
        let mut account = fresh_account();
        account.set(12, 0);
        assert_eq!(balance_of(Some(&account)), 12);
    }

    #[test]
    fn test_free_raffle_gives_one_entry_regardless_of_amount() {
        let raffle = mock_raffle(0);

        let plan = raffle.plan_entry(0, false, Some(50)).unwrap();
        assert_eq!(plan, EntryPlan { entry_amount: 1, debit: 0 });

        assert_eq!(
            raffle.plan_entry(100, true, None).unwrap_err(),
            TicketError::AlreadyEntered.into()
        );
    }

    #[test]
    fn test_paid_raffle_defaults_to_cost() {
        let raffle = mock_raffle(3);
        let plan = raffle.plan_entry(10, false, None).unwrap();
        assert_eq!(plan, EntryPlan { entry_amount: 3, debit: 3 });
    }

    #[test]
    fn test_paid_raffle_rejections() {
        let raffle = mock_raffle(3);

        assert_eq!(
            raffle.plan_entry(10, false, Some(2)).unwrap_err(),
            TicketError::BelowMinimum.into()
        );
        assert_eq!(
            raffle.plan_entry(5, false, Some(6)).unwrap_err(),
            TicketError::InsufficientFunds.into()
        );
        assert_eq!(
            raffle.plan_entry(5, false, Some(0)).unwrap_err(),
            TicketError::InvalidEntryAmount.into()
        );
        // Exactly the balance is fine
        assert!(raffle.plan_entry(5, false, Some(5)).is_ok());
    }

    #[test]
    fn test_paid_raffle_accumulates_entries() {
        let mut raffle = mock_raffle(1);
        let mut entry = RaffleEntry {
            raffle: Pubkey::new_unique(),
            user_id: 1,
            entry_count: 0,
            entered_at: 0,
            published: false,
            bump: 0,
        };
        let mut account = fresh_account();
        account.set(10, 0);

        for requested in [3u64, 5] {
            let plan = raffle
                .plan_entry(account.tickets, entry.has_entered(), Some(requested))
                .unwrap();
            raffle.record_entry(plan.entry_amount, !entry.has_entered()).unwrap();
            entry.entry_count += plan.entry_amount;
            account.debit(plan.debit, 0).unwrap();
        }

        assert_eq!(entry.entry_count, 8);
        assert_eq!(account.tickets, 2);
        assert_eq!(raffle.total_entries, 8);
        assert_eq!(raffle.entrant_count, 1);
    }

    #[test]
    fn test_resolved_raffle_rejects_entries_and_second_resolve() {
        let mut raffle = mock_raffle(1);
        raffle.resolve(500).unwrap();
        assert!(!raffle.active);
        assert_eq!(raffle.resolved_at, 500);

        assert_eq!(
            raffle.plan_entry(10, false, None).unwrap_err(),
            TicketError::RaffleNotFound.into()
        );
        assert_eq!(raffle.resolve(600).unwrap_err(), TicketError::RaffleNotFound.into());
    }

    #[test]
    fn test_event_lazy_expiry() {
        let event = mock_event(1_000);
        assert!(event.check_redeemable(999).is_ok());
        assert_eq!(
            event.check_redeemable(1_000).unwrap_err(),
            TicketError::EventExpired.into()
        );
        assert!(event.is_sweepable(1_000));
        assert!(!event.is_sweepable(999));
    }

    #[test]
    fn test_event_closes_once() {
        let mut event = mock_event(1_000);
        event.close(10).unwrap();
        assert!(!event.active);
        assert_eq!(event.closed_at, 10);

        assert_eq!(event.close(20).unwrap_err(), TicketError::EventClosed.into());
        assert_eq!(event.check_redeemable(20).unwrap_err(), TicketError::EventClosed.into());
        assert!(!event.is_sweepable(2_000));
    }

    #[test]
    fn test_keyword_lock_released_is_not_found() {
        let mut lock = KeywordLock {
            machine: Pubkey::new_unique(),
            keyword: "spring".to_string(),
            raffle_id: 4,
            held: true,
            bump: 0,
        };
        assert_eq!(lock.active_raffle_id().unwrap(), 4);
        lock.held = false;
        assert_eq!(lock.active_raffle_id().unwrap_err(), TicketError::RaffleNotFound.into());
    }

    #[test]
    fn test_second_redemption_is_not_awarded() {
        let mut event = mock_event(1_000);
        event.ticket_value = 5;
        let mut account = fresh_account();
        account.set(2, 0);

        let first = event.redeem(&mut account, false, DEFAULT_BALANCE_CAP, 100).unwrap();
        assert_eq!(first, RedeemOutcome { awarded: true, new_balance: 7 });
        assert_eq!(event.redemption_count, 1);

        // The participation record now exists
        let second = event.redeem(&mut account, true, DEFAULT_BALANCE_CAP, 200).unwrap();
        assert_eq!(second, RedeemOutcome { awarded: false, new_balance: 7 });
        assert_eq!(account.tickets, 7);
        assert_eq!(event.redemption_count, 1);
    }

    #[test]
    fn test_redemption_credit_is_capped() {
        let mut event = mock_event(1_000);
        event.ticket_value = 10;
        let mut account = fresh_account();
        account.set(45, 0);

        let outcome = event.redeem(&mut account, false, 50, 0).unwrap();
        assert_eq!(outcome.new_balance, 50);
    }

    #[test]
    fn test_lapsed_or_closed_event_rejects_repeat_claims() {
        let mut event = mock_event(1_000);
        let mut account = fresh_account();
        event.redeem(&mut account, false, DEFAULT_BALANCE_CAP, 10).unwrap();

        // Past expiry the event is gone, even for a user who already claimed it
        assert_eq!(
            event.redeem(&mut account, true, DEFAULT_BALANCE_CAP, 1_000).unwrap_err(),
            TicketError::EventExpired.into()
        );
        assert_eq!(
            event.redeem(&mut account, false, DEFAULT_BALANCE_CAP, 1_000).unwrap_err(),
            TicketError::EventExpired.into()
        );

        event.close(20).unwrap();
        assert_eq!(
            event.redeem(&mut account, true, DEFAULT_BALANCE_CAP, 30).unwrap_err(),
            TicketError::EventClosed.into()
        );
        assert_eq!(account.tickets, DEFAULT_EVENT_VALUE as i64);
        assert_eq!(event.redemption_count, 1);
    }

    #[test]
    fn test_keyword_reused_after_resolution() {
        let machine = Pubkey::new_unique();
        let mut lock = KeywordLock {
            machine: Pubkey::default(),
            keyword: String::new(),
            raffle_id: 0,
            held: false,
            bump: 0,
        };

        lock.claim(machine, "Spring", 3, 254).unwrap();
        assert_eq!(lock.machine, machine);
        assert_eq!(lock.keyword, "Spring");
        assert_eq!(lock.bump, 254);
        assert_eq!(lock.active_raffle_id().unwrap(), 3);

        // Another raffle cannot take the keyword while the first is open
        assert_eq!(
            lock.claim(machine, "spring", 4, 254).unwrap_err(),
            TicketError::KeywordInUse.into()
        );
        assert_eq!(lock.active_raffle_id().unwrap(), 3);

        lock.release();
        assert_eq!(lock.active_raffle_id().unwrap_err(), TicketError::RaffleNotFound.into());

        lock.claim(machine, "spring", 4, 254).unwrap();
        assert_eq!(lock.active_raffle_id().unwrap(), 4);
        assert_eq!(lock.keyword, "Spring");
    }

    #[test]
    fn test_large_raffle_publishes_in_batches() {
        let mut raffle = mock_raffle(0);
        for _ in 0..200u32 {
            let plan = raffle.plan_entry(0, false, None).unwrap();
            raffle.record_entry(plan.entry_amount, true).unwrap();
        }
        assert_eq!(raffle.entrant_count, 200);

        assert_eq!(
            raffle.record_published(25).unwrap_err(),
            TicketError::RaffleStillActive.into()
        );

        raffle.resolve(100).unwrap();
        assert!(!raffle.is_fully_published());

        let mut batches = 0;
        while !raffle.record_published(25).unwrap() {
            batches += 1;
        }
        assert_eq!(batches, 7);
        assert_eq!(raffle.published_entries, 200);
        assert!(raffle.is_fully_published());

        // The pool is closed once every entrant went out
        assert_eq!(
            raffle.record_published(1).unwrap_err(),
            TicketError::EntryAlreadyPublished.into()
        );
        assert!(raffle.record_published(0).unwrap());
    }

    #[test]
    fn test_empty_raffle_is_published_on_resolve() {
        let mut raffle = mock_raffle(1);
        raffle.resolve(0).unwrap();
        assert!(raffle.is_fully_published());
        assert!(raffle.record_published(0).unwrap());
    }

    #[test]
    fn test_entry_publishes_once() {
        let mut entry = RaffleEntry {
            raffle: Pubkey::new_unique(),
            user_id: 1,
            entry_count: 2,
            entered_at: 0,
            published: false,
            bump: 0,
        };
        entry.publish().unwrap();
        assert_eq!(entry.publish().unwrap_err(), TicketError::EntryAlreadyPublished.into());
    }

    #[test]
    fn test_load_account_reports_missing_rows() {
        let key = Pubkey::new_unique();
        let program = crate::ID;
        let system = Pubkey::default();

        // Never created: system-owned and empty
        let mut lamports = 0u64;
        let mut empty: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut empty, &system, false, 0);
        assert_eq!(
            load_account::<KeywordLock>(&info, TicketError::RaffleNotFound).unwrap_err(),
            TicketError::RaffleNotFound.into()
        );
        assert!(load_optional::<TicketAccount>(&info).unwrap().is_none());

        // Written by this program
        let mut stored = fresh_account();
        stored.set(9, 0);
        let mut data = Vec::new();
        stored.try_serialize(&mut data).unwrap();
        let mut lamports = 0u64;
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program, false, 0);

        let loaded: TicketAccount = load_optional(&info).unwrap().unwrap();
        assert_eq!(balance_of(Some(&loaded)), 9);

        let mut updated = loaded;
        updated.set(4, 0);
        store_account(&updated, &info).unwrap();
        let reloaded: TicketAccount = load_account(&info, TicketError::InvalidEventAccount).unwrap();
        assert_eq!(reloaded.tickets, 4);
    }

    #[test]
    fn test_machine_hands_out_sequential_ids() {
        let mut machine = Machine {
            authority: Pubkey::new_unique(),
            balance_cap: DEFAULT_BALANCE_CAP,
            next_raffle_id: 0,
            next_event_id: 0,
            created_at: 0,
            bump: 0,
        };
        assert_eq!(machine.take_raffle_id().unwrap(), 0);
        assert_eq!(machine.take_raffle_id().unwrap(), 1);
        assert_eq!(machine.take_event_id().unwrap(), 0);
        assert_eq!(machine.next_raffle_id, 2);
    }
}
