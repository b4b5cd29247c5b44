use anchor_lang::prelude::*;

// Import our modules
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod selection;
pub mod state;

// Import instruction handlers
use instructions::*;
use state::{DisplayRef, RedeemOutcome};

declare_id!("DtoHgH75XHsaSdsZ4VnHrYiRkL3L9YCzfvqVaCvq21Jh");

#[program]
pub mod ticket_machine {
    use super::*;

    /// Create the machine for the signing bot key
    /// `balance_cap` defaults to i32::MAX
    pub fn initialize_machine(
        ctx: Context<InitializeMachine>,
        balance_cap: Option<i64>,
    ) -> Result<()> {
        ctx.accounts.initialize_machine(balance_cap, &ctx.bumps)
    }

    /// Change the ceiling balances are clamped to
    pub fn configure_machine(ctx: Context<ConfigureMachine>, balance_cap: i64) -> Result<()> {
        ctx.accounts.configure_machine(balance_cap)
    }

    /// Read a user's balance; 0 for users never credited
    pub fn get_balance(ctx: Context<GetBalance>, user_id: u64) -> Result<i64> {
        ctx.accounts.get_balance(user_id)
    }

    /// Add a signed delta to a user's balance, clamped into [0, balance_cap]
    pub fn adjust_balance(ctx: Context<AdjustBalance>, user_id: u64, delta: i64) -> Result<i64> {
        ctx.accounts.adjust_balance(user_id, delta, &ctx.bumps)
    }

    /// Overwrite a user's balance without clamping
    pub fn set_balance(ctx: Context<SetBalance>, user_id: u64, value: i64) -> Result<i64> {
        ctx.accounts.set_balance(user_id, value, &ctx.bumps)
    }

    /// Open a click-to-claim award event and return its id
    pub fn create_award_event(
        ctx: Context<CreateAwardEvent>,
        ticket_value: Option<u64>,
        duration_minutes: Option<u32>,
        description: Option<String>,
        display: DisplayRef,
    ) -> Result<u64> {
        ctx.accounts.create_award_event(
            ticket_value,
            duration_minutes,
            description,
            display,
            &ctx.bumps,
        )
    }

    /// Claim an award event for a user; a repeat claim is not awarded
    pub fn redeem_award(
        ctx: Context<RedeemAward>,
        user_id: u64,
        event_id: u64,
    ) -> Result<RedeemOutcome> {
        ctx.accounts.redeem_award(user_id, event_id, &ctx.bumps)
    }

    /// Close an award event before it expires
    pub fn close_award_event(ctx: Context<CloseAwardEvent>, event_id: u64) -> Result<()> {
        ctx.accounts.close_award_event(event_id)
    }

    /// Close every expired event passed as a remaining account
    /// Returns the closed events so their messages can be taken down
    pub fn sweep_expired<'info>(
        ctx: Context<'_, '_, '_, 'info, SweepExpired<'info>>,
    ) -> Result<Vec<SweptEvent>> {
        ctx.accounts.sweep_expired(ctx.remaining_accounts)
    }

    /// Open a raffle under a keyword that no active raffle holds
    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        keyword: String,
        cost: Option<u64>,
        description: Option<String>,
        display: DisplayRef,
    ) -> Result<u64> {
        ctx.accounts
            .create_raffle(keyword, cost, description, display, &ctx.bumps)
    }

    /// Buy into the active raffle for a keyword
    pub fn enter_raffle(
        ctx: Context<EnterRaffle>,
        keyword: String,
        user_id: u64,
        requested_amount: Option<u64>,
    ) -> Result<EntryReceipt> {
        ctx.accounts
            .enter_raffle(keyword, user_id, requested_amount, &ctx.bumps)
    }

    /// Close the active raffle for a keyword and free the keyword
    pub fn resolve_raffle(ctx: Context<ResolveRaffle>, keyword: String) -> Result<RaffleSummary> {
        ctx.accounts.resolve_raffle(keyword)
    }

    /// Publish a batch of a resolved raffle's entries
    /// Entry accounts go in the remaining accounts, any number of calls per raffle
    pub fn publish_entries<'info>(
        ctx: Context<'_, '_, '_, 'info, PublishEntries<'info>>,
        _raffle_id: u64,
    ) -> Result<PublishProgress> {
        ctx.accounts.publish_entries(ctx.remaining_accounts)
    }
}
