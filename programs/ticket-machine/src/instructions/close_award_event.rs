use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::AwardEventClosed,
    state::{load_account, store_account, AwardEvent, Machine},
};

/// Close an award event before it expires
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct CloseAwardEvent<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// CHECK: loaded in the handler so a missing event is reported as EventNotFound
    #[account(
        mut,
        seeds = [EVENT_SEED, machine.key().as_ref(), event_id.to_le_bytes().as_ref()],
        bump
    )]
    pub award_event: UncheckedAccount<'info>,
}

impl<'info> CloseAwardEvent<'info> {
    pub fn close_award_event(&mut self, event_id: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let event_info = self.award_event.to_account_info();

        let mut event: AwardEvent = load_account(&event_info, TicketError::EventNotFound)?;
        require_keys_eq!(event.machine, self.machine.key(), TicketError::EventNotFound);

        let expired = event.is_expired(now);
        event.close(now)?;
        store_account(&event, &event_info)?;

        msg!(
            "AWARD EVENT: closed event_id={}, redemptions={}",
            event_id,
            event.redemption_count
        );
        emit!(AwardEventClosed {
            event_id,
            display: event.display,
            expired,
            timestamp: now,
        });

        Ok(())
    }
}
