use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::{reject, to_ledger_amount, TicketError},
    events::AwardEventCreated,
    state::{AwardEvent, DisplayRef, Machine},
};

/// Open a time-limited click-to-claim grant
///
/// Defaults when the caller leaves a field out:
/// 1. ticket_value = 1
/// 2. duration = 1440 minutes (one day), at most 10080 (seven days)
/// 3. description = "A pile of tickets lies on the ground."
#[derive(Accounts)]
pub struct CreateAwardEvent<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// Event PDA: ["award_event", machine.key(), next_event_id]
    #[account(
        init,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + AwardEvent::INIT_SPACE,
        seeds = [EVENT_SEED, machine.key().as_ref(), machine.next_event_id.to_le_bytes().as_ref()],
        bump
    )]
    pub award_event: Account<'info, AwardEvent>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateAwardEvent<'info> {
    pub fn create_award_event(
        &mut self,
        ticket_value: Option<u64>,
        duration_minutes: Option<u32>,
        description: Option<String>,
        display: DisplayRef,
        bumps: &CreateAwardEventBumps,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;

        let ticket_value = ticket_value.unwrap_or(DEFAULT_EVENT_VALUE);
        let duration_minutes = duration_minutes.unwrap_or(DEFAULT_EVENT_DURATION_MINUTES);
        let description = description.unwrap_or_else(|| DEFAULT_EVENT_DESCRIPTION.to_string());

        // Credits go through the signed ledger
        to_ledger_amount(ticket_value)?;

        if !is_valid_event_duration(duration_minutes) {
            return Err(reject(TicketError::InvalidEventDuration, "create_award_event"));
        }
        if !is_valid_description(&description) {
            return Err(reject(TicketError::DescriptionTooLong, "create_award_event"));
        }

        let expiry = event_expiry(now, duration_minutes).ok_or(TicketError::MathOverflow)?;
        let event_id = self.machine.take_event_id()?;

        self.award_event.set_inner(AwardEvent {
            machine: self.machine.key(),
            event_id,
            ticket_value,
            expiry,
            active: true,
            description,
            display,
            redemption_count: 0,
            created_at: now,
            closed_at: 0,
            bump: bumps.award_event,
        });

        msg!(
            "AWARD EVENT: created event_id={}, value={}, expiry={}",
            event_id,
            ticket_value,
            expiry
        );
        emit!(AwardEventCreated {
            event_id,
            ticket_value,
            expiry,
            display,
        });

        Ok(event_id)
    }
}
