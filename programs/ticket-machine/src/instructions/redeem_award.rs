use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::AwardRedeemed,
    state::{
        load_account, store_account, AwardEvent, EventParticipation, Machine, RedeemOutcome,
        TicketAccount,
    },
};

/// Claim an award event for a user, at most once per (event, user)
///
/// The participation record and the credit are written by the same
/// instruction, so either both land or neither does.
#[derive(Accounts)]
#[instruction(user_id: u64, event_id: u64)]
pub struct RedeemAward<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// CHECK: the event may not exist; loaded in the handler so a missing
    /// event is reported as EventNotFound
    #[account(
        mut,
        seeds = [EVENT_SEED, machine.key().as_ref(), event_id.to_le_bytes().as_ref()],
        bump
    )]
    pub award_event: UncheckedAccount<'info>,

    /// Participation PDA: ["participation", award_event.key(), user_id]
    /// Already populated means the user has claimed this event
    #[account(
        init_if_needed,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + EventParticipation::INIT_SPACE,
        seeds = [PARTICIPATION_SEED, award_event.key().as_ref(), user_id.to_le_bytes().as_ref()],
        bump
    )]
    pub participation: Account<'info, EventParticipation>,

    #[account(
        init_if_needed,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + TicketAccount::INIT_SPACE,
        seeds = [ACCOUNT_SEED, machine.key().as_ref(), user_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket_account: Account<'info, TicketAccount>,

    pub system_program: Program<'info, System>,
}

impl<'info> RedeemAward<'info> {
    pub fn redeem_award(
        &mut self,
        user_id: u64,
        event_id: u64,
        bumps: &RedeemAwardBumps,
    ) -> Result<RedeemOutcome> {
        let now = Clock::get()?.unix_timestamp;
        let event_info = self.award_event.to_account_info();

        let mut event: AwardEvent = load_account(&event_info, TicketError::EventNotFound)?;
        require_keys_eq!(event.machine, self.machine.key(), TicketError::EventNotFound);

        self.ticket_account
            .ensure_open(self.machine.key(), user_id, now, bumps.ticket_account);

        let already_recorded = self.participation.is_recorded();
        let outcome = event.redeem(
            &mut self.ticket_account,
            already_recorded,
            self.machine.balance_cap,
            now,
        )?;

        if !outcome.awarded {
            msg!("User {} already redeemed event {}", user_id, event_id);
            return Ok(outcome);
        }

        self.participation.set_inner(EventParticipation {
            award_event: *event_info.key,
            user_id,
            tickets_awarded: event.ticket_value,
            redeemed_at: now,
            bump: bumps.participation,
        });
        store_account(&event, &event_info)?;

        msg!(
            "AWARD EVENT: user={} redeemed event_id={}, +{} tickets, new_balance={}",
            user_id,
            event_id,
            event.ticket_value,
            outcome.new_balance
        );
        emit!(AwardRedeemed {
            event_id,
            user_id,
            tickets_awarded: event.ticket_value,
            new_balance: outcome.new_balance,
            timestamp: now,
        });

        Ok(outcome)
    }
}
