use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::BalanceSet,
    state::{Machine, TicketAccount},
};

/// Overwrite a user's balance. Moderator tool, so no clamping.
#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct SetBalance<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

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

impl<'info> SetBalance<'info> {
    pub fn set_balance(
        &mut self,
        user_id: u64,
        value: i64,
        bumps: &SetBalanceBumps,
    ) -> Result<i64> {
        let now = Clock::get()?.unix_timestamp;

        self.ticket_account
            .ensure_open(self.machine.key(), user_id, now, bumps.ticket_account);
        let new_balance = self.ticket_account.set(value, now);

        msg!("BALANCE EVENT: user={}, set to {}", user_id, new_balance);
        emit!(BalanceSet {
            user_id,
            new_balance,
            timestamp: now,
        });

        Ok(new_balance)
    }
}
