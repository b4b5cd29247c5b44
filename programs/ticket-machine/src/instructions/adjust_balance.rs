use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::BalanceAdjusted,
    state::{Machine, TicketAccount},
};

/// Add a signed delta to a user's balance, clamped into [0, balance_cap]
#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct AdjustBalance<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// Balance row PDA: ["tickets", machine.key(), user_id]
    /// Created on first adjustment
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

impl<'info> AdjustBalance<'info> {
    pub fn adjust_balance(
        &mut self,
        user_id: u64,
        delta: i64,
        bumps: &AdjustBalanceBumps,
    ) -> Result<i64> {
        let now = Clock::get()?.unix_timestamp;

        self.ticket_account
            .ensure_open(self.machine.key(), user_id, now, bumps.ticket_account);
        let new_balance = self
            .ticket_account
            .apply_delta(delta, self.machine.balance_cap, now);

        msg!(
            "BALANCE EVENT: user={}, delta={}, new_balance={}",
            user_id,
            delta,
            new_balance
        );
        emit!(BalanceAdjusted {
            user_id,
            delta,
            new_balance,
            timestamp: now,
        });

        Ok(new_balance)
    }
}
