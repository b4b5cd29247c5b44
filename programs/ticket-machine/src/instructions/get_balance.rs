use anchor_lang::prelude::*;

use crate::{
    constants::*,
    state::{balance_of, load_optional, Machine, TicketAccount},
};

/// Read-only balance lookup, meant to be simulated rather than sent.
/// A user who was never credited reads as 0 and no account is created.
#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct GetBalance<'info> {
    #[account(
        seeds = [MACHINE_SEED, machine.authority.as_ref()],
        bump = machine.bump,
    )]
    pub machine: Account<'info, Machine>,

    /// CHECK: may not exist yet; the address is pinned by the seeds and the
    /// data is only read through TicketAccount deserialization
    #[account(
        seeds = [ACCOUNT_SEED, machine.key().as_ref(), user_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket_account: UncheckedAccount<'info>,
}

impl<'info> GetBalance<'info> {
    pub fn get_balance(&self, user_id: u64) -> Result<i64> {
        let account: Option<TicketAccount> =
            load_optional(&self.ticket_account.to_account_info())?;
        let balance = balance_of(account.as_ref());

        msg!("Balance of user {}: {}", user_id, balance);

        Ok(balance)
    }
}
