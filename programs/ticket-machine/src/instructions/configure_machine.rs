use anchor_lang::prelude::*;

use crate::{constants::*, error::TicketError, state::Machine};

#[derive(Accounts)]
pub struct ConfigureMachine<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,
}

impl<'info> ConfigureMachine<'info> {
    /// Change the balance ceiling. Existing balances are left as they are;
    /// the new cap applies from their next adjustment.
    pub fn configure_machine(&mut self, balance_cap: i64) -> Result<()> {
        if !is_valid_balance_cap(balance_cap) {
            return Err(crate::error::reject(
                TicketError::InvalidBalanceCap,
                "configure_machine",
            ));
        }

        let previous = self.machine.balance_cap;
        self.machine.balance_cap = balance_cap;

        msg!(
            "MACHINE EVENT: balance_cap {} -> {}",
            previous,
            balance_cap
        );

        Ok(())
    }
}
