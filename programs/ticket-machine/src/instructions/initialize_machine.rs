use anchor_lang::prelude::*;

use crate::{constants::*, error::TicketError, state::Machine};

/// Create the configuration row for a bot deployment
/// The signing authority becomes the only key allowed to mutate the machine
#[derive(Accounts)]
pub struct InitializeMachine<'info> {
    /// The bot key; pays for every account the machine creates
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Machine PDA: ["machine", authority.key()]
    #[account(
        init,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + Machine::INIT_SPACE,
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump
    )]
    pub machine: Account<'info, Machine>,

    pub system_program: Program<'info, System>,
}

impl<'info> InitializeMachine<'info> {
    pub fn initialize_machine(
        &mut self,
        balance_cap: Option<i64>,
        bumps: &InitializeMachineBumps,
    ) -> Result<()> {
        let balance_cap = balance_cap.unwrap_or(DEFAULT_BALANCE_CAP);
        if !is_valid_balance_cap(balance_cap) {
            return Err(crate::error::reject(
                TicketError::InvalidBalanceCap,
                "initialize_machine",
            ));
        }

        self.machine.set_inner(Machine {
            authority: self.authority.key(),
            balance_cap,
            next_raffle_id: 0,
            next_event_id: 0,
            created_at: Clock::get()?.unix_timestamp,
            bump: bumps.machine,
        });

        msg!(
            "MACHINE EVENT: initialized machine={}, authority={}, balance_cap={}",
            self.machine.key(),
            self.authority.key(),
            balance_cap
        );

        Ok(())
    }
}
