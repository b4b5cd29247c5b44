use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::RaffleResolved,
    state::{store_account, Machine, Raffle},
};

/// Close a raffle and free its keyword
///
/// This is a single fixed-size step, so any raffle can always be resolved
/// however many entrants it has. The entry pool goes out afterwards through
/// `publish_entries`, in as many batches as it takes.
#[derive(Accounts)]
#[instruction(keyword: String)]
pub struct ResolveRaffle<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// CHECK: absent when no raffle ever used the keyword; loaded in the handler
    #[account(
        mut,
        seeds = [KEYWORD_SEED, machine.key().as_ref(), keyword_seed(&keyword).as_ref()],
        bump
    )]
    pub keyword_lock: UncheckedAccount<'info>,

    /// CHECK: must be the raffle the keyword lock points at, checked in the handler
    #[account(mut)]
    pub raffle: UncheckedAccount<'info>,
}

/// What the chat layer needs to start publishing the pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleSummary {
    pub raffle_id: u64,
    pub entrant_count: u32,
    pub total_entries: u64,
}

impl<'info> ResolveRaffle<'info> {
    pub fn resolve_raffle(&mut self, keyword: String) -> Result<RaffleSummary> {
        let now = Clock::get()?.unix_timestamp;
        let lock_info = self.keyword_lock.to_account_info();
        let raffle_info = self.raffle.to_account_info();

        let (mut lock, mut raffle) =
            Raffle::find_active(&lock_info, &raffle_info, self.machine.key())?;

        raffle.resolve(now)?;
        lock.release();
        store_account(&raffle, &raffle_info)?;
        store_account(&lock, &lock_info)?;

        msg!(
            "RAFFLE EVENT: resolved raffle_id={}, keyword='{}', entrants={}, total_entries={}",
            raffle.raffle_id,
            keyword,
            raffle.entrant_count,
            raffle.total_entries
        );
        if raffle.entrant_count == 0 {
            msg!("Raffle {} closed with no participants", raffle.raffle_id);
        }

        emit!(RaffleResolved {
            raffle_id: raffle.raffle_id,
            keyword: raffle.keyword.clone(),
            entrant_count: raffle.entrant_count,
            total_entries: raffle.total_entries,
            display: raffle.display,
            timestamp: now,
        });

        Ok(RaffleSummary {
            raffle_id: raffle.raffle_id,
            entrant_count: raffle.entrant_count,
            total_entries: raffle.total_entries,
        })
    }
}
