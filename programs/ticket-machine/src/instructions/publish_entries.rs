use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::{reject, TicketError},
    events::RaffleEntriesPublished,
    selection::EntryWeight,
    state::{load_account, store_account, Machine, Raffle, RaffleEntry},
};

/// Publish a batch of a resolved raffle's entries
///
/// Entry accounts travel as writable remaining accounts. Each entry is marked
/// when it goes out and the raffle counts them, so once `published_entries`
/// reaches `entrant_count` the batches together are exactly the whole pool.
#[derive(Accounts)]
#[instruction(raffle_id: u64)]
pub struct PublishEntries<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// Raffle PDA: ["raffle", machine.key(), raffle_id]
    #[account(
        mut,
        seeds = [RAFFLE_SEED, machine.key().as_ref(), raffle_id.to_le_bytes().as_ref()],
        bump = raffle.bump,
        has_one = machine @ TicketError::RaffleNotFound,
    )]
    pub raffle: Account<'info, Raffle>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishProgress {
    pub published_entries: u32,
    pub entrant_count: u32,
    pub complete: bool,
}

impl<'info> PublishEntries<'info> {
    pub fn publish_entries(&mut self, entry_accounts: &[AccountInfo<'info>]) -> Result<PublishProgress> {
        if self.raffle.active {
            return Err(reject(TicketError::RaffleStillActive, "publish_entries"));
        }

        let entries = publish_batch(self.raffle.key(), entry_accounts)?;
        let complete = self.raffle.record_published(entries.len() as u32)?;

        msg!(
            "RAFFLE EVENT: published {} entries of raffle_id={} ({}/{})",
            entries.len(),
            self.raffle.raffle_id,
            self.raffle.published_entries,
            self.raffle.entrant_count
        );

        emit!(RaffleEntriesPublished {
            raffle_id: self.raffle.raffle_id,
            entries,
            published_entries: self.raffle.published_entries,
            entrant_count: self.raffle.entrant_count,
            complete,
        });

        Ok(PublishProgress {
            published_entries: self.raffle.published_entries,
            entrant_count: self.raffle.entrant_count,
            complete,
        })
    }
}

/// Load, check and mark one batch of entry accounts
fn publish_batch(raffle: Pubkey, entry_accounts: &[AccountInfo]) -> Result<Vec<EntryWeight>> {
    let mut keys: Vec<Pubkey> = entry_accounts.iter().map(|info| *info.key).collect();
    keys.sort_unstable();
    if keys.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(reject(TicketError::DuplicateEntryAccount, "publish_entries"));
    }

    entry_accounts
        .iter()
        .map(|info| -> Result<EntryWeight> {
            require!(info.is_writable, TicketError::InvalidEntryAccount);
            let mut entry: RaffleEntry = load_account(info, TicketError::InvalidEntryAccount)?;
            require_keys_eq!(entry.raffle, raffle, TicketError::InvalidEntryAccount);
            entry.publish()?;
            store_account(&entry, info)?;
            Ok(EntryWeight {
                user_id: entry.user_id,
                entry_count: entry.entry_count,
            })
        })
        .collect()
}
