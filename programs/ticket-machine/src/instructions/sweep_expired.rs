use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::{reject, TicketError},
    events::AwardEventClosed,
    state::{load_account, store_account, AwardEvent, DisplayRef, Machine},
};

/// Close every passed-in event whose expiry has gone by
///
/// The events travel as writable remaining accounts, at most
/// `MAX_SWEEP_BATCH` per call. Open events and events that are already closed
/// are skipped, so the caller can hand over its whole watch list on every tick.
#[derive(Accounts)]
pub struct SweepExpired<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,
}

/// An event closed by a sweep, with the message the chat layer should take down
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweptEvent {
    pub event_id: u64,
    pub display: DisplayRef,
}

impl<'info> SweepExpired<'info> {
    pub fn sweep_expired(&mut self, events: &[AccountInfo<'info>]) -> Result<Vec<SweptEvent>> {
        let now = Clock::get()?.unix_timestamp;

        let swept = sweep_batch(self.machine.key(), now, events)?;

        for event in &swept {
            emit!(AwardEventClosed {
                event_id: event.event_id,
                display: event.display,
                expired: true,
                timestamp: now,
            });
        }

        msg!(
            "AWARD EVENT: sweep closed {} of {} events",
            swept.len(),
            events.len()
        );

        Ok(swept)
    }
}

/// Close the lapsed events among `events` and report them
fn sweep_batch(machine: Pubkey, now: i64, events: &[AccountInfo]) -> Result<Vec<SweptEvent>> {
    if events.len() > MAX_SWEEP_BATCH {
        return Err(reject(TicketError::SweepBatchTooLarge, "sweep_expired"));
    }

    let mut swept = Vec::new();
    for info in events {
        if !info.is_writable {
            return Err(reject(TicketError::InvalidEventAccount, "sweep_expired"));
        }

        let mut event: AwardEvent = load_account(info, TicketError::InvalidEventAccount)?;
        require_keys_eq!(event.machine, machine, TicketError::InvalidEventAccount);

        if !event.is_sweepable(now) {
            continue;
        }

        event.close(now)?;
        store_account(&event, info)?;
        swept.push(SweptEvent {
            event_id: event.event_id,
            display: event.display,
        });
    }

    Ok(swept)
}
