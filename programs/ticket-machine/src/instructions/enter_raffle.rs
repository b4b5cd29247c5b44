use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::TicketError,
    events::RaffleEntered,
    state::{store_account, DisplayRef, Machine, Raffle, RaffleEntry, TicketAccount},
};

/// Buy into the active raffle for a keyword
#[derive(Accounts)]
#[instruction(keyword: String, user_id: u64)]
pub struct EnterRaffle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// CHECK: absent when no raffle ever used the keyword; loaded in the handler
    #[account(
        seeds = [KEYWORD_SEED, machine.key().as_ref(), keyword_seed(&keyword).as_ref()],
        bump
    )]
    pub keyword_lock: UncheckedAccount<'info>,

    /// CHECK: must be the raffle the keyword lock points at, checked in the handler
    #[account(mut)]
    pub raffle: UncheckedAccount<'info>,

    /// Entry PDA: ["entry", raffle.key(), user_id]
    #[account(
        init_if_needed,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + RaffleEntry::INIT_SPACE,
        seeds = [ENTRY_SEED, raffle.key().as_ref(), user_id.to_le_bytes().as_ref()],
        bump
    )]
    pub entry: Account<'info, RaffleEntry>,

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

/// What the chat layer needs to confirm an entry and bump the public counter
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryReceipt {
    pub new_balance: i64,
    pub entry_amount: u64,
    pub total_entries: u64,
    pub display: DisplayRef,
}

impl<'info> EnterRaffle<'info> {
    pub fn enter_raffle(
        &mut self,
        keyword: String,
        user_id: u64,
        requested_amount: Option<u64>,
        bumps: &EnterRaffleBumps,
    ) -> Result<EntryReceipt> {
        let now = Clock::get()?.unix_timestamp;
        let raffle_info = self.raffle.to_account_info();

        let (_, mut raffle) = Raffle::find_active(
            &self.keyword_lock.to_account_info(),
            &raffle_info,
            self.machine.key(),
        )?;

        self.ticket_account
            .ensure_open(self.machine.key(), user_id, now, bumps.ticket_account);

        let new_entrant = !self.entry.has_entered();
        let plan = raffle
            .plan_entry(self.ticket_account.tickets, !new_entrant, requested_amount)
            .map_err(|err| {
                msg!(
                    "Entry rejected: user={}, keyword='{}', requested={:?}, balance={}",
                    user_id,
                    keyword,
                    requested_amount,
                    self.ticket_account.tickets
                );
                err
            })?;

        if new_entrant {
            self.entry.set_inner(RaffleEntry {
                raffle: *raffle_info.key,
                user_id,
                entry_count: 0,
                entered_at: now,
                published: false,
                bump: bumps.entry,
            });
        }
        self.entry.entry_count = crate::error::safe_add_u64(self.entry.entry_count, plan.entry_amount)?;
        self.entry.entered_at = now;

        let new_balance = if plan.debit > 0 {
            self.ticket_account.debit(plan.debit, now)?
        } else {
            self.ticket_account.tickets
        };

        raffle.record_entry(plan.entry_amount, new_entrant)?;
        store_account(&raffle, &raffle_info)?;

        msg!(
            "RAFFLE EVENT: user={} entered raffle_id={} with {} (now {}), debited {}, total_entries={}",
            user_id,
            raffle.raffle_id,
            plan.entry_amount,
            self.entry.entry_count,
            plan.debit,
            raffle.total_entries
        );
        emit!(RaffleEntered {
            raffle_id: raffle.raffle_id,
            user_id,
            entry_amount: plan.entry_amount,
            new_balance,
            total_entries: raffle.total_entries,
            display: raffle.display,
        });

        Ok(EntryReceipt {
            new_balance,
            entry_amount: plan.entry_amount,
            total_entries: raffle.total_entries,
            display: raffle.display,
        })
    }
}
