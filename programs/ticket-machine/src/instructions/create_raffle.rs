use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::{reject, to_ledger_amount, TicketError},
    events::RaffleCreated,
    state::{DisplayRef, KeywordLock, Machine, Raffle},
};

/// Open a raffle under a keyword
///
/// The keyword lock is shared by every raffle that ever used the keyword and
/// is held only while one of them is active, which keeps keywords unique
/// among active raffles while letting resolved keywords be reused.
#[derive(Accounts)]
#[instruction(keyword: String)]
pub struct CreateRaffle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [MACHINE_SEED, authority.key().as_ref()],
        bump = machine.bump,
        has_one = authority @ TicketError::Unauthorized,
    )]
    pub machine: Account<'info, Machine>,

    /// Keyword lock PDA: ["keyword", machine.key(), keyword_seed(keyword)]
    #[account(
        init_if_needed,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + KeywordLock::INIT_SPACE,
        seeds = [KEYWORD_SEED, machine.key().as_ref(), keyword_seed(&keyword).as_ref()],
        bump
    )]
    pub keyword_lock: Account<'info, KeywordLock>,

    /// Raffle PDA: ["raffle", machine.key(), next_raffle_id]
    #[account(
        init,
        payer = authority,
        space = ANCHOR_DISCRIMINATOR + Raffle::INIT_SPACE,
        seeds = [RAFFLE_SEED, machine.key().as_ref(), machine.next_raffle_id.to_le_bytes().as_ref()],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateRaffle<'info> {
    pub fn create_raffle(
        &mut self,
        keyword: String,
        cost: Option<u64>,
        description: Option<String>,
        display: DisplayRef,
        bumps: &CreateRaffleBumps,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let cost = cost.unwrap_or(DEFAULT_RAFFLE_COST);
        let description = description.unwrap_or_else(|| keyword.clone());

        self.validate_inputs(&keyword, &description, cost)?;

        if self.keyword_lock.held {
            msg!(
                "Keyword '{}' is held by raffle {}",
                keyword,
                self.keyword_lock.raffle_id
            );
            return Err(reject(TicketError::KeywordInUse, "create_raffle"));
        }

        let raffle_id = self.machine.take_raffle_id()?;
        let machine = self.machine.key();
        self.keyword_lock
            .claim(machine, &keyword, raffle_id, bumps.keyword_lock)?;

        self.raffle.set_inner(Raffle {
            machine: self.machine.key(),
            raffle_id,
            keyword: keyword.clone(),
            description,
            cost,
            active: true,
            display,
            entrant_count: 0,
            total_entries: 0,
            created_at: now,
            resolved_at: 0,
            published_entries: 0,
            bump: bumps.raffle,
        });

        msg!(
            "RAFFLE EVENT: created raffle_id={}, keyword='{}', cost={}{}",
            raffle_id,
            keyword,
            cost,
            if cost == 0 { " (free)" } else { "" }
        );
        emit!(RaffleCreated {
            raffle_id,
            keyword,
            cost,
            display,
        });

        Ok(raffle_id)
    }

    fn validate_inputs(&self, keyword: &str, description: &str, cost: u64) -> Result<()> {
        if keyword.trim().is_empty() {
            return Err(reject(TicketError::KeywordEmpty, "create_raffle"));
        }
        if !is_valid_keyword(keyword) {
            return Err(reject(TicketError::KeywordTooLong, "create_raffle"));
        }
        if !is_valid_description(description) {
            return Err(reject(TicketError::DescriptionTooLong, "create_raffle"));
        }
        // Entries are debited through the signed ledger
        to_ledger_amount(cost)?;
        Ok(())
    }
}
