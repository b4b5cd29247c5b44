// Export all instruction modules

pub mod initialize_machine;
pub mod configure_machine;
pub mod adjust_balance;
pub mod set_balance;
pub mod get_balance;
pub mod create_award_event;
pub mod redeem_award;
pub mod close_award_event;
pub mod sweep_expired;
pub mod create_raffle;
pub mod enter_raffle;
pub mod resolve_raffle;
pub mod publish_entries;

// Re-export the instruction structs for easy access
pub use initialize_machine::*;
pub use configure_machine::*;
pub use adjust_balance::*;
pub use set_balance::*;
pub use get_balance::*;
pub use create_award_event::*;
pub use redeem_award::*;
pub use close_award_event::*;
pub use sweep_expired::*;
pub use create_raffle::*;
pub use enter_raffle::*;
pub use resolve_raffle::*;
pub use publish_entries::*;
