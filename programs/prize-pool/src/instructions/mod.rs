pub mod complete_award;
pub mod deposit_to;
pub mod external_awards;
pub mod fulfill_randomness;
pub mod initialize_pool;
pub mod initialize_strategy;
pub mod start_award;
pub mod sweep_timelock;
pub mod transfer_controlled_tokens;
pub mod update_config;
pub mod views;
pub mod withdraw_instantly_from;
pub mod withdraw_reserve;
pub mod withdraw_with_timelock_from;

pub use complete_award::*;
pub use deposit_to::*;
pub use external_awards::*;
pub use fulfill_randomness::*;
pub use initialize_pool::*;
pub use initialize_strategy::*;
pub use start_award::*;
pub use sweep_timelock::*;
pub use transfer_controlled_tokens::*;
pub use update_config::*;
pub use views::*;
pub use withdraw_instantly_from::*;
pub use withdraw_reserve::*;
pub use withdraw_with_timelock_from::*;
