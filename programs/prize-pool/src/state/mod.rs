pub mod depositor;
pub mod external_awards;
pub mod prize_pool;
pub mod prize_strategy;
pub mod rng_request;
pub mod sortition;

pub use depositor::*;
pub use external_awards::*;
pub use prize_pool::*;
pub use prize_strategy::*;
pub use rng_request::*;
pub use sortition::*;
