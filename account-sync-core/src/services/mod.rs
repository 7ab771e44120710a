//! 业务逻辑服务层

mod account_coordinator;
mod account_refresher;

pub use account_coordinator::{AccountCoordinator, DEFAULT_CREDENTIAL_SERVICE, USERS_KEY};
pub use account_refresher::refresh_account;
