//! 类型定义模块

mod account;

pub use account::{Account, CredentialKey};

// Re-export provider 库的公共类型
pub use account_sync_provider::{AccountEmail, EmailVisibility, RemoteUser};
