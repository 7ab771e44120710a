//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use account_sync_provider::{AccountApi, ClientFactory, ClientOptions};

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const TEST_TOKEN: &str = "test-token-12345";

/// Options with short timeouts so failing tests finish quickly.
pub fn test_options(max_retries: u32) -> ClientOptions {
    ClientOptions {
        user_agent: "account-sync-tests".to_string(),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
        max_retries,
    }
}

/// Client bound to the mock server with the test token.
pub fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> Option<Arc<dyn AccountApi>> {
    let factory = ClientFactory::new(test_options(max_retries)).ok()?;
    Some(factory.create(&server.url(), TEST_TOKEN))
}

pub fn user_body() -> String {
    serde_json::json!({
        "id": 583_231,
        "login": "octocat",
        "name": "The Octocat",
        "avatar_url": "https://avatars.example.com/u/583231"
    })
    .to_string()
}

pub fn emails_body() -> String {
    serde_json::json!([
        { "email": "octocat@example.com", "verified": true, "primary": true, "visibility": "public" },
        { "email": "octo@users.noreply.example.com", "verified": true, "primary": false, "visibility": null }
    ])
    .to_string()
}
