use super::{api_base_from_env, is_github_host, token_from_env};

fn with_env_var<T>(key: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
    let previous = std::env::var(key).ok();
    unsafe {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    let result = f();
    unsafe {
        match previous {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    result
}

// These env-var tests share process-global state (`std::env`), so they are
// kept in a single test function rather than separate `#[test]`s, which
// `cargo test` would otherwise run concurrently on different threads.
#[test]
fn api_base_and_token_resolution_from_env() {
    with_env_var("SFETCH_GITHUB_API_BASE", None, || {
        assert_eq!(api_base_from_env(), "https://api.github.com");
    });
    with_env_var("SFETCH_GITHUB_API_BASE", Some("https://ghe.example.com/api/v3"), || {
        assert_eq!(api_base_from_env(), "https://ghe.example.com/api/v3");
    });

    with_env_var("SFETCH_GITHUB_TOKEN", Some("sfetch-token"), || {
        with_env_var("GITHUB_TOKEN", Some("generic-token"), || {
            assert_eq!(token_from_env().as_deref(), Some("sfetch-token"));
        });
    });

    with_env_var("SFETCH_GITHUB_TOKEN", None, || {
        with_env_var("GITHUB_TOKEN", Some("generic-token"), || {
            assert_eq!(token_from_env().as_deref(), Some("generic-token"));
        });
        with_env_var("GITHUB_TOKEN", None, || {
            assert_eq!(token_from_env(), None);
        });
    });
}

#[test]
fn auth_token_is_sent_only_to_github_hosts() {
    assert!(is_github_host("https://api.github.com/repos/owner/repo/releases/latest"));
    assert!(is_github_host("https://github.com/owner/repo"));
    assert!(is_github_host("https://GITHUB.COM/owner/repo"));
    assert!(!is_github_host("https://objects.githubusercontent.com/asset.tar.gz"));
    assert!(!is_github_host("https://evil.example.com/api.github.com"));
}
