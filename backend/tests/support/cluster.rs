//! Shared embedded PostgreSQL cluster and its skip policy.
//!
//! Suites that need a live database can be skipped where the cluster cannot
//! start by setting `SKIP_TEST_CLUSTER`. Without it a bootstrap failure fails
//! the test so CI breakage is not masked.

use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Password pinned for reused data directories.
const EMBEDDED_PASSWORD: &str = "league_embedded_test";

/// True when `SKIP_TEST_CLUSTER` is "1", "true" or "yes" (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Print a skip marker and return `None` when skipping is allowed, else panic.
#[allow(clippy::print_stderr, reason = "skip marker surfaces in CI logs")]
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Process-wide cluster handle, bootstrapped on first use.
///
/// A fresh bootstrap otherwise generates a random password, which breaks a
/// data directory left behind by an earlier test binary. `PG_PASSWORD` is
/// pinned for the duration of the bootstrap unless the caller set one.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    let _password = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| env_lock::lock_env([("PG_PASSWORD", Some(EMBEDDED_PASSWORD))]));

    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Skip policy parsing.

    use rstest::rstest;

    use super::should_skip_test_cluster;

    #[rstest]
    #[case(Some("1"), true)]
    #[case(Some("YES"), true)]
    #[case(Some("true"), true)]
    #[case(Some("0"), false)]
    #[case(None, false)]
    fn skip_flag_accepts_truthy_values(#[case] value: Option<&str>, #[case] expected: bool) {
        let _guard = env_lock::lock_env([("SKIP_TEST_CLUSTER", value)]);
        assert_eq!(should_skip_test_cluster(), expected);
    }
}
