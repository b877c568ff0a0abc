//! Round-robin rotation over the configured vendor accounts.

use std::sync::Arc;

use novaapp_types::{ConfigError, Credential};
use parking_lot::Mutex;

/// Thread-safe round-robin selector over a fixed, non-empty credential set.
///
/// Credentials are immutable and shared as `Arc`; only the cursor is locked.
pub struct CredentialPool {
    credentials: Vec<Arc<Credential>>,
    cursor: Mutex<usize>,
}

impl CredentialPool {
    /// Fails fast when `credentials` is empty.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::invalid("credentials", "credential pool cannot be empty"));
        }
        Ok(Self { credentials: credentials.into_iter().map(Arc::new).collect(), cursor: Mutex::new(0) })
    }

    /// Return the credential under the cursor and advance it modulo the pool size.
    pub fn next(&self) -> Arc<Credential> {
        let mut cursor = self.cursor.lock();
        let credential = Arc::clone(&self.credentials[*cursor]);
        *cursor = (*cursor + 1) % self.credentials.len();
        tracing::debug!("[Credentials] Next cursor index: {}", *cursor);
        credential
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pool_of(k: usize) -> CredentialPool {
        CredentialPool::new(
            (0..k).map(|i| Credential::new(format!("token_{i}"), format!("user_{i}"))).collect(),
        )
        .expect("non-empty pool")
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(CredentialPool::new(Vec::new()).is_err());
    }

    #[test]
    fn test_k_calls_visit_each_credential_once_in_order() {
        let pool = pool_of(3);
        let users: Vec<String> = (0..3).map(|_| pool.next().user_id.clone()).collect();
        assert_eq!(users, vec!["user_0", "user_1", "user_2"]);
    }

    #[test]
    fn test_call_mk_plus_r_matches_call_r() {
        let k = 4;
        let pool = pool_of(k);
        let seen: Vec<String> = (0..k * 5).map(|_| pool.next().token.clone()).collect();
        for (i, token) in seen.iter().enumerate() {
            assert_eq!(token, &seen[i % k]);
        }
    }

    #[test]
    fn test_single_credential_always_returned() {
        let pool = pool_of(1);
        for _ in 0..5 {
            assert_eq!(pool.next().user_id, "user_0");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_get_fair_share() {
        let pool = Arc::new(pool_of(3));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = Arc::clone(&pool);
            handles.push(tokio::spawn(async move {
                (0..30).map(|_| pool.next().user_id.clone()).collect::<Vec<_>>()
            }));
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for handle in handles {
            for user in handle.await.expect("task panicked") {
                *counts.entry(user).or_default() += 1;
            }
        }

        // 240 calls over 3 credentials
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| c == 80), "unfair distribution: {:?}", counts);
    }
}
