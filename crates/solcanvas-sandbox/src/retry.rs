//! Fixed-delay retries for sandbox filesystem calls.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SandboxError;
use crate::tree::FileTree;
use crate::{Sandbox, SpawnOutput};

/// How often and how far apart filesystem calls are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up. The last error is returned.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, SandboxError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SandboxError>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts && err.is_retryable() => {
                    tracing::warn!(
                        operation = what,
                        attempt,
                        attempts,
                        error = %err,
                        "sandbox call failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Wraps a sandbox so file reads, writes and mounts are retried.
///
/// `spawn` is passed through untouched: re-running a process is not
/// idempotent.
#[derive(Debug, Clone)]
pub struct RetryingSandbox<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: Sandbox> RetryingSandbox<S> {
    pub fn new(inner: S) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: S, policy: RetryPolicy) -> Self {
        RetryingSandbox { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<S: Sandbox> Sandbox for RetryingSandbox<S> {
    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError> {
        self.policy
            .run("write_file", || self.inner.write_file(path, contents))
            .await
    }

    async fn read_file(&self, path: &str) -> Result<String, SandboxError> {
        self.policy
            .run("read_file", || self.inner.read_file(path))
            .await
    }

    async fn spawn(&self, command: &str, args: &[String]) -> Result<SpawnOutput, SandboxError> {
        self.inner.spawn(command, args).await
    }

    async fn mount(&self, tree: &FileTree) -> Result<(), SandboxError> {
        self.policy.run("mount", || self.inner.mount(tree)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` writes with a transient error.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        kind: io::ErrorKind,
    }

    impl Flaky {
        fn new(failures: u32, kind: io::ErrorKind) -> Self {
            Flaky {
                failures,
                calls: AtomicU32::new(0),
                kind,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Sandbox for Flaky {
        async fn write_file(&self, path: &str, _contents: &str) -> Result<(), SandboxError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(SandboxError::io(path, io::Error::new(self.kind, "flaky")));
            }
            Ok(())
        }

        async fn read_file(&self, path: &str) -> Result<String, SandboxError> {
            self.write_file(path, "").await.map(|_| "ok".to_string())
        }

        async fn spawn(&self, command: &str, _args: &[String]) -> Result<SpawnOutput, SandboxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SandboxError::Spawn {
                command: command.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "no processes here"),
            })
        }
    }

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn recovers_from_transient_failures() {
        let sandbox = RetryingSandbox::with_policy(Flaky::new(2, io::ErrorKind::Interrupted), fast(3));
        sandbox.write_file("a.txt", "x").await.unwrap();
        assert_eq!(sandbox.inner().calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_last_attempt() {
        let sandbox = RetryingSandbox::with_policy(Flaky::new(10, io::ErrorKind::Interrupted), fast(3));
        let err = sandbox.read_file("a.txt").await.unwrap_err();
        assert!(matches!(err, SandboxError::Io { .. }));
        assert_eq!(sandbox.inner().calls(), 3);
    }

    #[tokio::test]
    async fn permanent_errors_fail_fast() {
        let sandbox = RetryingSandbox::with_policy(Flaky::new(10, io::ErrorKind::NotFound), fast(3));
        assert!(sandbox.write_file("a.txt", "x").await.is_err());
        assert_eq!(sandbox.inner().calls(), 1);
    }

    #[tokio::test]
    async fn spawn_is_not_retried() {
        let sandbox = RetryingSandbox::with_policy(Flaky::new(0, io::ErrorKind::Interrupted), fast(5));
        assert!(sandbox.spawn("npm", &[]).await.is_err());
        assert_eq!(sandbox.inner().calls(), 1);
    }

    #[tokio::test]
    async fn mount_retries_as_a_whole() {
        let sandbox = RetryingSandbox::with_policy(Flaky::new(1, io::ErrorKind::Interrupted), fast(2));
        let tree = FileTree::new().with_file("a.txt", "1").with_file("b.txt", "2");
        sandbox.mount(&tree).await.unwrap();
        // First attempt fails on a.txt, second writes both.
        assert_eq!(sandbox.inner().calls(), 3);
    }
}
