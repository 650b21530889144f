use tokio::task::JoinError;

/// Run a synchronous service call (password hashing, SQLite) on the blocking pool.
pub(crate) async fn offload<T, E, F>(work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(err) => Err(E::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Outcome {
        Worker(String),
    }

    impl From<JoinError> for Outcome {
        fn from(err: JoinError) -> Self {
            Outcome::Worker(err.to_string())
        }
    }

    #[tokio::test]
    async fn offloaded_work_returns_its_result() {
        let value: Result<u32, Outcome> = offload(|| Ok(21 * 2)).await;
        assert_eq!(value.expect("work succeeds"), 42);
    }

    #[tokio::test]
    async fn panicking_work_becomes_an_error() {
        let value: Result<u32, Outcome> = offload(|| panic!("worker blew up")).await;
        match value {
            Err(Outcome::Worker(message)) => assert!(message.contains("panic")),
            other => panic!("expected worker error, got {other:?}"),
        }
    }
}
