//! Test utilities for the bzz crates.

pub mod chunk;
pub mod id;

/// Enable tracing with the RUST_LOG environment variable.
///
/// This is intended to be used in tests, so it defaults to DEBUG level.
pub fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::DEBUG.into())
                .from_env_lossy(),
        )
        .try_init();
}

/// Create random bytes of a specified length.
pub fn random_bytes(length: u16) -> Vec<u8> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let mut bytes = vec![0; length as usize];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Repeat a code block, sleeping between attempts, until it `break`s.
///
/// Panics if the block has not broken out of the loop before the timeout.
/// Must be used inside a tokio runtime.
///
/// - `iter_check!({ ... })` - 1000ms timeout, 10ms between attempts.
/// - `iter_check!(timeout_ms, { ... })` - 10ms between attempts.
/// - `iter_check!(timeout_ms, sleep_ms, { ... })`
#[macro_export]
macro_rules! iter_check {
    ($timeout_ms:expr, $sleep_ms:expr, $code:block) => {{
        let __timeout = std::time::Duration::from_millis($timeout_ms);
        let __sleep = std::time::Duration::from_millis($sleep_ms);
        let __start = std::time::Instant::now();
        loop {
            $code

            if __start.elapsed() > __timeout {
                panic!("iter_check timed out after {:?}", __timeout);
            }

            tokio::time::sleep(__sleep).await;
        }
    }};
    ($timeout_ms:expr, $code:block) => {
        $crate::iter_check!($timeout_ms, 10, $code)
    };
    ($code:block) => {
        $crate::iter_check!(1000, 10, $code)
    };
}
