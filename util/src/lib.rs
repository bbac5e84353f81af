use std::sync::atomic::{AtomicUsize, Ordering};

/// Asserts that an expression evaluates to an `Err` matching the given pattern.
#[macro_export]
macro_rules! assert_err_matches {
    ($e:expr, $pattern:pat $(if $guard:expr)?) => {{
        let expr_string = stringify!($e);
        match $e {
            Err($pattern) $(if $guard)? => {}
            Err(other) => panic!("assert_err_matches!({}) failed. Unexpected error: {:?}", expr_string, other),
            Ok(_) => panic!("assert_err_matches!({}) failed. Expression succeeded.", expr_string),
        }
    }};
}

static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Returns a name that no other call in this process returns.
///
/// Tests in the same binary share the global registry and run concurrently, so each test
/// works below its own unique path.
pub fn unique_name(prefix: &str) -> String {
    let id = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{id}")
}
