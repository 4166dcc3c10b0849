use super::*;

/// Nested sums the way the interpreter builds them: one frame per level.
fn nested_sum(n: u64) -> u64 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { n + nested_sum(n - 1) })
}

#[test]
fn test_shallow_recursion_is_unchanged() {
    assert_eq!(nested_sum(10), 55);
}

#[test]
fn test_deep_recursion_grows_the_stack() {
    assert_eq!(nested_sum(200_000), 200_000 * 200_001 / 2);
}

#[test]
fn test_deep_recursion_on_a_small_thread() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| nested_sum(50_000))
        .unwrap();
    assert_eq!(handle.join().unwrap(), 50_000 * 50_001 / 2);
}

#[test]
fn test_passes_results_through() {
    let ok: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(ok, Ok(7));
    let err: Result<u8, String> = ensure_sufficient_stack(|| Err("no".to_owned()));
    assert_eq!(err, Err("no".to_owned()));
}
