//! Stack growth for the recursive stages of the formula pipeline.
//!
//! Parsing, validation and evaluation all recurse on the shape of the
//! formula, and evaluation also recurses once per user function call. A
//! formula like `int f(int n) { return n <= 0 ? 0 : n + f(n - 1); } f(150)`
//! nests a few thousand native frames, which is more than a small thread
//! stack holds. [`ensure_sufficient_stack`] moves the work onto a freshly
//! allocated segment when the current one runs low, so the call depth limit
//! of the interpreter is the only limit a formula ever hits.
//!
//! On `wasm32` the closure runs directly.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one has
/// less than the red zone left.
///
/// Wrap the entry point of every recursive walk:
///
/// ```text
/// pub fn eval(&mut self, id: ExprId) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_inner(id))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
