//! Embeddable formula language.
//!
//! [`Formula`] is the host-facing entry point: it parses a formula once,
//! takes variable values and host methods, validates against their types
//! and evaluates on demand. The pipeline stages are usable on their own
//! through the `fml_*` crates re-exported here.
//!
//! ```text
//! let mut formula = Formula::new("max(min(a, b), c)")?;
//! formula.set_variable("a", 5_i64);
//! formula.set_variable("b", -2_i64);
//! formula.set_variable("c", 1_i64);
//! assert_eq!(formula.calculate()?, Value::Int(1));
//! ```

mod error;
mod formula;
mod host;

use std::sync::Once;

pub use error::FormulaError;
pub use formula::Formula;
pub use host::{parse_host_value, value_type};

pub use fml_eval::{EvalError, EvalErrorKind, FunctionValue, HostFunction, Value};
pub use fml_ir::PrintConfig;
pub use fml_lexer::LexError;
pub use fml_parse::{ParseError, ParseErrorKind};
pub use fml_types::{FunctionType, Type, TypeDescription, TypeError, TypeErrorKind, TypeKind};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=fml_types=debug` or
/// `RUST_LOG=fml_eval=trace`; without `RUST_LOG` nothing is installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
