// Engine module - pure computation (date math, validation, dedup, meta)
// This layer sits between the schema layer (types) and CLI presentation

pub mod clock;
pub mod datemath;
pub mod dedup;
pub mod describe;
pub mod levels;
pub mod meta;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use datemath::{
    OffsetTerm, RelativeExpression, ResolveContext, WeekStart, is_math_string, parse_expression,
    resolve, resolve_point,
};
pub use dedup::{dedup_count, dedup_rows, sort_rows};
pub use describe::{QUICK_RANGES, QuickRange, describe_range};
pub use levels::detect_level;
pub use meta::{MAX_CHARACTERS, apply_unique_labels, collect_meta, common_labels};
pub use validate::{convert_raw_to_range, validate_range};
