use chrono::{DateTime, Utc};

use logspan_types::{
    FieldStatus, InputState, Moment, RangeValidation, RawTimeRange, ResolvedTimeRange, Result,
    TimePoint,
};

use crate::datemath::{self, ResolveContext};

/// Resolve both ends of a raw range against a single `now` snapshot.
/// "From" rounds down, "to" rounds up. Ordering is not enforced here;
/// `validate_range` flags inverted ranges.
pub fn convert_raw_to_range(
    raw: &RawTimeRange,
    now: DateTime<Utc>,
    ctx: &ResolveContext,
) -> Result<ResolvedTimeRange> {
    let from = datemath::resolve_point(&raw.from, now, false, ctx)?;
    let to = datemath::resolve_point(&raw.to, now, true, ctx)?;
    Ok(ResolvedTimeRange {
        from,
        to,
        raw: raw.clone(),
    })
}

/// Validate both fields of a raw range. Never fails: every outcome, including
/// unparseable input, is a field status the caller can render inline.
///
/// Per-field precedence: format error, then plausibility window, then range
/// order. The range-order status is only ever surfaced on "from" (the side
/// users edit to fix an inverted range) and never replaces a format error.
pub fn validate_range(
    raw: &RawTimeRange,
    now: DateTime<Utc>,
    ctx: &ResolveContext,
) -> RangeValidation {
    let from_value = value_as_string(&raw.from, ctx);
    let to_value = value_as_string(&raw.to, ctx);

    let from_resolved = datemath::resolve(&from_value, now, false, ctx);
    let to_resolved = datemath::resolve(&to_value, now, true, ctx);

    let mut from_status = match from_resolved {
        Ok(_) => FieldStatus::Valid,
        Err(_) => FieldStatus::Format,
    };
    let mut to_status = match to_resolved {
        Ok(_) => FieldStatus::Valid,
        Err(_) => FieldStatus::Format,
    };

    if from_status.is_valid() {
        if let Some(status) = plausibility_violation(&from_value, now, ctx) {
            from_status = status;
        }
    }
    if to_status.is_valid() {
        if let Some(status) = plausibility_violation(&to_value, now, ctx) {
            to_status = status;
        }
    }

    // Ordering is checked only when "to" itself resolved.
    if from_status.is_valid() {
        if let (Ok(from), Ok(to)) = (&from_resolved, &to_resolved) {
            if to.is_before(from) {
                from_status = FieldStatus::RangeOrder;
            }
        }
    }

    RangeValidation {
        from: InputState::new(from_value, from_status),
        to: InputState::new(to_value, to_status),
    }
}

/// Normalize a raw side to string form: absolute instants are formatted in
/// the validation zone, textual values pass through unchanged.
fn value_as_string(point: &TimePoint, ctx: &ResolveContext) -> String {
    match point {
        TimePoint::Absolute(instant) => Moment::new(*instant).format_in(ctx.zone),
        TimePoint::Text(text) => text.clone(),
    }
}

/// Wall-clock plausibility window `[Unix epoch, now]`.
///
/// Relative expressions are anchored at `now ± offset` with the same
/// calendar arithmetic the resolver uses, deliberately ignoring rounding
/// suffixes so `to = now/d` (end of today) stays valid. Absolute values are
/// compared directly.
fn plausibility_violation(
    value: &str,
    now: DateTime<Utc>,
    ctx: &ResolveContext,
) -> Option<FieldStatus> {
    let anchor = if datemath::is_math_string(value) {
        let expr = datemath::parse_expression(value).ok()?;
        datemath::offset_anchor(&expr, now, ctx).ok()?
    } else {
        datemath::resolve(value, now, false, ctx).ok()?.utc()
    };

    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    if anchor < epoch || anchor > now {
        Some(FieldStatus::Implausible {
            window_start: Moment::new(epoch).format_in(ctx.zone),
            window_end: Moment::new(now).format_in(ctx.zone),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn reference_now() -> DateTime<Utc> {
        utc("2024-03-15T10:00:00Z")
    }

    fn validate(from: &str, to: &str) -> RangeValidation {
        validate_range(
            &RawTimeRange::new(from, to),
            reference_now(),
            &ResolveContext::default(),
        )
    }

    #[test]
    fn test_last_hour_is_valid() {
        let result = validate("now-1h", "now");
        assert!(result.from.is_valid());
        assert!(result.to.is_valid());
        assert!(result.is_valid());
    }

    #[test]
    fn test_inverted_range_flags_from_only() {
        let result = validate("now", "now-1h");
        assert_eq!(result.from.status, FieldStatus::RangeOrder);
        assert_eq!(
            result.from.status.message().unwrap(),
            "\"From\" can't be after \"To\""
        );
        assert!(result.to.is_valid());
    }

    #[test]
    fn test_equal_endpoints_are_valid() {
        let result = validate("now", "now");
        assert!(result.is_valid());
    }

    #[test]
    fn test_garbage_from_gets_format_error() {
        let result = validate("not-a-date", "now");
        assert_eq!(result.from.status, FieldStatus::Format);
        assert_eq!(
            result.from.status.message().unwrap(),
            "Unsupported time format"
        );
        assert!(result.to.is_valid());
    }

    #[test]
    fn test_format_error_is_not_replaced_by_range_order() {
        // "From" is unparseable and "to" is in the past; the format error
        // must survive.
        let result = validate("garbage", "now-2h");
        assert_eq!(result.from.status, FieldStatus::Format);
    }

    #[test]
    fn test_offset_beyond_epoch_is_implausible() {
        let result = validate("now-100y", "now");
        assert!(matches!(
            result.from.status,
            FieldStatus::Implausible { .. }
        ));
        let message = result.from.status.message().unwrap();
        assert!(message.starts_with("Enter a time between 1970-01-01 00:00:00"));
        assert!(result.to.is_valid());
    }

    #[test]
    fn test_future_offset_is_implausible() {
        let result = validate("now+1h", "now");
        assert!(matches!(
            result.from.status,
            FieldStatus::Implausible { .. }
        ));
    }

    #[test]
    fn test_absolute_before_epoch_is_implausible() {
        let result = validate("1950-01-01 00:00:00", "now");
        assert!(matches!(
            result.from.status,
            FieldStatus::Implausible { .. }
        ));
    }

    #[test]
    fn test_rounding_suffix_is_exempt_from_plausibility() {
        // End of today is in the future, but only the offset is bounded.
        let result = validate("now/d", "now/d");
        assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn test_implausible_wins_over_range_order() {
        let result = validate("now+2h", "now+1h");
        assert!(matches!(
            result.from.status,
            FieldStatus::Implausible { .. }
        ));
        assert!(matches!(result.to.status, FieldStatus::Implausible { .. }));
    }

    #[test]
    fn test_absolute_sides_are_normalized_to_display_form() {
        let raw = RawTimeRange::new(utc("2024-03-15T08:00:00Z"), "now");
        let result = validate_range(&raw, reference_now(), &ResolveContext::default());
        assert_eq!(result.from.value, "2024-03-15 08:00:00");
        assert!(result.is_valid());
    }

    #[test]
    fn test_normalization_uses_the_zone() {
        let raw = RawTimeRange::new(utc("2024-03-15T08:00:00Z"), "now");
        let ctx = ResolveContext::new(Tz::Europe__Berlin);
        let result = validate_range(&raw, reference_now(), &ctx);
        assert_eq!(result.from.value, "2024-03-15 09:00:00");
        assert!(result.is_valid());
    }

    #[test]
    fn test_convert_raw_to_range_uses_one_snapshot() {
        let range = convert_raw_to_range(
            &RawTimeRange::new("now-1h", "now"),
            reference_now(),
            &ResolveContext::default(),
        )
        .unwrap();
        assert_eq!(range.from.utc(), utc("2024-03-15T09:00:00Z"));
        assert_eq!(range.to.utc(), reference_now());
        assert!(range.is_ordered());
    }

    #[test]
    fn test_convert_rounds_from_down_and_to_up() {
        let range = convert_raw_to_range(
            &RawTimeRange::new("now/d", "now/d"),
            reference_now(),
            &ResolveContext::default(),
        )
        .unwrap();
        assert_eq!(range.from.utc(), utc("2024-03-15T00:00:00Z"));
        assert_eq!(range.to.utc(), utc("2024-03-15T23:59:59.999Z"));
    }

    #[test]
    fn test_validation_never_panics_on_weird_input() {
        for input in ["", "   ", "now-99999999999y", "\u{0}", "now/"] {
            let result = validate(input, "now");
            assert!(!result.from.is_valid(), "{:?} should be invalid", input);
        }
    }
}
