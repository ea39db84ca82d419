use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

use logspan_types::{Error, Moment, Result, TimePoint, TimeUnit, UnitSpec};

/// Grammar: `now`, optionally one signed offset, optionally one rounding
/// suffix. Multiple offset terms are not part of the grammar.
static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^now(?:([+-])(\d{1,10})(fy|fQ|[yMQwdhms]))?(?:/(fy|fQ|[yMQwdhms]))?$")
        .expect("expression grammar must compile")
});

/// Week day that begins a week for `/w` rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// ISO 8601 convention.
    #[default]
    Monday,
    /// US convention.
    Sunday,
}

/// Zone and fiscal settings shared by every resolution within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveContext {
    pub zone: Tz,
    /// 0-based month the fiscal year starts in (0 = January).
    pub fiscal_year_start_month: u32,
    pub week_start: WeekStart,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl ResolveContext {
    pub fn new(zone: Tz) -> Self {
        Self {
            zone,
            fiscal_year_start_month: 0,
            week_start: WeekStart::default(),
        }
    }

    /// Build a context from optional user-facing settings. The zone is an
    /// IANA identifier; `None` means UTC.
    pub fn from_parts(
        zone: Option<&str>,
        fiscal_year_start_month: Option<u32>,
        week_start: WeekStart,
    ) -> Result<Self> {
        let zone = match zone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| Error::InvalidZone(name.to_string()))?,
            None => Tz::UTC,
        };
        let fiscal_year_start_month = fiscal_year_start_month.unwrap_or(0);
        if fiscal_year_start_month > 11 {
            return Err(Error::InvalidFiscalStart(fiscal_year_start_month));
        }
        Ok(Self {
            zone,
            fiscal_year_start_month,
            week_start,
        })
    }
}

/// Signed offset term of a relative expression, e.g. `-5m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTerm {
    /// Signed count; `now-5m` carries -5.
    pub amount: i64,
    pub unit: UnitSpec,
}

/// Parsed relative expression: `now`, an optional offset, an optional
/// rounding suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeExpression {
    pub offset: Option<OffsetTerm>,
    pub rounding: Option<UnitSpec>,
}

/// True when the value should be treated as a relative expression rather
/// than an absolute timestamp. Anything starting with `now` takes the
/// expression path; it never falls back to absolute parsing.
pub fn is_math_string(value: &str) -> bool {
    value.trim_start().starts_with("now")
}

/// Parse a relative expression. Unknown units, a missing count before a
/// unit, extra offset terms, and trailing garbage are all parse failures.
pub fn parse_expression(value: &str) -> Result<RelativeExpression> {
    let trimmed = value.trim();
    let caps = EXPRESSION
        .captures(trimmed)
        .ok_or_else(|| Error::InvalidExpression(value.to_string()))?;

    let offset = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(sign), Some(count), Some(unit)) => {
            let count: i64 = count
                .as_str()
                .parse()
                .map_err(|_| Error::InvalidExpression(value.to_string()))?;
            let unit = UnitSpec::parse_token(unit.as_str())
                .ok_or_else(|| Error::InvalidExpression(value.to_string()))?;
            let amount = if sign.as_str() == "-" { -count } else { count };
            Some(OffsetTerm { amount, unit })
        }
        _ => None,
    };

    let rounding = match caps.get(4) {
        Some(unit) => Some(
            UnitSpec::parse_token(unit.as_str())
                .ok_or_else(|| Error::InvalidExpression(value.to_string()))?,
        ),
        None => None,
    };

    Ok(RelativeExpression { offset, rounding })
}

/// Resolve a textual value: relative expressions first, absolute parse
/// second. `now` is sampled by the caller so a whole range resolves against
/// one snapshot.
pub fn resolve(
    text: &str,
    now: DateTime<Utc>,
    round_up: bool,
    ctx: &ResolveContext,
) -> Result<Moment> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidExpression(text.to_string()));
    }
    if is_math_string(trimmed) {
        let expr = parse_expression(trimmed)?;
        return resolve_expression(&expr, now, round_up, ctx);
    }
    parse_absolute(trimmed, round_up, ctx).map(Moment::new)
}

/// Resolve any raw time point. Absolute instants pass through unchanged.
pub fn resolve_point(
    point: &TimePoint,
    now: DateTime<Utc>,
    round_up: bool,
    ctx: &ResolveContext,
) -> Result<Moment> {
    match point {
        TimePoint::Absolute(instant) => Ok(Moment::new(*instant)),
        TimePoint::Text(text) => resolve(text, now, round_up, ctx),
    }
}

/// Resolve a parsed expression against a `now` snapshot.
pub fn resolve_expression(
    expr: &RelativeExpression,
    now: DateTime<Utc>,
    round_up: bool,
    ctx: &ResolveContext,
) -> Result<Moment> {
    let mut local = now.with_timezone(&ctx.zone);
    if let Some(term) = &expr.offset {
        local = apply_offset(local, term)?;
    }
    if let Some(unit) = &expr.rounding {
        local = if round_up {
            end_of(local, *unit, ctx)?
        } else {
            start_of(local, *unit, ctx)?
        };
    }
    Ok(Moment::new(local.with_timezone(&Utc)))
}

/// Instant after applying only the offset term, ignoring any rounding
/// suffix. The plausibility check anchors on this so a rounding suffix
/// (`now/d` with round-up lands in the future) cannot push a value out of
/// the accepted window.
pub fn offset_anchor(
    expr: &RelativeExpression,
    now: DateTime<Utc>,
    ctx: &ResolveContext,
) -> Result<DateTime<Utc>> {
    let mut local = now.with_timezone(&ctx.zone);
    if let Some(term) = &expr.offset {
        local = apply_offset(local, term)?;
    }
    Ok(local.with_timezone(&Utc))
}

fn overflow(unit: UnitSpec, amount: i64) -> Error {
    Error::InvalidExpression(format!("offset out of range: {}{}", amount, unit))
}

/// Apply a signed offset. Seconds through days are exact durations; weeks,
/// months, quarters and years shift the calendar.
fn apply_offset(local: DateTime<Tz>, term: &OffsetTerm) -> Result<DateTime<Tz>> {
    let n = term.amount;
    let shifted = match term.unit.unit {
        TimeUnit::Second => local.checked_add_signed(Duration::seconds(n)),
        TimeUnit::Minute => local.checked_add_signed(Duration::minutes(n)),
        TimeUnit::Hour => local.checked_add_signed(Duration::hours(n)),
        TimeUnit::Day => local.checked_add_signed(Duration::days(n)),
        TimeUnit::Week => shift_days(local, n * 7),
        TimeUnit::Month => shift_months(local, n),
        TimeUnit::Quarter => shift_months(local, n * 3),
        TimeUnit::Year => shift_months(local, n * 12),
    };
    shifted.ok_or_else(|| overflow(term.unit, n))
}

fn shift_days(local: DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    if days >= 0 {
        local.checked_add_days(Days::new(days as u64))
    } else {
        local.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn shift_months(local: DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let count = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        local.checked_add_months(Months::new(count))
    } else {
        local.checked_sub_months(Months::new(count))
    }
}

/// First valid instant of a calendar date in the given zone. Falls forward
/// past a DST gap when midnight does not exist.
fn local_start_of_day(zone: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    zone.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| local_datetime(zone, midnight + Duration::hours(1)))
}

/// Map a naive local datetime into the zone, taking the earlier instant
/// when the wall time is ambiguous and skipping forward when it is inside
/// a DST gap.
fn local_datetime(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

fn days_from_week_start(weekday: Weekday, week_start: WeekStart) -> u64 {
    match week_start {
        WeekStart::Monday => weekday.num_days_from_monday() as u64,
        WeekStart::Sunday => weekday.num_days_from_sunday() as u64,
    }
}

fn start_of(local: DateTime<Tz>, spec: UnitSpec, ctx: &ResolveContext) -> Result<DateTime<Tz>> {
    if spec.fiscal {
        return round_to_fiscal(local, spec.unit, ctx, false);
    }
    let zone = local.timezone();
    let snapped = match spec.unit {
        TimeUnit::Second => local.with_nanosecond(0),
        TimeUnit::Minute => local.with_nanosecond(0).and_then(|t| t.with_second(0)),
        TimeUnit::Hour => local
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0)),
        TimeUnit::Day => local_start_of_day(&zone, local.date_naive()),
        TimeUnit::Week => {
            let back = days_from_week_start(local.weekday(), ctx.week_start);
            local
                .date_naive()
                .checked_sub_days(Days::new(back))
                .and_then(|date| local_start_of_day(&zone, date))
        }
        TimeUnit::Month => local
            .date_naive()
            .with_day(1)
            .and_then(|date| local_start_of_day(&zone, date)),
        TimeUnit::Quarter => {
            let quarter_start = local.month0() - local.month0() % 3;
            NaiveDate::from_ymd_opt(local.year(), quarter_start + 1, 1)
                .and_then(|date| local_start_of_day(&zone, date))
        }
        TimeUnit::Year => NaiveDate::from_ymd_opt(local.year(), 1, 1)
            .and_then(|date| local_start_of_day(&zone, date)),
    };
    snapped.ok_or_else(|| Error::InvalidExpression(format!("cannot round to start of {}", spec)))
}

/// Last representable instant before the next unit boundary, at millisecond
/// precision.
fn end_of(local: DateTime<Tz>, spec: UnitSpec, ctx: &ResolveContext) -> Result<DateTime<Tz>> {
    if spec.fiscal {
        return round_to_fiscal(local, spec.unit, ctx, true);
    }
    let start = start_of(local, spec, ctx)?;
    let next = match spec.unit {
        TimeUnit::Second => start.checked_add_signed(Duration::seconds(1)),
        TimeUnit::Minute => start.checked_add_signed(Duration::minutes(1)),
        TimeUnit::Hour => start.checked_add_signed(Duration::hours(1)),
        TimeUnit::Day => start.checked_add_days(Days::new(1)),
        TimeUnit::Week => start.checked_add_days(Days::new(7)),
        TimeUnit::Month => start.checked_add_months(Months::new(1)),
        TimeUnit::Quarter => start.checked_add_months(Months::new(3)),
        TimeUnit::Year => start.checked_add_months(Months::new(12)),
    };
    next.and_then(|boundary| boundary.checked_sub_signed(Duration::milliseconds(1)))
        .ok_or_else(|| Error::InvalidExpression(format!("cannot round to end of {}", spec)))
}

/// Fiscal year/quarter boundaries: walk back to the fiscal period start
/// (`(month - fiscal_start) mod 12` months for years, `mod 3` for
/// quarters), then snap to that month's first instant.
fn round_to_fiscal(
    local: DateTime<Tz>,
    unit: TimeUnit,
    ctx: &ResolveContext,
    round_up: bool,
) -> Result<DateTime<Tz>> {
    let span_months: i64 = match unit {
        TimeUnit::Year => 12,
        TimeUnit::Quarter => 3,
        other => {
            return Err(Error::InvalidExpression(format!(
                "fiscal rounding applies to years and quarters, not {}",
                other
            )));
        }
    };
    let zone = local.timezone();
    let back = (local.month0() as i64 - ctx.fiscal_year_start_month as i64).rem_euclid(span_months);
    let start = shift_months(local, -back)
        .and_then(|anchored| anchored.date_naive().with_day(1))
        .and_then(|date| local_start_of_day(&zone, date))
        .ok_or_else(|| {
            Error::InvalidExpression(format!("cannot round to fiscal {}", unit.label(1)))
        })?;
    if !round_up {
        return Ok(start);
    }
    start
        .checked_add_months(Months::new(span_months as u32))
        .and_then(|boundary| boundary.checked_sub_signed(Duration::milliseconds(1)))
        .ok_or_else(|| {
            Error::InvalidExpression(format!("cannot round to fiscal {}", unit.label(1)))
        })
}

/// Parse an absolute timestamp: RFC 3339, epoch milliseconds, then the
/// zone-local field formats. Date-only inputs honor the rounding direction
/// the same way lower-precision picker input does.
fn parse_absolute(text: &str, round_up: bool, ctx: &ResolveContext) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    // Epoch milliseconds; more than four digits so bare years stay dates.
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.len() > 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(millis) = text.parse::<i64>() {
            if let Some(instant) = DateTime::from_timestamp_millis(millis) {
                return Ok(instant);
            }
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return local_datetime(&ctx.zone, naive)
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| Error::InvalidExpression(text.to_string()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let start = local_start_of_day(&ctx.zone, date)
            .ok_or_else(|| Error::InvalidExpression(text.to_string()))?;
        let instant = if round_up {
            start
                .checked_add_days(Days::new(1))
                .and_then(|next| next.checked_sub_signed(Duration::milliseconds(1)))
                .ok_or_else(|| Error::InvalidExpression(text.to_string()))?
        } else {
            start
        };
        return Ok(instant.with_timezone(&Utc));
    }

    Err(Error::InvalidExpression(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn reference_now() -> DateTime<Utc> {
        utc("2024-03-15T10:00:00Z")
    }

    fn ctx_utc() -> ResolveContext {
        ResolveContext::default()
    }

    fn resolve_utc(text: &str, round_up: bool) -> DateTime<Utc> {
        resolve(text, reference_now(), round_up, &ctx_utc())
            .unwrap()
            .utc()
    }

    #[test]
    fn test_bare_now_resolves_to_this_instant() {
        assert_eq!(resolve_utc("now", false), reference_now());
        assert_eq!(resolve_utc("now", true), reference_now());
    }

    #[test]
    fn test_exact_duration_offsets() {
        assert_eq!(resolve_utc("now-5m", false), utc("2024-03-15T09:55:00Z"));
        assert_eq!(resolve_utc("now-1h", false), utc("2024-03-15T09:00:00Z"));
        assert_eq!(resolve_utc("now-30s", false), utc("2024-03-15T09:59:30Z"));
        assert_eq!(resolve_utc("now-2d", false), utc("2024-03-13T10:00:00Z"));
        assert_eq!(resolve_utc("now+3h", false), utc("2024-03-15T13:00:00Z"));
    }

    #[test]
    fn test_calendar_offsets() {
        assert_eq!(resolve_utc("now-1w", false), utc("2024-03-08T10:00:00Z"));
        assert_eq!(resolve_utc("now-1M", false), utc("2024-02-15T10:00:00Z"));
        assert_eq!(resolve_utc("now-1y", false), utc("2023-03-15T10:00:00Z"));
        assert_eq!(resolve_utc("now-1Q", false), utc("2023-12-15T10:00:00Z"));
    }

    #[test]
    fn test_month_offset_clamps_short_months() {
        // Mar 31 minus one month lands on Feb 29 in a leap year.
        let now = utc("2024-03-31T12:00:00Z");
        let resolved = resolve("now-1M", now, false, &ctx_utc()).unwrap();
        assert_eq!(resolved.utc(), utc("2024-02-29T12:00:00Z"));
    }

    #[test]
    fn test_round_down_to_start_of_day() {
        assert_eq!(resolve_utc("now/d", false), utc("2024-03-15T00:00:00Z"));
    }

    #[test]
    fn test_round_up_to_end_of_day() {
        assert_eq!(
            resolve_utc("now/d", true),
            utc("2024-03-15T23:59:59.999Z")
        );
    }

    #[test]
    fn test_offset_then_rounding() {
        assert_eq!(resolve_utc("now-1d/d", false), utc("2024-03-14T00:00:00Z"));
        assert_eq!(
            resolve_utc("now-1d/d", true),
            utc("2024-03-14T23:59:59.999Z")
        );
    }

    #[test]
    fn test_week_rounding_monday_and_sunday_start() {
        // 2024-03-15 is a Friday.
        assert_eq!(resolve_utc("now/w", false), utc("2024-03-11T00:00:00Z"));

        let mut ctx = ctx_utc();
        ctx.week_start = WeekStart::Sunday;
        let resolved = resolve("now/w", reference_now(), false, &ctx).unwrap();
        assert_eq!(resolved.utc(), utc("2024-03-10T00:00:00Z"));
    }

    #[test]
    fn test_month_quarter_year_rounding() {
        assert_eq!(resolve_utc("now/M", false), utc("2024-03-01T00:00:00Z"));
        assert_eq!(
            resolve_utc("now/M", true),
            utc("2024-03-31T23:59:59.999Z")
        );
        assert_eq!(resolve_utc("now/Q", false), utc("2024-01-01T00:00:00Z"));
        assert_eq!(resolve_utc("now/y", false), utc("2024-01-01T00:00:00Z"));
        assert_eq!(
            resolve_utc("now/y", true),
            utc("2024-12-31T23:59:59.999Z")
        );
    }

    #[test]
    fn test_day_boundaries_are_zone_relative() {
        // Berlin midnight is 23:00 UTC the previous day in March.
        let ctx = ResolveContext::new(Tz::Europe__Berlin);
        let resolved = resolve("now/d", reference_now(), false, &ctx).unwrap();
        assert_eq!(resolved.utc(), utc("2024-03-14T23:00:00Z"));
    }

    #[test]
    fn test_day_start_skips_dst_gap() {
        // Sao Paulo 2018-11-04: midnight did not exist, the day began 01:00.
        let ctx = ResolveContext::new(Tz::America__Sao_Paulo);
        let now = utc("2018-11-04T14:00:00Z");
        let resolved = resolve("now/d", now, false, &ctx).unwrap();
        assert_eq!(resolved.utc(), utc("2018-11-04T03:00:00Z"));
    }

    #[test]
    fn test_fiscal_year_rounding() {
        // Fiscal year starting in April: March 2024 belongs to FY 2023.
        let mut ctx = ctx_utc();
        ctx.fiscal_year_start_month = 3;
        let start = resolve("now/fy", reference_now(), false, &ctx).unwrap();
        assert_eq!(start.utc(), utc("2023-04-01T00:00:00Z"));
        let end = resolve("now/fy", reference_now(), true, &ctx).unwrap();
        assert_eq!(end.utc(), utc("2024-03-31T23:59:59.999Z"));
    }

    #[test]
    fn test_fiscal_quarter_defaults_to_calendar_quarter() {
        let start = resolve_utc("now/fQ", false);
        assert_eq!(start, utc("2024-01-01T00:00:00Z"));

        let mut ctx = ctx_utc();
        ctx.fiscal_year_start_month = 1;
        let shifted = resolve("now/fQ", reference_now(), false, &ctx).unwrap();
        assert_eq!(shifted.utc(), utc("2024-02-01T00:00:00Z"));
    }

    #[test]
    fn test_malformed_expressions_fail() {
        for input in [
            "now-",
            "now-5",
            "now-5x",
            "now5m",
            "now-5m5m",
            "now/5d",
            "now/d/d",
            "now-fy",
            "nowadays",
            "now - 5m",
        ] {
            assert!(
                resolve(input, reference_now(), false, &ctx_utc()).is_err(),
                "expected {:?} to fail",
                input
            );
        }
    }

    #[test]
    fn test_expression_path_never_falls_back_to_absolute() {
        // Starts with "now" but is not valid grammar; must not be retried
        // as an absolute timestamp.
        let err = resolve("nowhere", reference_now(), false, &ctx_utc());
        assert!(err.is_err());
    }

    #[test]
    fn test_absolute_rfc3339_ignores_zone_setting() {
        let ctx = ResolveContext::new(Tz::Europe__Berlin);
        let resolved = resolve("2024-03-15T08:00:00Z", reference_now(), false, &ctx).unwrap();
        assert_eq!(resolved.utc(), utc("2024-03-15T08:00:00Z"));
    }

    #[test]
    fn test_absolute_local_format_uses_zone() {
        let ctx = ResolveContext::new(Tz::Europe__Berlin);
        let resolved = resolve("2024-03-15 08:00:00", reference_now(), false, &ctx).unwrap();
        assert_eq!(resolved.utc(), utc("2024-03-15T07:00:00Z"));
    }

    #[test]
    fn test_absolute_epoch_millis() {
        let resolved = resolve_utc("1710496800000", false);
        assert_eq!(resolved, reference_now());
    }

    #[test]
    fn test_date_only_honors_rounding_direction() {
        assert_eq!(
            resolve_utc("2024-03-14", false),
            utc("2024-03-14T00:00:00Z")
        );
        assert_eq!(
            resolve_utc("2024-03-14", true),
            utc("2024-03-14T23:59:59.999Z")
        );
    }

    #[test]
    fn test_absolute_resolution_is_idempotent() {
        let first = resolve_utc("2024-03-14 09:30:00", false);
        let second = resolve_utc("2024-03-14 09:30:00", true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_round_trip_preserves_the_minute() {
        let moment = resolve("now-90m", reference_now(), false, &ctx_utc()).unwrap();
        let formatted = moment.format_in(Tz::UTC);
        let reparsed = resolve(&formatted, reference_now(), false, &ctx_utc()).unwrap();
        assert_eq!(
            reparsed.utc().format("%Y-%m-%d %H:%M").to_string(),
            moment.utc().format("%Y-%m-%d %H:%M").to_string()
        );
    }

    #[test]
    fn test_offset_anchor_ignores_rounding() {
        let expr = parse_expression("now-1h/d").unwrap();
        let anchor = offset_anchor(&expr, reference_now(), &ctx_utc()).unwrap();
        assert_eq!(anchor, utc("2024-03-15T09:00:00Z"));
    }

    #[test]
    fn test_zone_parsing() {
        assert!(ResolveContext::from_parts(Some("Europe/Berlin"), None, WeekStart::Monday).is_ok());
        assert!(matches!(
            ResolveContext::from_parts(Some("Mars/Olympus"), None, WeekStart::Monday),
            Err(Error::InvalidZone(_))
        ));
        assert!(matches!(
            ResolveContext::from_parts(None, Some(12), WeekStart::Monday),
            Err(Error::InvalidFiscalStart(12))
        ));
    }
}
