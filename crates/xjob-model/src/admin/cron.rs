use time::PrimitiveDateTime;

/// Cron expression that fires exactly once, at `at`.
///
/// Format: `ss mm HH dd MM ? yyyy-yyyy`.
pub fn cron_at(at: PrimitiveDateTime) -> String {
    format!(
        "{:02} {:02} {:02} {:02} {:02} ? {}-{}",
        at.second(),
        at.minute(),
        at.hour(),
        at.day(),
        u8::from(at.month()),
        at.year(),
        at.year(),
    )
}
