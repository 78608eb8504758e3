use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyMileage {
    pub start: i64,
    pub end: i64,
}

impl DailyMileage {
    pub fn distance(&self) -> i64 {
        self.end - self.start
    }
}

/// Splits `start..end` over `day_count` days in whole kilometres.
///
/// Every day gets `total / day_count`; the remainder goes to the last day so
/// the split records always add back up to the odometer reading.
pub fn distribute_mileage(start: i64, end: i64, day_count: usize) -> AppResult<Vec<DailyMileage>> {
    if start < 0 || end < 0 {
        return Err(AppError::InvalidRange(format!(
            "mileage must be non-negative (start {}, end {})",
            start, end
        )));
    }
    if end < start {
        return Err(AppError::InvalidRange(format!(
            "end mileage {} is less than start mileage {}",
            end, start
        )));
    }
    if day_count == 0 {
        return Err(AppError::InvalidRange("no days to distribute over".to_string()));
    }

    let days = day_count as i64;
    let total = end - start;
    let per_day = total / days;
    let remainder = total % days;

    Ok((0..days)
        .map(|i| {
            let day_start = start + per_day * i;
            let extra = if i == days - 1 { remainder } else { 0 };
            DailyMileage {
                start: day_start,
                end: day_start + per_day + extra,
            }
        })
        .collect())
}

// Digits with optional commas every three places, e.g. "12,345"
fn parse_odometer_text(text: &str) -> Option<i64> {
    let mut groups = text.split(',');
    let head = groups.next()?;
    let head_ok = !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit());
    if !head_ok || (text.contains(',') && head.len() > 3) {
        return None;
    }

    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    digits.parse().ok()
}

/// Accepts a form value (number or numeric string) as a non-negative integer.
pub fn parse_mileage(value: &serde_json::Value) -> AppResult<i64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => parse_odometer_text(s.trim()),
        _ => None,
    };

    match parsed {
        Some(v) if v >= 0 => Ok(v),
        _ => Err(AppError::InvalidRange(format!("not a valid mileage: {}", value))),
    }
}
