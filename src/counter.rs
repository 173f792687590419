use crate::settings::COUNTER_DURATION_MS;

pub fn ease_out_quad(progress: f64) -> f64 {
    progress * (2.0 - progress)
}

pub fn progress_at(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

pub fn value_at(elapsed_ms: f64, duration_ms: f64, target: i64) -> i64 {
    (ease_out_quad(progress_at(elapsed_ms, duration_ms)) * target as f64).floor() as i64
}

/// Digits grouped in threes with commas, matching the en-US locale format.
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CounterFrame {
    Running(i64),
    Finished(i64),
}

/// One counter run, timed from the moment it was triggered. Without a trigger
/// time the first frame it sees becomes the start. Frames stamped before the
/// start render zero.
#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: i64,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl CounterAnimation {
    pub fn new(target: i64) -> Self {
        Self::with_duration(target, COUNTER_DURATION_MS)
    }

    pub fn with_duration(target: i64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
        }
    }

    pub fn triggered_at(mut self, trigger_ms: f64) -> Self {
        self.started_at = Some(trigger_ms);
        self
    }

    pub fn frame(&mut self, now_ms: f64) -> CounterFrame {
        let started_at = *self.started_at.get_or_insert(now_ms);
        let elapsed = (now_ms - started_at).max(0.0);
        let value = value_at(elapsed, self.duration_ms, self.target);

        if progress_at(elapsed, self.duration_ms) >= 1.0 {
            CounterFrame::Finished(value)
        } else {
            CounterFrame::Running(value)
        }
    }
}

/// Reads the leading integer of a `data-count` value, so `"150+"` counts to 150.
pub fn parse_count(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    let sign_len = usize::from(trimmed.starts_with('-'));
    let digits_len = trimmed[sign_len..]
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .count();

    trimmed[..sign_len + digits_len].parse::<i64>().ok()
}
