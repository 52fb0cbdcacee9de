//! Greedy word wrap against a pixel budget.
//!
//! Tokens are never split: a token wider than the budget is emitted alone on
//! its own (overflowing) line. Callers pick font sizes that keep this rare.

/// Width of a string in pixels for one fixed font setting.
pub trait TextMeasure {
    fn width_px(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn width_px(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Width of a string in pixels at an arbitrary font size.
pub trait FontMeasure {
    fn width_at(&self, text: &str, size_px: f32) -> f32;
}

/// Wraps `text` into lines no wider than `max_width_px` as measured by `measure`.
///
/// Always returns at least one line; empty or all-whitespace input yields a
/// single empty line.
pub fn wrap<M>(text: &str, max_width_px: f32, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(token);
            continue;
        }

        let candidate = format!("{current} {token}");
        if measure.width_px(&candidate) > max_width_px {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

/// Wraps and keeps at most `max_lines` lines. Excess lines are dropped.
pub fn wrap_truncated<M>(
    text: &str,
    max_width_px: f32,
    max_lines: Option<usize>,
    measure: &M,
) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = wrap(text, max_width_px, measure);
    if let Some(max) = max_lines {
        lines.truncate(max.max(1));
    }
    lines
}
