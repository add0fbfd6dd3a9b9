/// Number of positions where the typed text matches the target, compared
/// character by character up to the shorter of the two.
pub fn correct_char_count(typed: &str, target: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(t, w)| t == w)
        .count()
}

/// A word passes when it matches the target once surrounding whitespace is dropped.
pub fn is_exact(typed: &str, target: &str) -> bool {
    typed.trim() == target.trim()
}

/// Letters per second over the run, never dividing by less than one second.
pub fn typing_speed(total_characters: usize, elapsed_secs: f64) -> f64 {
    let elapsed = elapsed_secs.max(1.0);
    round_to_hundredths(total_characters as f64 / elapsed)
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
