use itertools::Itertools;

/// Words per minute: whitespace-delimited tokens divided by elapsed minutes.
///
/// `duration_seconds` must be positive; the session clock only ever hands out
/// the elapsed time of a finished run, which satisfies this.
pub fn wpm(text: &str, duration_seconds: f64) -> f64 {
    let words = text.split_whitespace().count() as f64;
    words / (duration_seconds / 60.0)
}

/// Character accuracy of the typed text against the target text.
///
/// Both strings are trimmed, the target is cut down to as many leading words
/// as the input contains, and matching character positions are counted.
/// Returns 0 when nothing was typed, so an idle session never divides by zero.
pub fn accuracy(user_input: &str, original_text: &str) -> f64 {
    let user_input = user_input.trim();
    let original_text = original_text.trim();

    let input_words = user_input.split_whitespace().count();
    let relevant_text: String = original_text.split_whitespace().take(input_words).join(" ");

    if relevant_text.is_empty() {
        return 0.0;
    }

    let correct_chars = user_input
        .chars()
        .zip(relevant_text.chars())
        .filter(|(u, o)| u == o)
        .count();

    (correct_chars as f64 / relevant_text.chars().count() as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_four_words_in_half_a_minute() {
        assert_eq!(wpm("the quick brown fox", 30.0), 8.0);
    }

    #[test]
    fn test_wpm_empty_input() {
        assert_eq!(wpm("", 30.0), 0.0);
    }

    #[test]
    fn test_wpm_full_minute() {
        assert_eq!(wpm("one two three", 60.0), 3.0);
    }

    #[test]
    fn test_wpm_collapses_extra_whitespace() {
        assert_eq!(wpm("  one   two  ", 60.0), 2.0);
    }

    #[test]
    fn test_accuracy_perfect_prefix() {
        assert_eq!(accuracy("the quick", "the quick brown fox"), 100.0);
    }

    #[test]
    fn test_accuracy_with_transposition() {
        // relevant target prefix is "the quick" (9 chars); "the quikc" matches
        // at 7 of them, the transposed 'k'/'c' pair misses.
        let acc = accuracy("the quikc", "the quick brown");
        assert!(acc > 0.0 && acc < 100.0);
        assert!((acc - (7.0 / 9.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_empty_input_is_guarded() {
        assert_eq!(accuracy("", "the quick brown"), 0.0);
        assert_eq!(accuracy("   ", "the quick brown"), 0.0);
    }

    #[test]
    fn test_accuracy_trims_both_sides() {
        assert_eq!(accuracy("  hello  ", " hello world "), 100.0);
    }

    #[test]
    fn test_accuracy_completely_wrong() {
        assert_eq!(accuracy("zzzzz", "hello world"), 0.0);
    }

    #[test]
    fn test_accuracy_input_longer_than_relevant_prefix() {
        // "hiya" pulls one target word ("hi", 2 chars); only the first two
        // input chars are compared against it.
        assert_eq!(accuracy("hiya", "hi there"), 100.0);
    }
}
