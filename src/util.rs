const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal-tempered frequency of a MIDI key, A4 (69) = 440Hz, truncated to whole hertz.
pub fn frequency_for_key(key: u8) -> u32 {
    (440.0 * 2f64.powf((key as f64 - 69.0) / 12.0)) as u32
}

/// Human-readable note info for logging, e.g. `A4 (69)`.
pub fn note_label(key: u8) -> String {
    let octave = key as i32 / 12 - 1;
    format!("{}{} ({})", NOTE_NAMES[key as usize % 12], octave, key)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn concert_pitch() {
        assert_eq!(frequency_for_key(69), 440);
        assert_eq!(frequency_for_key(81), 880);
        assert_eq!(frequency_for_key(57), 220);
        assert_eq!(frequency_for_key(60), 261);
    }

    #[test]
    fn labels() {
        assert_eq!(note_label(69), "A4 (69)");
        assert_eq!(note_label(61), "C#4 (61)");
        assert_eq!(note_label(0), "C-1 (0)");
        assert_eq!(note_label(127), "G9 (127)");
    }
}
