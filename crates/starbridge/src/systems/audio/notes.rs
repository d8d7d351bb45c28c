/// Frequency in Hz of a scientific-pitch note name such as `C4`, `F#3` or
/// `Bb5`, tuned to A4 = 440 Hz. `None` for anything unparseable.
pub fn note_hz(name: &str) -> Option<f32> {
    let mut chars = name.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let mut semitone: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let octave_str = match rest.chars().next() {
        Some('#') => {
            semitone += 1;
            &rest[1..]
        }
        Some('b') => {
            semitone -= 1;
            &rest[1..]
        }
        _ => rest,
    };
    let octave: i32 = octave_str.parse().ok()?;
    let midi = (octave + 1) * 12 + semitone;
    Some(440.0 * 2f32.powf((midi - 69) as f32 / 12.0))
}
