/// Known degree labels; a label's rank is its position here.
pub const DEGREE_LABELS: [&str; 5] = [
    "преподаватель",         // instructor
    "старший преподаватель", // senior instructor
    "доцент",                // associate professor
    "профессор",             // professor
    "ассистент",             // assistant
];

/// Rank given to any label not in `DEGREE_LABELS`.
pub const DEGREE_UNKNOWN: u8 = DEGREE_LABELS.len() as u8;

pub fn normalize_degree(degree_text: &str) -> u8 {
    let label = degree_text.trim().to_lowercase();
    DEGREE_LABELS
        .iter()
        .position(|known| *known == label)
        .map_or(DEGREE_UNKNOWN, |i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_position() {
        for (i, label) in DEGREE_LABELS.iter().enumerate() {
            assert_eq!(normalize_degree(label), i as u8);
            assert_eq!(normalize_degree(&label.to_uppercase()), i as u8);
        }
    }

    #[test]
    fn dotsent_is_associate_professor() {
        assert_eq!(normalize_degree("Доцент"), 2);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(normalize_degree("  Старший преподаватель \n"), 1);
    }

    #[test]
    fn unknown_labels_collapse_to_sentinel() {
        assert_eq!(DEGREE_UNKNOWN, 5);
        for label in ["", "Заведующий кафедрой", "доцент кафедры", "professor"] {
            assert_eq!(normalize_degree(label), DEGREE_UNKNOWN, "{:?}", label);
        }
    }
}
