/// Maps a Steam master-server region code to a display name.
///
/// Codes `-1` and `255` both mean "World": the master server reports
/// region-less servers either way depending on listing path. Unknown codes
/// return `None` and the caller leaves the region blank rather than
/// guessing.
#[must_use]
pub const fn region_name(code: i32) -> Option<&'static str> {
    match code {
        -1 | 255 => Some("World"),
        0 => Some("US - East"),
        1 => Some("US - West"),
        2 => Some("South America"),
        3 => Some("Europe"),
        4 => Some("Asia"),
        5 => Some("Australia"),
        6 => Some("Middle East"),
        7 => Some("Africa"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions() {
        assert_eq!(region_name(0), Some("US - East"));
        assert_eq!(region_name(3), Some("Europe"));
        assert_eq!(region_name(7), Some("Africa"));
    }

    #[test]
    fn test_world_aliases() {
        assert_eq!(region_name(-1), Some("World"));
        assert_eq!(region_name(255), Some("World"));
    }

    #[test]
    fn test_unknown_region() {
        assert_eq!(region_name(8), None);
        assert_eq!(region_name(42), None);
        assert_eq!(region_name(-2), None);
    }
}
