//! Free-text location splitting and country normalization.
//!
//! Catalog locations look like `"Harness, New York, US"`: the last comma
//! segment is the country, everything before it is the city/venue part.

/// Known country spellings (lowercase) and their canonical short form.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    // United States, including a few state names that show up as the last segment
    ("us", "USA"),
    ("usa", "USA"),
    ("u.s", "USA"),
    ("u.s.a", "USA"),
    ("united states", "USA"),
    ("united states of america", "USA"),
    ("untied states", "USA"),
    ("america", "USA"),
    ("california", "USA"),
    ("new york", "USA"),
    ("texas", "USA"),
    ("colorado", "USA"),
    ("massachusetts", "USA"),
    ("illinois", "USA"),
    // United Kingdom
    ("uk", "UK"),
    ("u.k", "UK"),
    ("gb", "UK"),
    ("united kingdom", "UK"),
    ("great britain", "UK"),
    ("england", "UK"),
    ("scotland", "UK"),
    ("wales", "UK"),
    // Europe
    ("de", "Germany"),
    ("germany", "Germany"),
    ("deutschland", "Germany"),
    ("germnay", "Germany"),
    ("fr", "France"),
    ("france", "France"),
    ("nl", "Netherlands"),
    ("netherlands", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("netherland", "Netherlands"),
    ("holland", "Netherlands"),
    ("es", "Spain"),
    ("spain", "Spain"),
    ("it", "Italy"),
    ("italy", "Italy"),
    ("pl", "Poland"),
    ("poland", "Poland"),
    ("ie", "Ireland"),
    ("ireland", "Ireland"),
    ("pt", "Portugal"),
    ("portugal", "Portugal"),
    ("be", "Belgium"),
    ("belgium", "Belgium"),
    ("ch", "Switzerland"),
    ("switzerland", "Switzerland"),
    ("at", "Austria"),
    ("austria", "Austria"),
    ("se", "Sweden"),
    ("sweden", "Sweden"),
    ("dk", "Denmark"),
    ("denmark", "Denmark"),
    ("no", "Norway"),
    ("norway", "Norway"),
    ("fi", "Finland"),
    ("finland", "Finland"),
    ("cz", "Czech Republic"),
    ("czechia", "Czech Republic"),
    ("czech republic", "Czech Republic"),
    // Rest of the world
    ("ca", "Canada"),
    ("canada", "Canada"),
    ("mx", "Mexico"),
    ("mexico", "Mexico"),
    ("br", "Brazil"),
    ("brazil", "Brazil"),
    ("au", "Australia"),
    ("australia", "Australia"),
    ("in", "India"),
    ("india", "India"),
    ("sg", "Singapore"),
    ("singapore", "Singapore"),
    ("jp", "Japan"),
    ("japan", "Japan"),
    ("ae", "UAE"),
    ("uae", "UAE"),
    ("united arab emirates", "UAE"),
];

fn trim_segment(s: &str) -> &str {
    s.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
}

/// Map a raw country token to its canonical form. Unknown values pass through trimmed.
pub fn normalize_country(raw: &str) -> String {
    let trimmed = trim_segment(raw);
    let key = trimmed.to_lowercase();
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Country part of a location: the last comma segment, normalized.
///
/// A location without commas is normalized as a whole.
pub fn extract_country(location: &str) -> String {
    let segments: Vec<&str> = location.split(',').collect();
    if segments.len() >= 2 {
        normalize_country(segments[segments.len() - 1])
    } else {
        normalize_country(location)
    }
}

/// Location with the country segment removed.
pub fn extract_location_without_country(location: &str) -> String {
    let segments: Vec<&str> = location.split(',').collect();
    if segments.len() < 2 {
        return location.trim().to_string();
    }
    segments[..segments.len() - 1]
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn is_online(location: &str) -> bool {
    location.to_lowercase().contains("online")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_aliases_collapse_to_usa() {
        for raw in ["us", "USA", "United States", "u.s.a.", " US. "] {
            assert_eq!(normalize_country(raw), "USA", "alias {:?}", raw);
        }
    }

    #[test]
    fn country_is_last_segment() {
        assert_eq!(extract_country("Harness, New York, US"), "USA");
        assert_eq!(extract_country("Denver, CO, US"), "USA");
        assert_eq!(extract_country("London, united kingdom"), "UK");
        assert_eq!(extract_country("Amsterdam, The Netherlands."), "Netherlands");
    }

    #[test]
    fn unknown_country_passes_through_trimmed() {
        assert_eq!(extract_country("Tallinn, Estonia!"), "Estonia");
        assert_eq!(extract_country("Online"), "Online");
        assert_eq!(extract_country(""), "");
        assert_eq!(extract_country(","), "");
    }

    #[test]
    fn single_segment_is_normalized_whole() {
        assert_eq!(extract_country("germany"), "Germany");
    }

    #[test]
    fn location_drops_country_segment() {
        assert_eq!(
            extract_location_without_country("Harness, New York, US"),
            "Harness, New York"
        );
        assert_eq!(extract_location_without_country("Denver, CO, US"), "Denver, CO");
        assert_eq!(extract_location_without_country("  Online "), "Online");
    }

    #[test]
    fn online_detection() {
        assert!(is_online("Online"));
        assert!(is_online("Online (Zoom)"));
        assert!(!is_online("London, UK"));
    }
}
