//! Fuzzy matching of coordinate names onto the canonical set.

use std::collections::BTreeMap;

/// Canonical dimension names with their commonly seen spellings.
///
/// Order matters: earlier canonical names claim their match first.
pub fn default_match_table() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("time", vec!["month", "time", "t"]),
        ("depth", vec!["depth", "z", "lev", "z_t", "z_l"]),
        ("lat", vec!["lat", "latitude", "y"]),
        ("lon", vec!["lon", "longitude", "x"]),
    ]
}

/// Guess renames from existing dimension names to canonical ones.
///
/// Two passes per canonical name: a case-insensitive exact match against
/// the candidate spellings, then a substring match (either direction, three
/// characters or more to keep `t` from claiming `lat`). Each existing name
/// and each canonical target is claimed at most once; names already
/// canonical stay put.
pub fn guess_coord_renames(
    names: &[&str],
    table: &[(&'static str, Vec<&'static str>)],
) -> BTreeMap<String, String> {
    let mut renames = BTreeMap::new();
    let mut claimed: Vec<&str> = Vec::new();

    for (target, candidates) in table {
        if names.contains(target) {
            claimed.push(*target);
            continue;
        }

        let exact = names.iter().copied().find(|name| {
            !claimed.contains(name)
                && candidates
                    .iter()
                    .any(|c| name.eq_ignore_ascii_case(c))
        });
        let matched = exact.or_else(|| {
            names.iter().copied().find(|name| {
                let lower = name.to_ascii_lowercase();
                !claimed.contains(name)
                    && lower.len() >= 3
                    && candidates.iter().any(|c| {
                        c.len() >= 3 && (lower.contains(c) || c.contains(lower.as_str()))
                    })
            })
        });

        if let Some(name) = matched {
            claimed.push(name);
            renames.insert(name.to_string(), target.to_string());
        }
    }

    renames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(names: &[&str]) -> BTreeMap<String, String> {
        guess_coord_renames(names, &default_match_table())
    }

    #[test]
    fn test_exact_case_insensitive() {
        let renames = guess(&["TIME", "Latitude", "longitude"]);
        assert_eq!(renames["TIME"], "time");
        assert_eq!(renames["Latitude"], "lat");
        assert_eq!(renames["longitude"], "lon");
    }

    #[test]
    fn test_canonical_names_untouched() {
        let renames = guess(&["time", "lat", "lon"]);
        assert!(renames.is_empty());
    }

    #[test]
    fn test_substring_matching() {
        let renames = guess(&["time_counter", "nav_lat_points"]);
        assert_eq!(renames["time_counter"], "time");
        assert_eq!(renames["nav_lat_points"], "lat");
    }

    #[test]
    fn test_short_candidates_need_exact_match() {
        // "t" must not claim "lat"-like names by substring
        let renames = guess(&["lat", "t"]);
        assert_eq!(renames.get("t").map(String::as_str), Some("time"));
        assert!(!renames.contains_key("lat"));
    }

    #[test]
    fn test_month_maps_to_time() {
        let renames = guess(&["month", "lev"]);
        assert_eq!(renames["month"], "time");
        assert_eq!(renames["lev"], "depth");
    }
}
