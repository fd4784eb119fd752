use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy)]
pub struct SampleLocation {
    pub name: &'static str,
    pub point: GeoPoint,
}

pub const SAMPLE_LOCATIONS: &[SampleLocation] = &[
    SampleLocation {
        name: "New York",
        point: GeoPoint::new(40.7128, -74.0060),
    },
    SampleLocation {
        name: "London",
        point: GeoPoint::new(51.5074, -0.1278),
    },
    SampleLocation {
        name: "Tokyo",
        point: GeoPoint::new(35.6762, 139.6503),
    },
    SampleLocation {
        name: "Sydney",
        point: GeoPoint::new(-33.8688, 151.2093),
    },
    SampleLocation {
        name: "Buenos Aires",
        point: GeoPoint::new(-34.6037, -58.3816),
    },
    SampleLocation {
        name: "Cape Town",
        point: GeoPoint::new(-33.9249, 18.4241),
    },
    SampleLocation {
        name: "Madrid",
        point: GeoPoint::new(40.4168, -3.7038),
    },
    SampleLocation {
        name: "Beijing",
        point: GeoPoint::new(39.9042, 116.4074),
    },
];

/// Case-insensitive lookup by name.
pub fn sample_location(name: &str) -> Option<&'static SampleLocation> {
    let name = name.trim();
    SAMPLE_LOCATIONS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let s = sample_location("  buenos aires ").expect("sample");
        assert_eq!(s.name, "Buenos Aires");
        assert!(sample_location("Atlantis").is_none());
    }
}
