use std::collections::HashSet;

// Alaska coastal marine zones served by the proxy
pub const DEFAULT_ZONES: &[&str] = &[
    "PKZ011", "PKZ012", "PKZ013", "PKZ021", "PKZ022", "PKZ031", "PKZ032", "PKZ033", "PKZ034",
    "PKZ035", "PKZ036", "PKZ041", "PKZ042", "PKZ043", "PKZ051", "PKZ052", "PKZ053", "PKZ121",
    "PKZ125", "PKZ126", "PKZ127", "PKZ128", "PKZ129", "PKZ130", "PKZ131", "PKZ132",
];

/// Allow-list of marine zone identifiers.
///
/// Lookups are case-insensitive; the catalogue is stored uppercase.
#[derive(Debug, Clone)]
pub struct ZoneValidator {
    zones: HashSet<String>,
}

impl ZoneValidator {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let zones = zones
            .into_iter()
            .map(|z| z.as_ref().trim().to_ascii_uppercase())
            .filter(|z| !z.is_empty())
            .collect();
        Self { zones }
    }

    // Absent and empty candidates are never valid
    pub fn validate(&self, candidate: Option<&str>) -> bool {
        match candidate {
            Some(zone) if !zone.is_empty() => self.zones.contains(&zone.to_ascii_uppercase()),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for ZoneValidator {
    fn default() -> Self {
        Self::new(DEFAULT_ZONES)
    }
}

/// Checks the `XXX###` shape of a zone code: three ASCII letters then three digits.
pub fn is_zone_format(zone: &str) -> bool {
    let bytes = zone.as_bytes();
    bytes.len() == 6
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}
