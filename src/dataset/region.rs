use serde::Serialize;

/// Two-valued region classification derived from the listing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    #[serde(rename = "Region A")]
    A,
    #[serde(rename = "Region B")]
    B,
}

/// Listing-name prefixes that place a unit in region A.
const REGION_A_PREFIXES: [char; 2] = ['C', 'G'];

impl Region {
    pub fn from_listing_name(name: Option<&str>) -> Self {
        match name {
            Some(name) if name.starts_with(REGION_A_PREFIXES) => Region::A,
            _ => Region::B,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::A => "Region A",
            Region::B => "Region B",
        }
    }

    /// Labels accepted as a region filter value; the state names come from the legacy dashboard.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Region::A => &["Region A", "Paraná"],
            Region::B => &["Region B", "Santa Catarina"],
        }
    }

    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.aliases().iter().any(|alias| *alias == label)
    }
}
