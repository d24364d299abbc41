//! Downtown San Jose addresses used as preset destinations.

/// A preset destination: catalogue id, display name and street address.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: usize,
    pub name: &'static str,
    pub address: &'static str,
}

impl Address {
    pub const fn new(id: usize, name: &'static str, address: &'static str) -> Self {
        Self { id, name, address }
    }
}

pub const FIXED_START: &str = "4 N 2nd St Suite 150, San Jose, CA 95113";

// ============================================================================
// Preset destinations
// ============================================================================

pub const PRESETS: &[Address] = &[
    Address::new(1, "San Pedro Square Market", "87 N San Pedro St, San Jose, CA 95110"),
    Address::new(2, "SAP Center", "525 W Santa Clara St, San Jose, CA 95113"),
    Address::new(3, "Tech Interactive", "201 S Market St, San Jose, CA 95113"),
    Address::new(4, "San Jose Museum of Art", "110 S Market St, San Jose, CA 95113"),
    Address::new(5, "Japantown", "565 N 5th St, San Jose, CA 95112"),
    Address::new(6, "San Jose State University", "1 Washington Sq, San Jose, CA 95192"),
];

/// Same presets in the JSON shape `PresetCatalogue::from_json_str` reads.
pub fn presets_json() -> String {
    let entries: Vec<String> = PRESETS
        .iter()
        .map(|p| {
            format!(
                r#"{{ "id": {}, "name": "{}", "address": "{}" }}"#,
                p.id, p.name, p.address
            )
        })
        .collect();
    format!("[{}]", entries.join(", "))
}
