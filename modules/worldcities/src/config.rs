use serde::{Deserialize, Serialize};

/// Configuration for the worldcities module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldCitiesConfig {
    /// Page size applied when a listing request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Hard cap on the page size a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for WorldCitiesConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    1000
}
