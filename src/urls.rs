use url::Url;

use crate::ship::ShipId;

/// The path segment everything is mounted under.
pub const API_PREFIX: &str = "rest";

/// Convenience wrapper for URL generation functions.
#[derive(Clone)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,

    /// Path segment for all ship-related actions.
    pub(crate) ships_path: String,
}

impl Urls {
    /// Create a new instance. `ships_path` is a single path segment
    /// without slashes.
    pub fn new(base: impl AsRef<str>, ships_path: impl Into<String>) -> Self {
        let base =
            Url::parse(base.as_ref()).unwrap_or_else(|_| panic!("parse {} as URL", base.as_ref()));

        Urls {
            base,
            ships_path: ships_path.into(),
        }
    }

    pub fn ships(&self) -> Url {
        self.base
            .join(&format!("{}/{}/", API_PREFIX, self.ships_path))
            .expect("get ships URL")
    }

    pub fn ship(&self, id: ShipId) -> Url {
        self.ships()
            .join(&id.to_string())
            .unwrap_or_else(|_| panic!("get URL for ship {}", id))
    }
}
