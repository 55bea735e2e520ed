//! Remote image locations.

use serde::{Deserialize, Serialize};

/// The repository that hosts listing photos.
///
/// A photo path `p` resolves to
/// `https://{host}/{owner}/{repo}/{branch}/artefacts/{p}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageHost {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for ImageHost {
    fn default() -> Self {
        Self {
            host: "raw.githubusercontent.com".to_string(),
            owner: "rdapaz".to_string(),
            repo: "ebay_listings".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl ImageHost {
    /// Map a local photo path to its hosted URL. An empty path stays empty.
    pub fn resolve(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }

        format!(
            "https://{}/{}/{}/{}/artefacts/{}",
            self.host, self.owner, self.repo, self.branch, path
        )
    }
}
