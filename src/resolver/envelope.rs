use serde::Serialize;

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
}

/// Result envelope: `{data, total, provenance, fallback}`.
///
/// `total` is omitted for single-item lookups and children listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub provenance: Provenance,
    pub fallback: bool,
}

impl<T> Resolved<T> {
    pub fn new(data: T, total: Option<usize>, provenance: Provenance) -> Self {
        Self {
            data,
            total,
            provenance,
            fallback: provenance == Provenance::Fallback,
        }
    }

    pub fn live(data: T, total: Option<usize>) -> Self {
        Self::new(data, total, Provenance::Live)
    }

    pub fn from_mirror(data: T, total: Option<usize>) -> Self {
        Self::new(data, total, Provenance::Fallback)
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Live mode is on and the media server is configured.
    pub remote: bool,
    /// The mirror database is open.
    pub local: bool,
}
