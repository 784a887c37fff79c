//! Upload categories
//!
//! The four canonical upload classes. Wire strings are parsed into this enum once,
//! at each boundary (API query, device server query, sync manifest); everything
//! past the boundary works with the enum and its fixed subdirectory mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Closed set of upload categories, each mapped to a fixed storage subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum FileCategory {
    Documents,
    Payments,
    Photos,
    Cancellations,
}

impl FileCategory {
    /// All categories, in the order their subdirectories are created.
    pub const ALL: [FileCategory; 4] = [
        FileCategory::Documents,
        FileCategory::Payments,
        FileCategory::Photos,
        FileCategory::Cancellations,
    ];

    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Documents => "documents",
            FileCategory::Payments => "payments",
            FileCategory::Photos => "photos",
            FileCategory::Cancellations => "cancellations",
        }
    }

    /// Subdirectory name under a storage root. Identical to the wire string; kept
    /// as a separate accessor so the path mapping stays a single explicit site.
    pub fn subdir(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for FileCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents" => Ok(FileCategory::Documents),
            "payments" => Ok(FileCategory::Payments),
            "photos" => Ok(FileCategory::Photos),
            "cancellations" => Ok(FileCategory::Cancellations),
            other => Err(AppError::InvalidInput(format!(
                "Unknown file category: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_strings() {
        assert_eq!(
            "documents".parse::<FileCategory>().unwrap(),
            FileCategory::Documents
        );
        assert_eq!(
            "cancellations".parse::<FileCategory>().unwrap(),
            FileCategory::Cancellations
        );
    }

    #[test]
    fn rejects_unknown_and_case_variants() {
        assert!("invoices".parse::<FileCategory>().is_err());
        assert!("Documents".parse::<FileCategory>().is_err());
        assert!("".parse::<FileCategory>().is_err());
    }

    #[test]
    fn subdir_matches_wire_string() {
        for cat in FileCategory::ALL {
            assert_eq!(cat.subdir(), cat.as_str());
            assert_eq!(cat.as_str().parse::<FileCategory>().unwrap(), cat);
        }
    }
}
