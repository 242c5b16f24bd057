use serde::{Deserialize, Serialize};
use std::fmt;

/// Anatomical grouping of electrodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Frontal,
    Central,
    Temporal,
    Parietal,
    Occipital,
    Other,
}

impl Region {
    /// Display order of the channel groups.
    pub const ORDER: [Region; 6] = [
        Region::Frontal,
        Region::Central,
        Region::Temporal,
        Region::Parietal,
        Region::Occipital,
        Region::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Frontal => "Frontal",
            Region::Central => "Central",
            Region::Temporal => "Temporal",
            Region::Parietal => "Parietal",
            Region::Occipital => "Occipital",
            Region::Other => "Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region of a canonical upper-case 10-20/10-10 label. Never returns `Other`;
/// callers decide what an unknown label means.
pub fn region_of(label: &str) -> Option<Region> {
    let region = match label {
        "FP1" | "FP2" | "FPZ" | "AF3" | "AF4" | "AF7" | "AF8" | "AFZ" | "F1" | "F2" | "F3"
        | "F4" | "F5" | "F6" | "F7" | "F8" | "FZ" => Region::Frontal,
        "C1" | "C2" | "C3" | "C4" | "C5" | "C6" | "CZ" | "FC1" | "FC2" | "FC3" | "FC4"
        | "FC5" | "FC6" | "FCZ" => Region::Central,
        "T3" | "T4" | "T5" | "T6" | "T7" | "T8" | "FT7" | "FT8" | "FT9" | "FT10" | "TP7"
        | "TP8" | "TP9" | "TP10" => Region::Temporal,
        "P1" | "P2" | "P3" | "P4" | "P5" | "P6" | "P7" | "P8" | "PZ" | "CP1" | "CP2" | "CP3"
        | "CP4" | "CP5" | "CP6" | "CPZ" => Region::Parietal,
        "O1" | "O2" | "OZ" | "PO3" | "PO4" | "PO7" | "PO8" | "POZ" => Region::Occipital,
        _ => return None,
    };
    Some(region)
}

pub(crate) fn bucket_index(region: Region) -> usize {
    region as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_standard_labels() {
        assert_eq!(region_of("FP1"), Some(Region::Frontal));
        assert_eq!(region_of("CZ"), Some(Region::Central));
        assert_eq!(region_of("T5"), Some(Region::Temporal));
        assert_eq!(region_of("PZ"), Some(Region::Parietal));
        assert_eq!(region_of("O2"), Some(Region::Occipital));
    }

    #[test]
    fn unknown_and_lowercase_labels_have_no_region() {
        assert_eq!(region_of("ECG"), None);
        assert_eq!(region_of("fp1"), None);
        assert_eq!(region_of(""), None);
    }

    #[test]
    fn order_matches_discriminants() {
        for (idx, region) in Region::ORDER.iter().enumerate() {
            assert_eq!(bucket_index(*region), idx);
        }
    }
}
