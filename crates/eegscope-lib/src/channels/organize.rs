use super::taxonomy::{bucket_index, region_of, Region};
use serde::{Deserialize, Serialize};

/// Channels sharing an anatomical region, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub name: Region,
    pub channels: Vec<String>,
}

/// Channel list for the picker: the flat `available` list in input order plus
/// the grouped view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedChannels {
    pub available: Vec<String>,
    pub groups: Vec<ChannelGroup>,
}

impl DetectedChannels {
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn group(&self, region: Region) -> Option<&ChannelGroup> {
        self.groups.iter().find(|group| group.name == region)
    }
}

/// Bucket raw channel names by region.
///
/// Names are only upper-cased here; stripping happens during ingestion.
/// Duplicates are kept, both in `available` and in the owning group.
pub fn organize<S: AsRef<str>>(raw_names: &[S]) -> DetectedChannels {
    let mut buckets: [Vec<String>; 6] = Default::default();
    let available: Vec<String> = raw_names
        .iter()
        .map(|name| name.as_ref().to_uppercase())
        .collect();
    for name in &available {
        let region = region_of(name).unwrap_or(Region::Other);
        buckets[bucket_index(region)].push(name.clone());
    }
    let groups = Region::ORDER
        .iter()
        .zip(buckets)
        .filter(|(_, channels)| !channels.is_empty())
        .map(|(region, mut channels)| {
            channels.sort();
            ChannelGroup {
                name: *region,
                channels,
            }
        })
        .collect();
    DetectedChannels { available, groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_names(detected: &DetectedChannels) -> Vec<Region> {
        detected.groups.iter().map(|group| group.name).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let detected = organize::<&str>(&[]);
        assert!(detected.available.is_empty());
        assert!(detected.groups.is_empty());
    }

    #[test]
    fn groups_follow_fixed_order() {
        let detected = organize(&["o1", "Misc", "cz", "fp2", "Fp1", "T3", "PZ"]);
        assert_eq!(
            group_names(&detected),
            vec![
                Region::Frontal,
                Region::Central,
                Region::Temporal,
                Region::Parietal,
                Region::Occipital,
                Region::Other
            ]
        );
        assert_eq!(
            detected.group(Region::Frontal).unwrap().channels,
            vec!["FP1", "FP2"]
        );
        assert_eq!(detected.group(Region::Other).unwrap().channels, vec!["MISC"]);
    }

    #[test]
    fn available_keeps_input_order() {
        let detected = organize(&["o1", "cz", "Fp1"]);
        assert_eq!(detected.available, vec!["O1", "CZ", "FP1"]);
    }

    #[test]
    fn skips_empty_buckets() {
        let detected = organize(&["O2", "O1"]);
        assert_eq!(group_names(&detected), vec![Region::Occipital]);
        assert_eq!(detected.groups[0].channels, vec!["O1", "O2"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let detected = organize(&["Cz", "CZ", "X"]);
        assert_eq!(detected.available, vec!["CZ", "CZ", "X"]);
        assert_eq!(
            detected.group(Region::Central).unwrap().channels,
            vec!["CZ", "CZ"]
        );
    }

    #[test]
    fn groups_cover_the_input_multiset() {
        let input = ["fp1", "FP1", "ecg", "T4", "c3", "oz", "emg", "P3", "F8"];
        let detected = organize(&input);
        let mut grouped: Vec<String> = detected
            .groups
            .iter()
            .flat_map(|group| group.channels.iter().cloned())
            .collect();
        let mut expected: Vec<String> = input.iter().map(|name| name.to_uppercase()).collect();
        grouped.sort();
        expected.sort();
        assert_eq!(grouped, expected);
        for group in &detected.groups {
            let mut sorted = group.channels.clone();
            sorted.sort();
            assert_eq!(group.channels, sorted);
        }
    }

    #[test]
    fn serializes_region_names() {
        let detected = organize(&["Cz"]);
        let json = serde_json::to_value(&detected).unwrap();
        assert_eq!(json["groups"][0]["name"], "Central");
        assert_eq!(json["available"][0], "CZ");
    }
}
