//! Profile merging
//!
//! Fragments of the same profile are folded in load order (later wins), then
//! every named profile is laid over the merged default properties. The
//! default profile itself is not part of the result.

use indexmap::IndexMap;

use crate::property::{Profile, ProfileMap, ProfiledProperties, PropertySet};

/// Merge fragments into one self-contained property set per named profile
pub fn merge(fragments: &[ProfiledProperties]) -> ProfileMap {
    let mut groups: IndexMap<&Profile, PropertySet> = IndexMap::new();
    for fragment in fragments {
        let merged = groups.entry(&fragment.profile).or_default();
        overlay(merged, &fragment.properties);
    }

    let defaults = groups
        .get(&Profile::Default)
        .cloned()
        .unwrap_or_default();

    let mut result = ProfileMap::new();
    for (profile, properties) in groups {
        let Profile::Named(name) = profile else {
            continue;
        };

        let mut effective = defaults.clone();
        overlay(&mut effective, &properties);
        log::debug!(
            "Profile {}: {} properties, {} of its own",
            name,
            effective.len(),
            properties.len()
        );
        result.insert(
            name.clone(),
            ProfiledProperties::new(profile.clone(), effective),
        );
    }

    result
}

/// Copy every entry of `top` into `base`, replacing values of equal keys
fn overlay(base: &mut PropertySet, top: &PropertySet) {
    for (key, value) in top {
        base.insert(key.clone(), value.clone());
    }
}
