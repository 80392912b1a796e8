//! Blocklist lookup of IP features.

use tracing::{debug, info};

use super::Classifier;
use crate::error::Result;
use crate::storage::{ClfResult, FeatureId, FlowFeatures, IpAddress};
use crate::utils::IpPrefix;

pub const BLOCKED: f64 = 1.0;
pub const NOT_BLOCKED: f64 = 0.0;

/// Flags a flow when any of its assigned IP features lies inside a blocklisted prefix.
///
/// Lookup is a binary search over a sorted index from which every prefix
/// nested inside another one has been removed. Without nesting, the only
/// candidate that can contain an address is the last index entry not greater
/// than it.
#[derive(Debug, Clone, Default)]
pub struct IpPrefixClassifier {
    blocklist: Vec<IpPrefix>,
    index: Vec<IpPrefix>,
    feature_ids: Vec<FeatureId>,
}

impl IpPrefixClassifier {
    pub fn new(blocklist: Vec<IpPrefix>) -> Self {
        let mut classifier = Self::default();
        classifier.update_blocklist(blocklist);
        classifier
    }

    /// Replace the whole blocklist.
    pub fn update_blocklist(&mut self, mut blocklist: Vec<IpPrefix>) {
        blocklist.sort();
        blocklist.dedup();

        let mut index: Vec<IpPrefix> = Vec::with_capacity(blocklist.len());
        for prefix in &blocklist {
            match index.last() {
                Some(last) if last.contains(prefix) => {}
                _ => index.push(*prefix),
            }
        }

        info!(
            prefixes = blocklist.len(),
            indexed = index.len(),
            "blocklist updated"
        );
        self.blocklist = blocklist;
        self.index = index;
    }

    /// The blocklist in sorted order.
    pub fn blocklist(&self) -> &[IpPrefix] {
        &self.blocklist
    }

    /// True if `address` lies inside some blocklisted prefix.
    pub fn is_blocked(&self, address: &IpAddress) -> bool {
        let is_v6 = address.is_ipv6();
        let candidates = self
            .index
            .partition_point(|p| (p.prefix().is_ipv6(), p.prefix()) <= (is_v6, address));
        candidates > 0 && self.index[candidates - 1].matches(address)
    }
}

impl Classifier for IpPrefixClassifier {
    fn set_feature_source_ids(&mut self, ids: &[FeatureId]) {
        self.feature_ids = ids.to_vec();
    }

    fn feature_source_ids(&self) -> &[FeatureId] {
        &self.feature_ids
    }

    fn classify(&mut self, flow: &FlowFeatures) -> Result<ClfResult> {
        for &id in &self.feature_ids {
            let address = flow.get::<IpAddress>(id)?;
            if self.is_blocked(address) {
                debug!(feature = id, %address, "address is blocklisted");
                return Ok(ClfResult::Scalar(BLOCKED));
            }
        }
        Ok(ClfResult::Scalar(NOT_BLOCKED))
    }
}
