//! Value types shared by classifiers: addresses, feature records and results.

pub mod clf_result;
pub mod data_variant;
pub mod flow_features;
pub mod ip_address;

pub use clf_result::ClfResult;
pub use data_variant::{DataVariant, VariantType};
pub use flow_features::{FeatureId, FlowFeatures};
pub use ip_address::{Endianness, IpAddress, IpVersion};
