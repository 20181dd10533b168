pub mod analysis;
pub mod feature;
pub mod geometry;
pub mod layer;
pub mod options;

pub use analysis::{
    GroupCounts, GroupKey, JoinDiagnostics, SpatialAnalysisResult, SpatialMatch, TargetMatch,
    GROUP_KEY_SEPARATOR,
};
pub use feature::{
    Feature, FeatureCollection, Properties, PropertyValue, ReferenceFeature, TargetFeature,
    UNKNOWN,
};
pub use geometry::{Geometry, GeometryType};
pub use layer::{LayerConfig, ReferenceDisplayFields, ReferenceLayer, TargetDatasetConfig, TargetLayer};
pub use options::{ContainmentMode, JoinStrategy};
