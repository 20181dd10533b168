use serde::{Deserialize, Serialize};

use super::geometry::GeometryType;

/// Grouping configuration for one target dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TargetDatasetConfig {
    /// Property names whose values form the group key, in order
    #[serde(default)]
    pub group_by_fields: Vec<String>,
}

impl TargetDatasetConfig {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { group_by_fields: fields.into_iter().map(Into::into).collect() }
    }
}

/// Reference property names read by reports and detail views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDisplayFields {
    pub title: String,
    pub department: String,
    pub start_date: String,
    pub end_date: String,
    pub project_number: String,
    pub cost: String,
    pub manager_name: String,
    pub manager_phone: String,
    pub manager_email: String,
}

impl Default for ReferenceDisplayFields {
    fn default() -> Self {
        Self {
            title: "ProjectTitle".to_string(),
            department: "ProgramName".to_string(),
            start_date: "StartDate".to_string(),
            end_date: "EndDate".to_string(),
            project_number: "ProjectNumber".to_string(),
            cost: "ConstructionCost".to_string(),
            manager_name: "PM_Name".to_string(),
            manager_phone: "PM_Phone".to_string(),
            manager_email: "PM_EMail".to_string(),
        }
    }
}

/// Reference (boundary) layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLayer {
    pub name: String,
    pub file: String,

    #[serde(default = "default_reference_geometry")]
    pub geometry_type: GeometryType,

    /// Property identifying a reference feature for render sync
    #[serde(default = "default_id_field")]
    pub id_field: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub display: ReferenceDisplayFields,
}

/// Target (asset) layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetLayer {
    pub name: String,
    pub file: String,

    #[serde(default)]
    pub geometry_type: GeometryType,

    #[serde(default)]
    pub group_by_fields: Vec<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub size: Option<f64>,
}

impl TargetLayer {
    pub fn dataset_config(&self) -> TargetDatasetConfig {
        TargetDatasetConfig { group_by_fields: self.group_by_fields.clone() }
    }
}

/// Reference layer plus the ordered target layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub reference: ReferenceLayer,

    #[serde(default, rename = "target")]
    pub targets: Vec<TargetLayer>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceLayer {
                name: "CIP Projects".to_string(),
                file: "data/cip_projects.json".to_string(),
                geometry_type: GeometryType::Polygon,
                id_field: default_id_field(),
                color: Some("#3B82F6".to_string()),
                display: ReferenceDisplayFields::default(),
            },
            targets: vec![TargetLayer {
                name: "EV Chargers".to_string(),
                file: "data/ev_chargers.json".to_string(),
                geometry_type: GeometryType::Point,
                group_by_fields: vec!["type".to_string(), "status".to_string()],
                color: Some("#10B981".to_string()),
                size: Some(6.0),
            }],
        }
    }
}

impl LayerConfig {
    /// Grouping configs aligned with `targets`
    pub fn target_configs(&self) -> Vec<TargetDatasetConfig> {
        self.targets.iter().map(TargetLayer::dataset_config).collect()
    }

    /// Display name of target layer `index`, falling back to `Target N`
    pub fn target_name(&self, index: usize) -> String {
        self.targets
            .get(index)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("Target {}", index + 1))
    }
}

fn default_reference_geometry() -> GeometryType {
    GeometryType::Polygon
}

fn default_id_field() -> String {
    "OBJECTID".to_string()
}
