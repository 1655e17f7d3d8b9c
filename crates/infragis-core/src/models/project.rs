use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Geometry;

/// An infrastructure project as stored by the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub project_name: String,
    pub project_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub start_date: String,
    pub finish_date: String,
    pub contractor: String,
    pub budget: f64,
    pub description: String,

    /// Source geometry for projects imported from polygons or lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl ProjectRecord {
    /// The geometry to draw for this project: the source geometry when
    /// present, otherwise a point at its coordinates
    pub fn display_geometry(&self) -> Geometry {
        self.geometry.clone().unwrap_or_else(|| Geometry::point(self.longitude, self.latitude))
    }
}
