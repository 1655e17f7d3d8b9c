//! GeoJSON documents: a single Feature or a FeatureCollection.
//!
//! Conversion goes through `serde_json::Value` by hand so that unknown members
//! are preserved. Collection members are read leniently: an object with a
//! missing or unexpected `type` is still a feature, and members that are not
//! objects at all are carried through untouched so that rewriting a document
//! never drops anything from it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::geometry::{FeatureGeometry, Geometry};
use crate::error::{InfragisError, Result};

/// The `type` member of a feature as it was read
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeatureTag {
    #[default]
    Feature,
    /// No `type` member
    Missing,
    /// Anything other than "Feature"
    Other(Value),
}

/// GeoJSON feature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub id: Option<Value>,

    /// None for features with a `null` or missing geometry
    pub geometry: Option<FeatureGeometry>,

    pub properties: Map<String, Value>,

    /// Members other than type, id, geometry and properties
    pub foreign_members: Map<String, Value>,

    pub tag: FeatureTag,
}

impl Feature {
    /// Create a feature from a geometry and its properties
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            geometry: Some(FeatureGeometry::Known(geometry)),
            properties,
            ..Self::default()
        }
    }

    /// The geometry if it is one of the supported kinds
    pub fn known_geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref().and_then(FeatureGeometry::known)
    }

    pub fn known_geometry_mut(&mut self) -> Option<&mut Geometry> {
        self.geometry.as_mut().and_then(FeatureGeometry::known_mut)
    }

    /// Look up a property by key
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Parse a feature, requiring `"type": "Feature"`
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(InfragisError::InvalidDocument {
                reason: "feature must be a JSON object".to_string(),
            });
        };

        let feature = Self::from_object(object);
        match &feature.tag {
            FeatureTag::Feature => Ok(feature),
            FeatureTag::Other(other) => Err(InfragisError::InvalidDocument {
                reason: format!("expected type \"Feature\", found {}", other),
            }),
            FeatureTag::Missing => Err(InfragisError::InvalidDocument {
                reason: "feature is missing its \"type\" member".to_string(),
            }),
        }
    }

    /// Read any JSON object as a feature, recording its `type` as found
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let tag = match object.remove("type") {
            Some(Value::String(kind)) if kind == "Feature" => FeatureTag::Feature,
            Some(other) => FeatureTag::Other(other),
            None => FeatureTag::Missing,
        };

        let id = object.remove("id");
        let geometry = match object.remove("geometry") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(FeatureGeometry::from_value(raw)),
        };
        let properties = match object.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };

        Self { id, geometry, properties, foreign_members: object, tag }
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        match &self.tag {
            FeatureTag::Feature => {
                object.insert("type".to_string(), Value::String("Feature".to_string()));
            }
            FeatureTag::Other(other) => {
                object.insert("type".to_string(), other.clone());
            }
            FeatureTag::Missing => {}
        }
        if let Some(id) = &self.id {
            object.insert("id".to_string(), id.clone());
        }
        object.insert(
            "geometry".to_string(),
            self.geometry.as_ref().map(FeatureGeometry::to_value).unwrap_or(Value::Null),
        );
        object.insert("properties".to_string(), Value::Object(self.properties.clone()));
        for (key, value) in &self.foreign_members {
            object.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(object)
    }
}

/// GeoJSON feature collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,

    /// Entries of the `features` array that are not JSON objects, keyed by
    /// their position in that array
    pub unreadable: Vec<(usize, Value)>,

    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features, ..Self::default() }
    }

    fn members_to_value(&self) -> Value {
        let mut members: Vec<Value> = self.features.iter().map(Feature::to_value).collect();
        for (index, raw) in &self.unreadable {
            members.insert((*index).min(members.len()), raw.clone());
        }
        Value::Array(members)
    }
}

/// An importable GeoJSON document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl Document {
    /// Parse a document from GeoJSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| InfragisError::InvalidDocument {
            reason: format!("not valid JSON: {}", e),
        })?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed JSON value
    ///
    /// Only Feature and FeatureCollection objects are accepted. Collection
    /// members are read with [`Feature::from_object`]; non-object members are
    /// kept aside with a debug log.
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_string);
        match kind.as_deref() {
            Some("Feature") => Feature::from_value(value).map(Document::Feature),
            Some("FeatureCollection") => {
                let mut object = match value {
                    Value::Object(object) => object,
                    _ => return Err(InfragisError::InvalidDocument { reason: "not an object".to_string() }),
                };
                object.remove("type");
                let raw_features = match object.remove("features") {
                    Some(Value::Array(features)) => features,
                    _ => {
                        return Err(InfragisError::InvalidDocument {
                            reason: "FeatureCollection has no \"features\" array".to_string(),
                        })
                    }
                };

                let mut features = Vec::with_capacity(raw_features.len());
                let mut unreadable = Vec::new();
                for (index, raw) in raw_features.into_iter().enumerate() {
                    match raw {
                        Value::Object(member) => {
                            let feature = Feature::from_object(member);
                            if feature.tag != FeatureTag::Feature {
                                tracing::debug!(index, "Collection member is not typed as a Feature");
                            }
                            features.push(feature);
                        }
                        other => {
                            tracing::debug!(index, "Keeping non-object collection member as is");
                            unreadable.push((index, other));
                        }
                    }
                }

                Ok(Document::FeatureCollection(FeatureCollection {
                    features,
                    unreadable,
                    foreign_members: object,
                }))
            }
            Some(other) => Err(InfragisError::InvalidDocument {
                reason: format!("expected Feature or FeatureCollection, found {}", other),
            }),
            None => Err(InfragisError::InvalidDocument {
                reason: "document has no \"type\" member".to_string(),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Document::Feature(feature) => feature.to_value(),
            Document::FeatureCollection(collection) => {
                let mut object = Map::new();
                object.insert("type".to_string(), Value::String("FeatureCollection".to_string()));
                object.insert("features".to_string(), collection.members_to_value());
                for (key, value) in &collection.foreign_members {
                    object.entry(key.clone()).or_insert_with(|| value.clone());
                }
                Value::Object(object)
            }
        }
    }

    /// Pretty-printed GeoJSON text
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// The features of the document, a single one for a bare Feature
    pub fn features(&self) -> &[Feature] {
        match self {
            Document::Feature(feature) => std::slice::from_ref(feature),
            Document::FeatureCollection(collection) => &collection.features,
        }
    }

    pub fn features_mut(&mut self) -> &mut [Feature] {
        match self {
            Document::Feature(feature) => std::slice::from_mut(feature),
            Document::FeatureCollection(collection) => &mut collection.features,
        }
    }

    /// Iterate over the supported geometries, skipping null and unrecognized ones
    pub fn geometries(&self) -> impl Iterator<Item = &Geometry> {
        self.features().iter().filter_map(Feature::known_geometry)
    }

    pub fn geometries_mut(&mut self) -> impl Iterator<Item = &mut Geometry> {
        self.features_mut().iter_mut().filter_map(Feature::known_geometry_mut)
    }
}

impl From<FeatureCollection> for Document {
    fn from(collection: FeatureCollection) -> Self {
        Document::FeatureCollection(collection)
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Feature::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(value).map_err(serde::de::Error::custom)
    }
}
