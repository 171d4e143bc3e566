use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LodgeError;
use crate::model::record::AttrValue;

/// Closed registry of record types
///
/// Every record belongs to exactly one of these kinds. Class names arriving
/// from the console are resolved through `FromStr`; an unknown name is a
/// `ModelNotFound` error. This enum is the explicit registry that replaces
/// dynamic class-name evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ModelKind {
    /// All registered kinds, in registry order
    pub const ALL: [ModelKind; 7] = [
        ModelKind::BaseModel,
        ModelKind::User,
        ModelKind::State,
        ModelKind::City,
        ModelKind::Amenity,
        ModelKind::Place,
        ModelKind::Review,
    ];

    /// The registered class name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::BaseModel => "BaseModel",
            ModelKind::User => "User",
            ModelKind::State => "State",
            ModelKind::City => "City",
            ModelKind::Amenity => "Amenity",
            ModelKind::Place => "Place",
            ModelKind::Review => "Review",
        }
    }

    /// Seed attributes carried by a freshly created record of this kind
    ///
    /// These are the class-level defaults of the domain models: string
    /// fields start empty, counters at 0, coordinates at 0.0. The seeded
    /// value also fixes the type that later updates coerce into.
    pub fn seed_attributes(&self) -> BTreeMap<String, AttrValue> {
        let text: &[&str] = match self {
            ModelKind::BaseModel => &[],
            ModelKind::User => &["email", "password", "first_name", "last_name"],
            ModelKind::State => &["name"],
            ModelKind::City => &["state_id", "name"],
            ModelKind::Amenity => &["name"],
            ModelKind::Place => &["city_id", "user_id", "name", "description"],
            ModelKind::Review => &["place_id", "user_id", "text"],
        };
        let mut attrs: BTreeMap<String, AttrValue> = text
            .iter()
            .map(|name| (name.to_string(), AttrValue::Str(String::new())))
            .collect();
        if let ModelKind::Place = self {
            for counter in ["number_rooms", "number_bathrooms", "max_guest", "price_by_night"] {
                attrs.insert(counter.to_string(), AttrValue::Int(0));
            }
            attrs.insert("latitude".to_string(), AttrValue::Float(0.0));
            attrs.insert("longitude".to_string(), AttrValue::Float(0.0));
        }
        attrs
    }

    /// Check whether a class name is registered
    pub fn is_registered(name: &str) -> bool {
        ModelKind::from_str(name).is_ok()
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = LodgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| LodgeError::ModelNotFound {
                class_name: name.to_string(),
            })
    }
}
