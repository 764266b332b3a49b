//! Property record and the validated create/patch payloads derived from requests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque record identifier. Assigned at creation, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

impl PropertyId {
    pub fn new() -> Self {
        PropertyId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PropertyId {
    fn from(u: Uuid) -> Self {
        PropertyId(u)
    }
}

impl FromStr for PropertyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(PropertyId)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 3] = [
        PropertyStatus::Available,
        PropertyStatus::Rented,
        PropertyStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid enum value. Expected 'available' | 'rented' | 'maintenance', received '{}'",
            self.0
        )
    }
}

impl FromStr for PropertyStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Location {
    pub fn apply(&mut self, patch: LocationPatch) {
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(zip_code) = patch.zip_code {
            self.zip_code = zip_code;
        }
    }
}

/// One stored property record, as returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[schema(value_type = String, format = Uuid)]
    pub id: PropertyId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn from_new(id: PropertyId, new: NewProperty, now: DateTime<Utc>) -> Self {
        Property {
            id,
            title: new.title,
            description: new.description,
            price: new.price,
            location: new.location,
            features: new.features,
            images: new.images,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite only the supplied fields and move `updated_at` forward.
    pub fn apply_patch(&mut self, patch: PropertyPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(location) = patch.location {
            self.location.apply(location);
        }
        if let Some(features) = patch.features {
            self.features = features;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = next_timestamp(self.updated_at, now);
    }
}

/// Strictly later than `previous`, even when the clock has not advanced.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}

/// Fully validated create payload: defaults applied, text trimmed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: PropertyStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.city.is_none() && self.state.is_none() && self.zip_code.is_none()
    }
}

/// Deep-partial update: `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Property {
        let now = Utc::now();
        Property::from_new(
            PropertyId::new(),
            NewProperty {
                title: "Loft".into(),
                description: "Open plan loft near the river".into(),
                price: 1200.0,
                location: Location {
                    address: "1 Quay".into(),
                    city: "Bristol".into(),
                    state: "Avon".into(),
                    zip_code: "BS1".into(),
                },
                features: vec![],
                images: vec![],
                status: PropertyStatus::Available,
            },
            now,
        )
    }

    #[test]
    fn status_round_trips_through_str() {
        for st in PropertyStatus::ALL {
            assert_eq!(st.as_str().parse::<PropertyStatus>(), Ok(st));
        }
        assert!("sold".parse::<PropertyStatus>().is_err());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut p = sample();
        let before = p.clone();
        p.apply_patch(
            PropertyPatch {
                status: Some(PropertyStatus::Rented),
                location: Some(LocationPatch {
                    city: Some("Bath".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            before.updated_at,
        );
        assert_eq!(p.status, PropertyStatus::Rented);
        assert_eq!(p.location.city, "Bath");
        assert_eq!(p.location.address, before.location.address);
        assert_eq!(p.price, before.price);
        assert_eq!(p.created_at, before.created_at);
        assert!(p.updated_at > before.updated_at);
    }

    #[test]
    fn next_timestamp_is_strictly_increasing() {
        let t = Utc::now();
        assert!(next_timestamp(t, t) > t);
        assert!(next_timestamp(t, t - Duration::seconds(5)) > t);
        let later = t + Duration::seconds(1);
        assert_eq!(next_timestamp(t, later), later);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v["location"].get("zipCode").is_some());
        assert_eq!(v["status"], "available");
    }
}
