//! Request body validation for property create and update.

use crate::error::{AppError, FieldError};
use crate::model::{Location, LocationPatch, NewProperty, PropertyPatch, PropertyStatus};
use serde_json::{Map, Value};

pub const DESCRIPTION_MIN_LENGTH: usize = 10;

/// Minimum length and failure message for one text field.
struct TextRule {
    key: &'static str,
    min: usize,
    message: &'static str,
}

const TITLE: TextRule = TextRule {
    key: "title",
    min: 1,
    message: "Title is required",
};

const DESCRIPTION: TextRule = TextRule {
    key: "description",
    min: DESCRIPTION_MIN_LENGTH,
    message: "Description must be at least 10 characters",
};

const LOCATION_FIELDS: [TextRule; 4] = [
    TextRule { key: "address", min: 1, message: "Address is required" },
    TextRule { key: "city", min: 1, message: "City is required" },
    TextRule { key: "state", min: 1, message: "State is required" },
    TextRule { key: "zipCode", min: 1, message: "Zip code is required" },
];

pub struct PropertyValidator;

impl PropertyValidator {
    /// Validate a create body. Every failing field is reported, not just the first.
    pub fn validate_create(body: &Value) -> Result<NewProperty, AppError> {
        let obj = as_object(body)?;
        let mut errs = Vec::new();

        let title = required(obj, TITLE.key, &mut errs).and_then(|v| text(v, TITLE.key, &TITLE, &mut errs));
        let description = required(obj, DESCRIPTION.key, &mut errs)
            .and_then(|v| text(v, DESCRIPTION.key, &DESCRIPTION, &mut errs));
        let price = required(obj, "price", &mut errs).and_then(|v| price(v, "price", &mut errs));
        let location = required(obj, "location", &mut errs).and_then(|v| full_location(v, &mut errs));
        let features = match obj.get("features") {
            Some(v) => text_list(v, "features", &mut errs),
            None => Some(Vec::new()),
        };
        let images = match obj.get("images") {
            Some(v) => text_list(v, "images", &mut errs),
            None => Some(Vec::new()),
        };
        let status = match obj.get("status") {
            Some(v) => status(v, "status", &mut errs),
            None => Some(PropertyStatus::default()),
        };

        let (Some(title), Some(description), Some(price), Some(location), Some(features), Some(images), Some(status)) =
            (title, description, price, location, features, images, status)
        else {
            return Err(AppError::Validation(errs));
        };
        Ok(NewProperty {
            title,
            description,
            price,
            location,
            features,
            images,
            status,
        })
    }

    /// Validate an update body. Absent fields stay `None`; present fields follow the create rules.
    pub fn validate_update(body: &Value) -> Result<PropertyPatch, AppError> {
        let obj = as_object(body)?;
        let mut errs = Vec::new();
        let patch = PropertyPatch {
            title: obj.get(TITLE.key).and_then(|v| text(v, TITLE.key, &TITLE, &mut errs)),
            description: obj
                .get(DESCRIPTION.key)
                .and_then(|v| text(v, DESCRIPTION.key, &DESCRIPTION, &mut errs)),
            price: obj.get("price").and_then(|v| price(v, "price", &mut errs)),
            location: obj.get("location").and_then(|v| location_patch(v, &mut errs)),
            features: obj.get("features").and_then(|v| text_list(v, "features", &mut errs)),
            images: obj.get("images").and_then(|v| text_list(v, "images", &mut errs)),
            status: obj.get("status").and_then(|v| status(v, "status", &mut errs)),
        };
        if errs.is_empty() {
            Ok(patch)
        } else {
            Err(AppError::Validation(errs))
        }
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object().ok_or_else(|| {
        AppError::Validation(vec![type_error("body", "object", body)])
    })
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> FieldError {
    FieldError::new(path, format!("Expected {}, received {}", expected, type_name(got)))
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str, errs: &mut Vec<FieldError>) -> Option<&'a Value> {
    let v = obj.get(key);
    if v.is_none() {
        errs.push(FieldError::new(key, "Required"));
    }
    v
}

fn text(v: &Value, path: &str, rule: &TextRule, errs: &mut Vec<FieldError>) -> Option<String> {
    let Value::String(s) = v else {
        errs.push(type_error(path, "string", v));
        return None;
    };
    let trimmed = s.trim();
    if trimmed.chars().count() < rule.min {
        errs.push(FieldError::new(path, rule.message));
        return None;
    }
    Some(trimmed.to_string())
}

fn price(v: &Value, path: &str, errs: &mut Vec<FieldError>) -> Option<f64> {
    let Some(n) = v.as_f64() else {
        errs.push(type_error(path, "number", v));
        return None;
    };
    if n < 0.0 {
        errs.push(FieldError::new(path, "Price cannot be negative"));
        return None;
    }
    Some(n)
}

fn text_list(v: &Value, path: &str, errs: &mut Vec<FieldError>) -> Option<Vec<String>> {
    let Value::Array(items) = v else {
        errs.push(type_error(path, "array", v));
        return None;
    };
    let mut out = Vec::with_capacity(items.len());
    let mut ok = true;
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => out.push(s.trim().to_string()),
            other => {
                errs.push(type_error(&format!("{}.{}", path, i), "string", other));
                ok = false;
            }
        }
    }
    ok.then_some(out)
}

fn status(v: &Value, path: &str, errs: &mut Vec<FieldError>) -> Option<PropertyStatus> {
    let Value::String(s) = v else {
        errs.push(type_error(path, "string", v));
        return None;
    };
    match s.parse() {
        Ok(st) => Some(st),
        Err(e) => {
            errs.push(FieldError::new(path, e.to_string()));
            None
        }
    }
}

/// Validate whichever location fields are present.
fn location_patch(v: &Value, errs: &mut Vec<FieldError>) -> Option<LocationPatch> {
    let Value::Object(obj) = v else {
        errs.push(type_error("location", "object", v));
        return None;
    };
    let before = errs.len();
    let [address, city, state, zip_code] = LOCATION_FIELDS.map(|rule| {
        obj.get(rule.key)
            .and_then(|fv| text(fv, &format!("location.{}", rule.key), &rule, errs))
    });
    (errs.len() == before).then_some(LocationPatch {
        address,
        city,
        state,
        zip_code,
    })
}

/// Validate a location that must carry every field.
fn full_location(v: &Value, errs: &mut Vec<FieldError>) -> Option<Location> {
    if let Value::Object(obj) = v {
        for rule in &LOCATION_FIELDS {
            if !obj.contains_key(rule.key) {
                errs.push(FieldError::new(format!("location.{}", rule.key), "Required"));
            }
        }
    }
    let patch = location_patch(v, errs)?;
    Some(Location {
        address: patch.address?,
        city: patch.city?,
        state: patch.state?,
        zip_code: patch.zip_code?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "A",
            "description": "ten-plus chars here",
            "price": 100,
            "location": {"address": "1 St", "city": "X", "state": "Y", "zipCode": "1"}
        })
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errs) => errs.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let p = PropertyValidator::validate_create(&valid_body()).unwrap();
        assert_eq!(p.status, PropertyStatus::Available);
        assert!(p.features.is_empty());
        assert!(p.images.is_empty());
        assert_eq!(p.price, 100.0);
        assert_eq!(p.location.zip_code, "1");
    }

    #[test]
    fn create_reports_each_missing_required_field() {
        for key in ["title", "description", "price", "location"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(key);
            let errs = fields(PropertyValidator::validate_create(&body).unwrap_err());
            assert_eq!(errs, vec![key.to_string()], "missing {key}");
        }
    }

    #[test]
    fn create_reports_missing_location_parts() {
        let mut body = valid_body();
        body["location"] = json!({"address": "1 St"});
        let errs = fields(PropertyValidator::validate_create(&body).unwrap_err());
        assert_eq!(errs, vec!["location.city", "location.state", "location.zipCode"]);
    }

    #[test]
    fn create_collects_all_failures() {
        let body = json!({
            "title": "   ",
            "description": "short",
            "price": -1,
            "location": {"address": "", "city": "X", "state": "Y", "zipCode": "1"},
            "features": ["ok", 3],
            "status": "sold"
        });
        let errs = fields(PropertyValidator::validate_create(&body).unwrap_err());
        assert_eq!(
            errs,
            vec!["title", "description", "price", "location.address", "features.1", "status"]
        );
    }

    #[test]
    fn create_rejects_wrong_types() {
        let mut body = valid_body();
        body["price"] = json!("100");
        match PropertyValidator::validate_create(&body).unwrap_err() {
            AppError::Validation(errs) => {
                assert_eq!(errs[0].field, "price");
                assert_eq!(errs[0].message, "Expected number, received string");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(PropertyValidator::validate_create(&json!([1, 2])).is_err());
    }

    #[test]
    fn create_trims_text() {
        let mut body = valid_body();
        body["title"] = json!("  Loft  ");
        body["features"] = json!([" Pool "]);
        let p = PropertyValidator::validate_create(&body).unwrap();
        assert_eq!(p.title, "Loft");
        assert_eq!(p.features, vec!["Pool"]);
    }

    #[test]
    fn update_accepts_any_subset() {
        let patch = PropertyValidator::validate_update(&json!({"status": "rented"})).unwrap();
        assert_eq!(patch.status, Some(PropertyStatus::Rented));
        assert!(patch.price.is_none());
        assert!(patch.title.is_none());

        let patch = PropertyValidator::validate_update(&json!({})).unwrap();
        assert_eq!(patch, PropertyPatch::default());
    }

    #[test]
    fn update_validates_present_fields() {
        let errs = fields(
            PropertyValidator::validate_update(&json!({"price": -5, "location": {"city": ""}})).unwrap_err(),
        );
        assert_eq!(errs, vec!["price", "location.city"]);
    }

    #[test]
    fn update_keeps_partial_location() {
        let patch = PropertyValidator::validate_update(&json!({"location": {"city": "Leeds"}})).unwrap();
        let loc = patch.location.unwrap();
        assert_eq!(loc.city.as_deref(), Some("Leeds"));
        assert!(loc.address.is_none());
    }

    #[test]
    fn update_rejects_null() {
        let errs = fields(PropertyValidator::validate_update(&json!({"title": null})).unwrap_err());
        assert_eq!(errs, vec!["title"]);
    }
}
