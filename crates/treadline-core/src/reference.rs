//! Reference data: small, slowly-changing lookup entities used to populate
//! the finder's selectors and the catalog's facets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Backend object identifier (`_id`), kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefId(String);

impl RefId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RefId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RefId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RefId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Common read access over every reference entity: its id and display value.
pub trait ReferenceValue {
    fn id(&self) -> &RefId;
    fn value(&self) -> &str;
}

macro_rules! reference_value {
    ($ty:ty, $field:ident) => {
        impl ReferenceValue for $ty {
            fn id(&self) -> &RefId {
                &self.id
            }

            fn value(&self) -> &str {
                &self.$field
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Make {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub make: String,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub trim: String,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TireSize {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub tire_size: String,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub trim: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Width {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub width: String,
}

/// Aspect ratio. `width` optionally links it to the width it is offered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub ratio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::opt_string_or_number")]
    pub width: Option<String>,
}

/// Rim diameter. `ratio` optionally links it to the ratio it is offered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diameter {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub diameter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::opt_string_or_number")]
    pub ratio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivingType {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub name: String,
}

/// The three size reference lists, fetched together for the size finder.
#[derive(Debug, Clone, Default)]
pub struct SizeCatalog {
    pub widths: Vec<Width>,
    pub ratios: Vec<Ratio>,
    pub diameters: Vec<Diameter>,
}

reference_value!(Year, year);
reference_value!(Make, make);
reference_value!(Model, model);
reference_value!(Trim, trim);
reference_value!(TireSize, tire_size);
reference_value!(Width, width);
reference_value!(Ratio, ratio);
reference_value!(Diameter, diameter);
reference_value!(Brand, name);
reference_value!(Category, name);
reference_value!(DrivingType, name);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_accepts_numeric_value() {
        let w: Width = serde_json::from_str(r#"{"_id": "w1", "width": 225}"#).unwrap();
        assert_eq!(w.id.as_str(), "w1");
        assert_eq!(w.value(), "225");
    }

    #[test]
    fn make_without_year_link_has_none() {
        let m: Make = serde_json::from_str(r#"{"_id": "m1", "make": "Honda"}"#).unwrap();
        assert!(m.year.is_none());
        assert_eq!(m.value(), "Honda");
    }

    #[test]
    fn tire_size_reads_camel_case_field() {
        let s: TireSize = serde_json::from_str(
            r#"{"_id": "s1", "tireSize": "225/45R17", "trim": "EX", "year": 2020}"#,
        )
        .unwrap();
        assert_eq!(s.tire_size, "225/45R17");
        assert_eq!(s.year.as_deref(), Some("2020"));
        assert!(s.make.is_none());
    }

    #[test]
    fn ratio_serializes_without_missing_parent() {
        let r = Ratio {
            id: RefId::new("r1"),
            ratio: "45".to_owned(),
            width: None,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"_id": "r1", "ratio": "45"}));
    }
}
