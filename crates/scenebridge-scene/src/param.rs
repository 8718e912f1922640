//! Named node parameters
//!
//! Host nodes expose loosely typed parameters looked up by name
//! (`position`, `lightType`, `texture`, ...). [`Params`] stores them and
//! [`FromParam`] converts them into the typed values the exporter needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scenebridge_core::{Error, Result, Vec2, Vec3, Vec4};

/// A single parameter value as the host reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl ParamValue {
    /// Name of the value type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "string",
            ParamValue::Vec2(_) => "vec2",
            ParamValue::Vec3(_) => "vec3",
            ParamValue::Vec4(_) => "vec4",
        }
    }

    /// Host-script truthiness: zero, `false` and the empty string are false
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Bool(b) => *b,
            ParamValue::Int(i) => *i != 0,
            ParamValue::Float(f) => *f != 0.0 && !f.is_nan(),
            ParamValue::Text(s) => !s.is_empty(),
            ParamValue::Vec2(_) | ParamValue::Vec3(_) | ParamValue::Vec4(_) => true,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<Vec2> for ParamValue {
    fn from(value: Vec2) -> Self {
        ParamValue::Vec2(value)
    }
}

impl From<Vec3> for ParamValue {
    fn from(value: Vec3) -> Self {
        ParamValue::Vec3(value)
    }
}

impl From<Vec4> for ParamValue {
    fn from(value: Vec4) -> Self {
        ParamValue::Vec4(value)
    }
}

/// Conversion from a loosely typed parameter
pub trait FromParam: Sized {
    /// Type name used in [`Error::ParameterType`]
    const EXPECTED: &'static str;

    fn from_param(value: &ParamValue) -> Option<Self>;
}

impl FromParam for f32 {
    const EXPECTED: &'static str = "number";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f32),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

impl FromParam for bool {
    const EXPECTED: &'static str = "bool";

    fn from_param(value: &ParamValue) -> Option<Self> {
        Some(value.is_truthy())
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

// Wider vectors are accepted and truncated: hosts report UV offsets as vec2
// on material tags but as vec3 positions on texture nodes.
impl FromParam for Vec2 {
    const EXPECTED: &'static str = "vector";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Vec2(v) => Some(*v),
            ParamValue::Vec3(v) => Some(Vec2::new(v.x, v.y)),
            ParamValue::Vec4(v) => Some(Vec2::new(v.x, v.y)),
            _ => None,
        }
    }
}

impl FromParam for Vec3 {
    const EXPECTED: &'static str = "vec3";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Vec3(v) => Some(*v),
            ParamValue::Vec4(v) => Some(v.xyz()),
            _ => None,
        }
    }
}

impl FromParam for Vec4 {
    const EXPECTED: &'static str = "vec4";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }
}

/// Ordered set of named parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed lookup; absent parameters are `Ok(None)`, mistyped ones an error.
    /// `owner` names the node in error messages.
    pub fn optional<T: FromParam>(&self, owner: &str, name: &str) -> Result<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => T::from_param(value)
                .map(Some)
                .ok_or_else(|| Error::parameter_type(owner, name, T::EXPECTED)),
        }
    }

    /// Typed lookup of a parameter the exporter cannot do without
    pub fn require<T: FromParam>(&self, owner: &str, name: &str) -> Result<T> {
        self.optional(owner, name)?
            .ok_or_else(|| Error::missing_parameter(owner, name))
    }

    /// Host-script truthiness of a parameter; absent counts as false
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(ParamValue::is_truthy)
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebridge_core::ErrorKind;

    #[test]
    fn test_untagged_decoding() {
        let params: Params = serde_json::from_str(
            r#"{
                "name": "Lamp",
                "lightType": 4,
                "intensity": 0.75,
                "tileU": true,
                "UVOffset": [0.5, 0.25],
                "position": [1.0, 2.0, 3.0],
                "color": [1.0, 0.5, 0.25, 1.0]
            }"#,
        )
        .unwrap();

        assert_eq!(params.get("name"), Some(&ParamValue::Text("Lamp".into())));
        assert_eq!(params.get("lightType"), Some(&ParamValue::Int(4)));
        assert_eq!(params.get("intensity"), Some(&ParamValue::Float(0.75)));
        assert_eq!(params.get("UVOffset"), Some(&ParamValue::Vec2(Vec2::new(0.5, 0.25))));
        assert_eq!(
            params.get("position"),
            Some(&ParamValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
        );
        assert!(matches!(params.get("color"), Some(ParamValue::Vec4(_))));
    }

    #[test]
    fn test_typed_lookup() {
        let params = Params::new()
            .with("fieldOfView", 60i64)
            .with("color", Vec4::new(1.0, 0.5, 0.25, 1.0))
            .with("name", "Cam");

        assert_eq!(params.require::<f32>("Cam", "fieldOfView").unwrap(), 60.0);
        assert_eq!(
            params.require::<Vec3>("Cam", "color").unwrap(),
            Vec3::new(1.0, 0.5, 0.25)
        );
        assert_eq!(params.optional::<f32>("Cam", "clipNear").unwrap(), None);

        let missing = params.require::<f32>("Cam", "clipFar").unwrap_err();
        assert!(matches!(missing, Error::MissingParameter { .. }));

        let mistyped = params.require::<f32>("Cam", "name").unwrap_err();
        assert_eq!(mistyped.kind(), ErrorKind::InvalidInput);
        assert!(mistyped.to_string().contains("number"));
    }

    #[test]
    fn test_truthiness() {
        let params = Params::new()
            .with("tileU", 1i64)
            .with("tileV", 0i64)
            .with("label", "");

        assert!(params.is_truthy("tileU"));
        assert!(!params.is_truthy("tileV"));
        assert!(!params.is_truthy("label"));
        assert!(!params.is_truthy("absent"));
    }
}
