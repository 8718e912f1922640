//! Light conversion

use serde::{Serialize, Serializer};
use tracing::debug;

use scenebridge_core::{Error, Result, Vec3};
use scenebridge_scene::LightNode;

use crate::babylon::BabylonLight;
use crate::orientation::direction_from_euler;

/// Babylon light type, serialized as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightKind {
    Point = 0,
    Directional = 1,
    Spot = 2,
    Hemispheric = 3,
}

impl LightKind {
    /// Map the authoring tool's light type code.
    ///
    /// | host | name    | Babylon     |
    /// |------|---------|-------------|
    /// | 0    | ambient | hemispheric |
    /// | 1    | area    | hemispheric |
    /// | 2    | distant | directional |
    /// | 3    | point   | point       |
    /// | 4    | spot    | spot        |
    ///
    /// Unknown codes fall back to point.
    pub fn from_host(code: i64) -> Self {
        match code {
            0 | 1 => LightKind::Hemispheric,
            2 => LightKind::Directional,
            3 => LightKind::Point,
            4 => LightKind::Spot,
            _ => LightKind::Point,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for LightKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Convert an adapted light node.
///
/// Spot lights must carry `cutOffAngle` (degrees) and `cutOffAttenuation`.
pub fn build_light(light: &LightNode) -> Result<BabylonLight> {
    let kind = light.light_type.map_or(LightKind::Point, LightKind::from_host);

    let (angle, exponent) = match kind {
        LightKind::Spot => {
            let angle = light
                .cut_off_angle
                .ok_or_else(|| Error::missing_parameter(&light.name, "cutOffAngle"))?;
            let exponent = light
                .cut_off_attenuation
                .ok_or_else(|| Error::missing_parameter(&light.name, "cutOffAttenuation"))?;
            (angle.to_radians(), exponent)
        }
        _ => (0.0, 1.0),
    };

    debug!(light = %light.name, kind = ?kind, "Converted light");

    Ok(BabylonLight {
        name: light.name.clone(),
        id: light.name.clone(),
        tags: String::new(),
        kind,
        position: light.transform.position,
        direction: direction_from_euler(light.transform.rotation),
        angle,
        exponent,
        ground_color: light.color,
        intensity: light.intensity,
        range: 1.0,
        diffuse: light.color,
        specular: Vec3::ONE,
        excluded_meshes_ids: Vec::new(),
        included_only_meshes_ids: Vec::new(),
        animations: Vec::new(),
        auto_animate: false,
        auto_animate_from: 0,
        auto_animate_to: 0,
        auto_animate_loop: false,
        auto_animate_speed: 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebridge_core::ErrorKind;
    use scenebridge_scene::Transform;

    fn light(light_type: Option<i64>) -> LightNode {
        LightNode {
            name: "Key".into(),
            transform: Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Vec3::new(45.0, 0.0, 0.0),
                scale: Vec3::ONE,
            },
            light_type,
            color: Vec3::new(1.0, 0.9, 0.8),
            intensity: 0.75,
            cut_off_angle: None,
            cut_off_attenuation: None,
            children: vec![],
        }
    }

    #[test]
    fn test_kind_table() {
        assert_eq!(LightKind::from_host(0), LightKind::Hemispheric);
        assert_eq!(LightKind::from_host(1), LightKind::Hemispheric);
        assert_eq!(LightKind::from_host(2).code(), 1);
        assert_eq!(LightKind::from_host(3).code(), 0);
        assert_eq!(LightKind::from_host(4), LightKind::Spot);
        assert_eq!(LightKind::from_host(99).code(), 0);
        assert_eq!(LightKind::from_host(-1), LightKind::Point);
    }

    #[test]
    fn test_point_light_fields() {
        let converted = build_light(&light(Some(3))).unwrap();

        assert_eq!(converted.kind, LightKind::Point);
        assert_eq!(converted.id, "Key");
        assert_eq!(converted.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(converted.diffuse, converted.ground_color);
        assert_eq!(converted.specular, Vec3::ONE);
        assert_eq!(converted.angle, 0.0);
        assert_eq!(converted.exponent, 1.0);
        assert_eq!(converted.range, 1.0);
        assert!((converted.direction.length() - 1.0).abs() < 1e-5);

        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json["type"], 0);
        assert_eq!(json["autoAnimateSpeed"], 1.0);
    }

    #[test]
    fn test_spot_light_cone() {
        let mut spot = light(Some(4));
        spot.cut_off_angle = Some(90.0);
        spot.cut_off_attenuation = Some(2.0);

        let converted = build_light(&spot).unwrap();
        assert_eq!(converted.kind, LightKind::Spot);
        assert!((converted.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(converted.exponent, 2.0);
    }

    #[test]
    fn test_spot_without_cone_fails() {
        let err = build_light(&light(Some(4))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_type_is_point() {
        assert_eq!(build_light(&light(None)).unwrap().kind, LightKind::Point);
    }
}
