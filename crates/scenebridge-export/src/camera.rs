//! Camera conversion

use tracing::debug;

use scenebridge_core::Vec3;
use scenebridge_scene::CameraNode;

use crate::babylon::BabylonCamera;
use crate::orientation::direction_from_euler;

/// Convert an adapted camera node. The authoring X axis is mirrored.
pub fn build_camera(camera: &CameraNode) -> BabylonCamera {
    let position = camera.transform.position;

    debug!(camera = %camera.name, "Converted camera");

    BabylonCamera {
        name: camera.name.clone(),
        id: camera.name.clone(),
        position: Vec3::new(-position.x, position.y, position.z),
        target: direction_from_euler(camera.transform.rotation),
        fov: camera.field_of_view.to_radians(),
        min_z: camera.clip_near,
        max_z: camera.clip_far,
        speed: 1.0,
        inertia: 0.9,
        check_collisions: false,
        apply_gravity: false,
        ellipsoid: Vec3::new(0.2, 0.9, 0.2),
    }
}
