use bevy::math::{Quat, Vec3};
use drape::constants::PERSPECTIVE;
use drape::{CameraRig, Layout};

pub struct CameraPose {
    pub translation: Vec3,
    pub rotation: Quat,
    /// Vertical field of view, radians.
    pub fov: f32,
}

/// Pose of the pixel-perfect perspective camera for a roll and viewport.
/// The camera looks down -Z from `PERSPECTIVE` units away and rolls around its view axis.
pub fn camera_pose(roll: f32, viewport_width: f32, viewport_height: f32) -> CameraPose {
    let layout = Layout::new(viewport_width, viewport_height);
    CameraPose {
        translation: CameraRig::position(),
        rotation: Quat::from_rotation_z(roll),
        fov: CameraRig::fov(&layout),
    }
}

/// World units covered by one screen pixel on the z = 0 plane.
pub fn units_per_pixel(fov: f32, viewport_height: f32) -> f32 {
    2.0 * PERSPECTIVE * (fov / 2.0).tan() / viewport_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape::constants::ANGLE;
    use rstest::rstest;

    #[test]
    fn test_pose_sits_on_view_axis() {
        let pose = camera_pose(0.0, 1500.0, 900.0);
        assert_eq!(pose.translation, Vec3::new(0.0, 0.0, PERSPECTIVE));
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }

    #[rstest]
    #[case(900.0)]
    #[case(600.0)]
    #[case(1440.0)]
    fn test_one_unit_is_one_pixel(#[case] height: f32) {
        let pose = camera_pose(-ANGLE, 1200.0, height);
        assert!((units_per_pixel(pose.fov, height) - 1.0).abs() < 1e-4);
    }

    #[rstest]
    #[case(-ANGLE)]
    #[case(-ANGLE - 0.05)]
    fn test_roll_turns_screen_x_axis(#[case] roll: f32) {
        let pose = camera_pose(roll, 1500.0, 900.0);
        let right = pose.rotation * Vec3::X;
        assert!((right.y - roll.sin()).abs() < 1e-5);
        assert!((right.x - roll.cos()).abs() < 1e-5);
    }
}
