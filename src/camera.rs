use glam::{Mat4, Vec3};

/// Projection model of a [`Camera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Box frustum `height` units tall and `height * aspect` wide.
    Orthographic {
        height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Pinhole frustum with a vertical field of view in radians.
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

/// Where a camera sits, what it looks at and which way is up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
        }
    }

    /// Pose at `position` looking at the origin with +Y up.
    pub fn looking_at_origin(position: impl Into<Vec3>) -> Self {
        Self::new(position.into(), Vec3::ZERO, Vec3::Y)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::looking_at_origin(Vec3::new(0.0, 0.0, 5.0))
    }
}

/// A camera shared between quadrants and repositioned before each render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Magnification applied on top of the projection (1.0 = none).
    pub zoom: f32,
}

impl Camera {
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 2000.0;

    /// Orthographic camera `height` units tall for the given aspect ratio.
    pub fn orthographic(height: f32, aspect: f32) -> Self {
        Self::with_projection(Projection::Orthographic {
            height,
            aspect,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        })
    }

    /// Perspective camera with a vertical field of view in degrees.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        })
    }

    fn with_projection(projection: Projection) -> Self {
        let pose = CameraPose::default();
        Self {
            projection,
            position: pose.position,
            target: pose.target,
            up: pose.up,
            zoom: 1.0,
        }
    }

    pub fn set_position(&mut self, position: impl Into<Vec3>) {
        self.position = position.into();
    }

    pub fn look_at(&mut self, target: impl Into<Vec3>) {
        self.target = target.into();
    }

    pub fn set_up(&mut self, up: impl Into<Vec3>) {
        self.up = up.into();
    }

    /// Moves the camera in place to `pose`.
    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.set_position(pose.position);
        self.look_at(pose.target);
        self.set_up(pose.up);
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target, self.up)
    }

    pub fn aspect(&self) -> f32 {
        match self.projection {
            Projection::Orthographic { aspect, .. } | Projection::Perspective { aspect, .. } => {
                aspect
            }
        }
    }

    /// Recomputes the projection for a new aspect ratio (window resize).
    ///
    /// Non-finite or non-positive ratios (a minimized window) are ignored.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        if !new_aspect.is_finite() || new_aspect <= 0.0 {
            return;
        }
        match &mut self.projection {
            Projection::Orthographic { aspect, .. } | Projection::Perspective { aspect, .. } => {
                *aspect = new_aspect;
            }
        }
    }

    /// World to camera space.
    ///
    /// When the view direction is parallel to `up` (a top-down view with +Y
    /// up), the direction is nudged slightly so the basis stays defined.
    pub fn view_matrix(&self) -> Mat4 {
        let mut back = self.position - self.target;
        if back.length_squared() == 0.0 {
            back = Vec3::Z;
        }
        back = back.normalize();

        let up = self.up.normalize_or(Vec3::Y);
        if back.cross(up).length_squared() < 1e-12 {
            if up.z.abs() == 1.0 {
                back.x += 1e-4;
            } else {
                back.z += 1e-4;
            }
            back = back.normalize();
        }

        Mat4::look_to_rh(self.position, -back, up)
    }

    /// Camera to clip space (wgpu depth range 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        match self.projection {
            Projection::Orthographic {
                height,
                aspect,
                near,
                far,
            } => {
                let half_h = height * 0.5 / zoom;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, near, far)
            }
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                let fov = 2.0 * ((fov_y * 0.5).tan() / zoom).atan();
                Mat4::perspective_rh(fov, aspect, near, far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    fn project(camera: &Camera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection() * p.extend(1.0);
        clip.xyz() / clip.w
    }

    #[test]
    fn front_view_keeps_x_and_y() {
        let mut camera = Camera::orthographic(2.0, 1.0);
        camera.apply_pose(&CameraPose::looking_at_origin([0.0, 0.0, 2.0]));

        let ndc = project(&camera, Vec3::new(0.5, 0.25, 0.0));
        assert!((ndc.x - 0.5).abs() < 1e-5);
        assert!((ndc.y - 0.25).abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn top_down_view_is_well_defined() {
        let mut camera = Camera::orthographic(2.0, 1.0);
        camera.apply_pose(&CameraPose::looking_at_origin([0.0, 2.0, 0.0]));

        let view = camera.view_matrix();
        assert!(view.is_finite());

        // The origin is straight ahead, two units away.
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin.z + 2.0).abs() < 1e-3);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::orthographic(2.0, 4.0 / 3.0);
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect(), 2.0);

        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect(), 2.0);

        let mut perspective = Camera::perspective(50.0, 1.0, 0.1, 1000.0);
        perspective.set_aspect(1.5);
        assert_eq!(perspective.aspect(), 1.5);
    }

    #[test]
    fn orthographic_width_follows_aspect() {
        let mut camera = Camera::orthographic(2.0, 2.0);
        camera.apply_pose(&CameraPose::looking_at_origin([0.0, 0.0, 2.0]));

        // Frustum is 4 wide, so x = 2 sits on the right edge.
        let ndc = project(&camera, Vec3::new(2.0, 0.0, 0.0));
        assert!((ndc.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_magnifies() {
        let mut camera = Camera::orthographic(2.0, 1.0);
        camera.apply_pose(&CameraPose::looking_at_origin([0.0, 0.0, 2.0]));
        camera.zoom = 2.0;

        let ndc = project(&camera, Vec3::new(0.25, 0.0, 0.0));
        assert!((ndc.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn apply_pose_round_trips() {
        let mut camera = Camera::perspective(50.0, 1.0, 0.1, 1000.0);
        let pose = CameraPose::looking_at_origin([1.125, 1.125, 1.125]);
        camera.apply_pose(&pose);
        assert_eq!(camera.pose(), pose);
    }
}
