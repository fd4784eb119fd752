use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point2, Point3, Vector3, Vector4};

use crate::dynamics::{CameraProjection, CameraState};

/// Convert screen pixel -> ray in world space, then intersect with the globe.
/// `screen_px`: (x,y) in pixels, origin at top-left of the viewport.
pub fn screen_to_globe(
    screen_px: Point2<f64>,
    camera: &CameraState,
    projection: &CameraProjection,
    radius: f64,
) -> Option<Point3<f64>> {
    let (vw, vh) = projection.viewport_wh;
    if vw <= 0.0 || vh <= 0.0 {
        return None;
    }

    // Screen -> NDC (y flipped)
    let x_ndc = (screen_px.x / vw) * 2.0 - 1.0;
    let y_ndc = 1.0 - (screen_px.y / vh) * 2.0;

    let inv_view_proj = projection.proj_view_inv(camera);
    let near_world = unproject(&inv_view_proj, x_ndc, y_ndc, -1.0)?;
    let far_world = unproject(&inv_view_proj, x_ndc, y_ndc, 1.0)?;

    let mut dir = far_world - near_world;
    if dir.magnitude2() == 0.0 {
        dir = far_world - camera.position;
        if dir.magnitude2() == 0.0 {
            return None;
        }
    }
    let dir = dir.normalize();
    let origin = camera.position;

    let t = intersect_ray_sphere(origin, dir, radius)?;
    Some(origin + dir * t)
}

fn unproject(inv_view_proj: &Matrix4<f64>, x: f64, y: f64, z: f64) -> Option<Point3<f64>> {
    let h = inv_view_proj * Vector4::new(x, y, z, 1.0);
    if h.w.abs() < 1e-18 {
        return None;
    }
    Some(Point3::from_vec(h.truncate() / h.w))
}

/// Smallest non-negative `t` where `origin + t * dir` meets the sphere.
/// `dir` must be unit length.
pub fn intersect_ray_sphere(origin: Point3<f64>, dir: Vector3<f64>, radius: f64) -> Option<f64> {
    let o = origin.to_vec();
    // |o + t d|^2 = r^2  =>  t^2 + 2 (o.d) t + (o.o - r^2) = 0
    let b = o.dot(dir);
    let c = o.dot(o) - radius * radius;

    // Inside the globe: the camera is digging; no surface to pick.
    if c <= 0.0 {
        return None;
    }

    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;

    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// Projects a world point to pixels; `None` when behind the camera.
pub fn world_to_screen(
    point: Point3<f64>,
    camera: &CameraState,
    projection: &CameraProjection,
) -> Option<Point2<f64>> {
    let clip = projection.proj_view(camera) * point.to_homogeneous();
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let (vw, vh) = projection.viewport_wh;
    Some(Point2::new(
        (ndc.x + 1.0) * 0.5 * vw,
        (1.0 - ndc.y) * 0.5 * vh,
    ))
}
