use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

/// Smallest number of segments that still has a distinct start, core and end.
pub const MIN_SEGMENTS: usize = 2;

/// Ordered samples from the start marker, through the globe center, to the end marker.
///
/// Sample `core_index()` sits exactly on the origin. Each half is sampled
/// uniformly, so `point_at(0.5)` is the core regardless of segment parity.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCurve {
    samples: Vec<Point3<f64>>,
    core_index: usize,
}

impl PathCurve {
    pub fn samples(&self) -> &[Point3<f64>] {
        &self.samples
    }

    pub fn segment_count(&self) -> usize {
        self.samples.len() - 1
    }

    pub fn core_index(&self) -> usize {
        self.core_index
    }

    pub fn start(&self) -> Point3<f64> {
        self.samples[0]
    }

    pub fn end(&self) -> Point3<f64> {
        self.samples[self.samples.len() - 1]
    }

    /// Position at curve parameter `t` in [0, 1]. The first half of the
    /// parameter range covers the descent, the second half the ascent.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let (from, segments, local) = if t <= 0.5 {
            (0, self.core_index, t * 2.0)
        } else {
            (
                self.core_index,
                self.segment_count() - self.core_index,
                (t - 0.5) * 2.0,
            )
        };

        let f = local * segments as f64;
        let i = (f.floor() as usize).min(segments.saturating_sub(1));
        let frac = (f - i as f64).clamp(0.0, 1.0);

        let a = self.samples[from + i];
        let b = self.samples[from + i + 1];
        a + (b - a) * frac
    }

    /// Unit direction of travel at `t`; falls back to the start-to-center
    /// direction when the local segment is degenerate.
    pub fn direction_at(&self, t: f64) -> Vector3<f64> {
        let eps = 1.0 / (self.segment_count() as f64 * 4.0);
        let a = self.point_at((t - eps).max(0.0));
        let b = self.point_at((t + eps).min(1.0));
        let d = b - a;
        if d.magnitude2() > 1e-18 {
            d.normalize()
        } else {
            let s = -self.start().to_vec();
            if s.magnitude2() > 1e-18 {
                s.normalize()
            } else {
                Vector3::unit_y()
            }
        }
    }
}

/// Builds `segment_count + 1` samples: start to the origin, then origin to end.
///
/// The descent is sampled with a quadratic ease-in so samples bunch up near the
/// surface and spread out toward the core; the ascent mirrors it. Every call
/// produces a fresh curve.
pub fn build_path(start: Point3<f64>, end: Point3<f64>, segment_count: usize) -> PathCurve {
    let segment_count = segment_count.max(MIN_SEGMENTS);
    let core_index = segment_count / 2;
    let ascent = segment_count - core_index;

    let origin = Point3::origin();
    let mut samples = Vec::with_capacity(segment_count + 1);

    for i in 0..core_index {
        let s = i as f64 / core_index as f64;
        let k = 1.0 - s * s;
        samples.push(Point3::from_vec(start.to_vec() * k));
    }

    samples.push(origin);

    for i in 1..=ascent {
        let s = i as f64 / ascent as f64;
        let u = 1.0 - s;
        let k = 1.0 - u * u;
        samples.push(Point3::from_vec(end.to_vec() * k));
    }

    PathCurve {
        samples,
        core_index,
    }
}
