#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use cgmath::{EuclideanSpace, InnerSpace, Point3};

    use crate::dynamics::{CameraChoreographer, CameraState};
    use crate::helpers::ease_in_out_cubic;

    const FRAME: Duration = Duration::from_millis(16);

    fn home() -> CameraState {
        CameraState::looking_at(Point3::new(0.0, 0.0, 300.0), Point3::origin())
    }

    fn assert_state_eq(a: &CameraState, b: &CameraState, tol: f64) {
        assert!(
            (a.position - b.position).magnitude() < tol,
            "position {:?} != {:?}",
            a.position,
            b.position
        );
        assert!(
            (a.forward() - b.forward()).magnitude() < tol,
            "forward {:?} != {:?}",
            a.forward(),
            b.forward()
        );
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let start = home();
        let target_pos = Point3::new(250.0, 0.0, 0.0);
        let target = CameraState::looking_at(target_pos, Point3::origin());

        let mut camera = CameraChoreographer::new(start);
        camera.animate_to(target_pos, Point3::origin(), Duration::from_secs(2), None);

        let s0 = camera.sample(0.0).expect("animating");
        assert_eq!(s0, start);

        let s1 = camera.sample(1.0).expect("animating");
        assert_eq!(s1, target);

        let e = ease_in_out_cubic(0.5);
        assert_eq!(e, 0.5);
        let mid = camera.sample(0.5).expect("animating");
        let expected = start.position + (target_pos - start.position) * e;
        assert!((mid.position - expected).magnitude() < 1e-12);
        let expected_rot = start.orientation.slerp(target.orientation, e);
        assert!((mid.orientation - expected_rot).magnitude() < 1e-12);

        // Sampling must not advance the animation.
        assert_eq!(camera.sample(0.0).expect("animating"), start);
    }

    #[test]
    fn test_ticks_follow_the_eased_curve() {
        let target_pos = Point3::new(0.0, 200.0, 200.0);
        let mut camera = CameraChoreographer::new(home());
        camera.animate_to(target_pos, Point3::origin(), Duration::from_millis(1000), None);

        let expected = camera.sample(0.25).expect("animating");
        assert!(camera.tick(Duration::from_millis(250)).is_none());
        assert_state_eq(camera.state(), &expected, 1e-9);

        let expected = camera.sample(0.5).expect("animating");
        assert!(camera.tick(Duration::from_millis(250)).is_none());
        assert_state_eq(camera.state(), &expected, 1e-9);

        assert!(camera.tick(Duration::from_millis(500)).is_some());
        assert!(!camera.is_animating());
        assert_eq!(camera.state().position, target_pos);
    }

    #[test]
    fn test_new_animation_starts_from_current_pose() {
        let mut camera = CameraChoreographer::new(home());
        let first = camera.animate_to(
            Point3::new(300.0, 0.0, 0.0),
            Point3::origin(),
            Duration::from_secs(1),
            None,
        );
        camera.tick(Duration::from_millis(300));
        let midway = *camera.state();
        assert!((midway.position - home().position).magnitude() > 1.0);

        let second = camera.animate_to(
            Point3::new(0.0, 300.0, 0.0),
            Point3::origin(),
            Duration::from_secs(1),
            None,
        );
        assert_ne!(first, second);
        assert_eq!(camera.current_animation(), Some(second));
        assert_eq!(camera.sample(0.0).expect("animating"), midway);
    }

    #[test]
    fn test_callback_fires_once_after_final_step() {
        let fired = Rc::new(Cell::new(0u32));
        let seen = fired.clone();

        let mut camera = CameraChoreographer::new(home());
        let id = camera.animate_to(
            Point3::new(0.0, 0.0, 250.0),
            Point3::origin(),
            Duration::from_millis(100),
            Some(Box::new(move |_| seen.set(seen.get() + 1))),
        );
        assert_eq!(fired.get(), 0, "callback must not run inside animate_to");

        let mut completed = None;
        for _ in 0..20 {
            if let Some(done) = camera.tick(FRAME) {
                completed = Some(done);
                assert_eq!(camera.state().position, Point3::new(0.0, 0.0, 250.0));
            }
        }
        assert_eq!(completed, Some(id));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_superseded_callback_is_dropped() {
        let fired = Rc::new(Cell::new(0u32));
        let seen = fired.clone();

        let mut camera = CameraChoreographer::new(home());
        camera.animate_to(
            Point3::new(0.0, 0.0, 250.0),
            Point3::origin(),
            Duration::from_millis(100),
            Some(Box::new(move |_| seen.set(seen.get() + 1))),
        );
        camera.tick(FRAME);
        camera.animate_to(
            Point3::new(250.0, 0.0, 0.0),
            Point3::origin(),
            Duration::from_millis(100),
            None,
        );
        for _ in 0..20 {
            camera.tick(FRAME);
        }
        assert_eq!(fired.get(), 0);
        assert!((camera.state().position - Point3::new(250.0, 0.0, 0.0)).magnitude() < 1e-12);
    }

    #[test]
    fn test_user_placement_refused_while_animating() {
        let mut camera = CameraChoreographer::new(home());
        camera.animate_to(
            Point3::new(0.0, 0.0, 200.0),
            Point3::origin(),
            Duration::from_millis(100),
            None,
        );
        let elsewhere = CameraState::looking_at(Point3::new(500.0, 0.0, 0.0), Point3::origin());
        assert!(!camera.set_state(elsewhere));

        camera.tick(Duration::from_millis(200));
        assert!(camera.set_state(elsewhere));
        assert_eq!(*camera.state(), elsewhere);
    }

    #[test]
    fn test_zero_duration_completes_on_next_tick() {
        let mut camera = CameraChoreographer::new(home());
        let id = camera.animate_to(
            Point3::new(0.0, 150.0, 0.0),
            Point3::origin(),
            Duration::ZERO,
            None,
        );
        assert!(camera.is_animating());
        assert_eq!(camera.tick(Duration::ZERO), Some(id));
        assert_eq!(camera.state().position, Point3::new(0.0, 150.0, 0.0));
    }

    #[test]
    fn test_cancel_keeps_pose() {
        let mut camera = CameraChoreographer::new(home());
        let id = camera.animate_to(
            Point3::new(0.0, 150.0, 0.0),
            Point3::origin(),
            Duration::from_secs(1),
            None,
        );
        camera.tick(Duration::from_millis(400));
        let here = *camera.state();
        assert_eq!(camera.cancel(), Some(id));
        assert_eq!(camera.cancel(), None);
        assert!(camera.tick(FRAME).is_none());
        assert_eq!(*camera.state(), here);
    }
}
