#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{EuclideanSpace, InnerSpace, Point3};

    use crate::dynamics::{InputEvent, MouseButton};
    use crate::geo::GeoPoint;
    use crate::helpers::VisError;
    use crate::scene::{HeadlessScene, END_MARKER, START_MARKER};
    use crate::world::{Config, JourneyPhase, Visualizer, VisualizerEvent};

    const FRAME: Duration = Duration::from_millis(16);

    fn visualizer() -> (
        Visualizer<HeadlessScene>,
        crate::helpers::channel::Receiver<VisualizerEvent>,
    ) {
        let (mut vis, rx) =
            Visualizer::new(HeadlessScene::new(), Config::default()).expect("visualizer");
        vis.resize(800.0, 600.0);
        (vis, rx)
    }

    #[test]
    fn test_constructor_surfaces_scene_failure() {
        let mut scene = HeadlessScene::new();
        scene.fail_create_after(0);
        match Visualizer::new(scene, Config::default()) {
            Err(VisError::Scene(msg)) => assert!(msg.contains("globe")),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("construction should fail"),
        }
    }

    #[test]
    fn test_constructor_rejects_bad_config() {
        let config = Config {
            segment_count: 1,
            ..Config::default()
        };
        assert!(matches!(
            Visualizer::new(HeadlessScene::new(), config),
            Err(VisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_start_rejects_out_of_range_input() {
        let (mut vis, rx) = visualizer();
        assert!(vis.start_journey(GeoPoint::new(91.0, 0.0)).is_err());
        assert!(vis.start_journey(GeoPoint::new(0.0, f64::NAN)).is_err());
        assert_eq!(vis.phase(), JourneyPhase::Idle);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_failed_end_marker_rolls_back_start() {
        let (mut vis, rx) = visualizer();
        let globe_only = vis.scene().live_count();

        // The four start-marker parts succeed, the first end-marker part fails.
        vis.scene_mut().fail_create_after(4);
        let result = vis.start_journey(GeoPoint::new(40.7128, -74.0060));

        assert!(matches!(result, Err(VisError::Scene(_))));
        assert_eq!(vis.phase(), JourneyPhase::Idle);
        assert!(!vis.markers().contains(START_MARKER));
        assert!(!vis.markers().contains(END_MARKER));
        assert_eq!(vis.scene().live_count(), globe_only);
        assert!(rx.drain().is_empty());

        // The backend recovered; a retry goes through.
        assert!(vis
            .start_journey(GeoPoint::new(40.7128, -74.0060))
            .expect("retry"));
        assert_eq!(vis.markers().len(), 2);
    }

    #[test]
    fn test_sample_locations_start_journeys() {
        let (mut vis, _rx) = visualizer();
        assert!(vis.start_sample("  tokyo ").expect("sample"));
        assert_eq!(vis.phase(), JourneyPhase::FocusingStart);
        assert!(vis.start_sample("atlantis").is_err());
    }

    #[test]
    fn test_click_on_globe_picks_location() {
        let (mut vis, rx) = visualizer();

        vis.input(InputEvent::MouseMoved(400.0, 300.0));
        vis.input(InputEvent::MouseButtonPressed(MouseButton::Left));
        vis.input(InputEvent::MouseButtonReleased(MouseButton::Left));

        let picked: Vec<(GeoPoint, GeoPoint)> = rx
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                VisualizerEvent::LocationPicked { start, end } => Some((start, end)),
                _ => None,
            })
            .collect();
        assert_eq!(picked.len(), 1);

        // The default camera sits on +Z, which is (0°, 90°W) in this projection.
        let (start, end) = picked[0];
        assert!(start.approx_eq(&GeoPoint::new(0.0, -90.0), 1e-6), "{}", start);
        assert!(end.approx_eq(&GeoPoint::new(0.0, 90.0), 1e-6), "{}", end);
    }

    #[test]
    fn test_click_off_globe_picks_nothing() {
        let (mut vis, rx) = visualizer();
        assert!(vis.pick(2.0, 2.0).is_none());
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_drag_rotates_instead_of_picking() {
        let (mut vis, rx) = visualizer();
        let before = vis.camera().position;

        vis.input(InputEvent::MouseMoved(400.0, 300.0));
        vis.input(InputEvent::MouseButtonPressed(MouseButton::Left));
        vis.input(InputEvent::MouseMoved(460.0, 300.0));
        vis.input(InputEvent::MouseButtonReleased(MouseButton::Left));
        vis.tick(FRAME);

        assert!(rx
            .drain()
            .iter()
            .all(|e| !matches!(e, VisualizerEvent::LocationPicked { .. })));
        assert!((vis.camera().position - before).magnitude() > 1e-6);
        assert_eq!(vis.scene().camera(), Some(vis.camera()));
    }

    #[test]
    fn test_controls_suspended_while_animating() {
        let (mut vis, _rx) = visualizer();
        vis.set_marker(START_MARKER, crate::scene::MarkerKind::Start, &GeoPoint::new(10.0, 20.0))
            .expect("marker");
        let id = vis.focus(START_MARKER).expect("animation");
        vis.tick(FRAME);
        assert!(!vis.controls().is_enabled());

        let expected = vis.camera().position;
        vis.input(InputEvent::MouseMoved(400.0, 300.0));
        vis.input(InputEvent::MouseButtonPressed(MouseButton::Left));
        vis.input(InputEvent::MouseMoved(600.0, 300.0));
        vis.input(InputEvent::MouseButtonReleased(MouseButton::Left));
        vis.input(InputEvent::MouseScrolled(5.0));

        // The drag had no effect on the animation path.
        let mut completed = false;
        for _ in 0..200 {
            vis.tick(FRAME);
            if !vis.is_camera_animating() {
                completed = true;
                break;
            }
        }
        assert!(completed, "animation {} never finished", id);
        assert!((vis.camera().position - expected).magnitude() > 1.0);
        let target = vis.config().focus_distance();
        assert!((vis.camera().position.to_vec().magnitude() - target).abs() < 1e-9);

        // Control resumes from where the animation left the camera.
        assert!(vis.controls().is_enabled());
        assert!((vis.controls().position() - vis.camera().position).magnitude() < 1e-9);
    }

    #[test]
    fn test_camera_completion_is_reported() {
        let (mut vis, rx) = visualizer();
        let id = vis.animate_camera_to(
            Point3::new(0.0, 250.0, 1.0),
            Point3::origin(),
            Duration::from_millis(50),
            None,
        );
        for _ in 0..5 {
            vis.tick(FRAME);
        }
        let done: Vec<u64> = rx
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                VisualizerEvent::CameraAnimationComplete { id } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(done, vec![id]);
    }

    #[test]
    fn test_focus_on_missing_marker_is_ignored() {
        let (mut vis, rx) = visualizer();
        assert!(vis.focus("nowhere").is_none());
        vis.tick(FRAME);
        assert!(!vis.is_camera_animating());
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_frame_clock_drives_ticks() {
        let (mut vis, _rx) = visualizer();
        vis.start_journey(GeoPoint::new(51.5074, -0.1278)).expect("start");

        let first = vis.frame(Duration::from_millis(1_000));
        assert_eq!(first.dt, Duration::ZERO);

        // A long stall is clamped, so the camera cannot jump to the end.
        let stalled = vis.frame(Duration::from_millis(6_000));
        assert_eq!(stalled.dt, Duration::from_millis(100));
        assert_eq!(vis.phase(), JourneyPhase::FocusingStart);
    }
}
