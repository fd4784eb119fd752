#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{EuclideanSpace, InnerSpace, Point3};

    use crate::dynamics::{CameraChoreographer, CameraState};
    use crate::geo::{geo_to_cartesian, GeoPoint};
    use crate::scene::{
        HeadlessScene, MarkerKind, MarkerManager, MarkerVisual, Primitive, TRAVELER_MARKER,
    };

    const R: f64 = 100.0;
    const NEW_YORK: GeoPoint = GeoPoint::new(40.7128, -74.0060);
    const LONDON: GeoPoint = GeoPoint::new(51.5074, -0.1278);

    fn camera() -> CameraChoreographer {
        CameraChoreographer::new(CameraState::looking_at(
            Point3::new(0.0, 0.0, 300.0),
            Point3::origin(),
        ))
    }

    #[test]
    fn test_replace_does_not_leak() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);

        let p1 = markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &NEW_YORK)
            .expect("first marker");
        let parts = scene.live_count();
        assert_eq!(parts, 4, "head, halo, stem and label");

        let p2 = markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &LONDON)
            .expect("replacement");

        assert_eq!(markers.len(), 1);
        assert_eq!(scene.live_count(), parts);
        assert_eq!(scene.destroyed_total(), parts);
        assert_ne!(p1, p2);

        let marker = markers.get("start").expect("registered");
        assert_eq!(marker.position, geo_to_cartesian(&LONDON, R));
        assert_eq!(marker.geo, Some(LONDON));
        assert!(scene.is_live(marker.visual.head()));
        assert!(marker.visual.stem().is_some_and(|h| scene.is_live(h)));
        assert!(marker.visual.label().is_some_and(|h| scene.is_live(h)));
    }

    #[test]
    fn test_label_carries_location_text() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        markers
            .set_marker(&mut scene, "end", MarkerKind::End, &NEW_YORK)
            .expect("marker");

        let label = markers
            .get("end")
            .and_then(|m| m.visual.label())
            .and_then(|h| scene.get(h).cloned());
        match label {
            Some(Primitive::Label { text, .. }) => assert_eq!(text, "40.7128°N, 74.0060°W"),
            other => panic!("expected a label, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_replacement_keeps_previous_marker() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &NEW_YORK)
            .expect("first marker");

        // Head succeeds, halo fails.
        scene.fail_create_after(1);
        let result = markers.set_marker(&mut scene, "start", MarkerKind::Start, &LONDON);
        assert!(result.is_err());

        assert_eq!(markers.len(), 1);
        assert_eq!(scene.live_count(), 4, "partial parts are destroyed");
        assert_eq!(
            markers.position("start"),
            Some(geo_to_cartesian(&NEW_YORK, R))
        );
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        assert!(!markers.remove_marker(&mut scene, "start"));

        markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &NEW_YORK)
            .expect("marker");
        assert!(markers.remove_marker(&mut scene, "start"));
        assert!(!markers.remove_marker(&mut scene, "start"));
        assert_eq!(scene.live_count(), 0);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_focus_on_missing_marker_is_ignored() {
        let markers = MarkerManager::new(R);
        let mut camera = camera();
        assert!(markers
            .focus("start", &mut camera, 250.0, Duration::from_secs(1))
            .is_none());
        assert!(!camera.is_animating());
    }

    #[test]
    fn test_focus_looks_down_the_radial() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        let surface = markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &LONDON)
            .expect("marker");

        let mut camera = camera();
        let id = markers
            .focus("start", &mut camera, 250.0, Duration::from_millis(500))
            .expect("animation");
        assert_eq!(camera.tick(Duration::from_millis(500)), Some(id));

        let expected = Point3::from_vec(surface.to_vec().normalize() * 250.0);
        assert!((camera.state().position - expected).magnitude() < 1e-9);
        assert!((camera.state().forward() + surface.to_vec().normalize()).magnitude() < 1e-9);
    }

    #[test]
    fn test_floating_marker_moves_in_place() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        markers
            .set_marker_at(
                &mut scene,
                TRAVELER_MARKER,
                MarkerKind::Traveler,
                Point3::new(0.0, 100.0, 0.0),
            )
            .expect("traveler");
        let created = scene.created_total();

        markers
            .move_marker(&mut scene, TRAVELER_MARKER, Point3::new(0.0, 10.0, 0.0))
            .expect("move");
        assert_eq!(scene.created_total(), created);
        assert_eq!(
            markers.position(TRAVELER_MARKER),
            Some(Point3::new(0.0, 10.0, 0.0))
        );

        let head = markers.get(TRAVELER_MARKER).expect("traveler").visual.head();
        match scene.get(head) {
            Some(Primitive::Sphere { center, .. }) => {
                assert_eq!(*center, Point3::new(0.0, 10.0, 0.0))
            }
            other => panic!("expected a sphere, got {:?}", other),
        }
    }

    #[test]
    fn test_traveler_glow_follows_the_body() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        markers
            .set_marker_at(&mut scene, TRAVELER_MARKER, MarkerKind::Traveler, Point3::origin())
            .expect("traveler");
        markers
            .move_marker(&mut scene, TRAVELER_MARKER, Point3::new(5.0, 0.0, 0.0))
            .expect("move");

        let visual = markers.get(TRAVELER_MARKER).expect("traveler").visual;
        let MarkerVisual::Floating { body, glow } = visual else {
            panic!("traveler should float, got {:?}", visual);
        };
        assert_eq!(visual.stem(), None);
        assert_eq!(visual.label(), None);
        match (scene.get(body), scene.get(glow)) {
            (
                Some(Primitive::Sphere {
                    center: c1,
                    radius: r1,
                    ..
                }),
                Some(Primitive::Sphere {
                    center: c2,
                    radius: r2,
                    color,
                }),
            ) => {
                assert_eq!(c1, c2);
                assert_eq!(*c2, Point3::new(5.0, 0.0, 0.0));
                assert!(r2 > r1);
                assert!(color[3] < 1.0);
            }
            other => panic!("expected two spheres, got {:?}", other),
        }
    }

    #[test]
    fn test_surface_markers_cannot_be_moved() {
        let mut scene = HeadlessScene::new();
        let mut markers = MarkerManager::new(R);
        markers
            .set_marker(&mut scene, "start", MarkerKind::Start, &LONDON)
            .expect("marker");
        assert!(markers
            .move_marker(&mut scene, "start", Point3::origin())
            .is_err());
        assert!(markers
            .move_marker(&mut scene, "missing", Point3::origin())
            .is_err());
    }
}
