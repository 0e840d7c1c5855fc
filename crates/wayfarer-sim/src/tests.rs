#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::DVec3;

    use wayfarer_core::commands::RouteOptions;
    use wayfarer_core::config::LocationConfig;
    use wayfarer_core::enums::CameraPresetKind;
    use wayfarer_core::events::CameraEvent;
    use wayfarer_core::types::{CharacterState, GeoCoordinate, WorldPosition};
    use wayfarer_nav::directions::{FixedRouteProvider, RouteRequest};
    use wayfarer_nav::route::Route;

    use crate::camera::NavigationCamera;
    use crate::fetcher::RouteFetcher;
    use crate::location::{LocationFilter, LocationSlot, SimulatedLocation};

    fn standing_at(x: f64, z: f64) -> CharacterState {
        CharacterState {
            position: WorldPosition::new(x, 0.0, z),
            ..Default::default()
        }
    }

    fn distance(a: WorldPosition, b: WorldPosition) -> f64 {
        (a.to_vec3() - b.to_vec3()).length()
    }

    // ---- Camera ----

    #[test]
    fn test_first_update_starts_on_target() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        camera.update(&standing_at(0.0, 0.0), None);
        assert_eq!(camera.pose(), camera.target());
        // Heading north: camera sits behind (south, +z) and above.
        let pose = camera.pose();
        assert_eq!(pose.position, WorldPosition::new(0.0, 4.0, 8.0));
    }

    #[test]
    fn test_smoothing_converges_monotonically() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        camera.update(&standing_at(0.0, 0.0), None);

        let moved = standing_at(40.0, -30.0);
        camera.update(&moved, None);
        let mut gap = distance(camera.pose().position, camera.target().position);
        assert!(gap > 1.0);

        let mut steps = 0;
        while gap > 1e-3 {
            camera.update(&moved, None);
            let next = distance(camera.pose().position, camera.target().position);
            assert!(next < gap, "gap grew from {gap} to {next}");
            gap = next;
            steps += 1;
            assert!(steps < 200, "did not converge");
        }
        assert!(distance(camera.pose().look_at, camera.target().look_at) < 1e-3);
    }

    #[test]
    fn test_look_ahead_prefers_next_waypoint() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        let character = standing_at(0.0, 0.0);

        camera.update(&character, Some(WorldPosition::new(50.0, 0.0, 0.0)));
        let look = camera.target().look_at;
        // Stationary: 0.3 of the 6 m look-ahead, toward the waypoint (east).
        assert!((look.x - 1.8).abs() < 1e-9);
        assert!(look.z.abs() < 1e-9);

        camera.update(&character, None);
        let look = camera.target().look_at;
        assert!(look.x.abs() < 1e-9);
        assert!((look.z + 1.8).abs() < 1e-9, "falls back to heading (north)");
    }

    #[test]
    fn test_moving_blend_and_lateral_offset() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        let moving = CharacterState {
            is_moving: true,
            ..standing_at(0.0, 0.0)
        };
        camera.update(&moving, None);
        let target = camera.target();
        assert!((target.position.x - 1.0).abs() < 1e-9, "offset to the right");
        assert!((target.look_at.z + 3.6).abs() < 1e-9, "0.6 of look-ahead");
    }

    #[test]
    fn test_preset_switch_does_not_snap() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        let character = standing_at(0.0, 0.0);
        camera.update(&character, None);

        assert!(camera.set_preset(CameraPresetKind::Cinematic));
        assert!(!camera.set_preset(CameraPresetKind::Cinematic));
        camera.update(&character, None);
        assert_ne!(camera.pose(), camera.target());
        assert_eq!(
            camera.drain_events(),
            vec![CameraEvent::PresetChanged {
                preset: CameraPresetKind::Cinematic
            }]
        );

        camera.snap();
        assert_eq!(camera.pose(), camera.target());
        assert_eq!(camera.drain_events(), vec![CameraEvent::Snapped]);
    }

    #[test]
    fn test_smoothing_override_and_clamp() {
        let camera = NavigationCamera::new(CameraPresetKind::Mobile).with_smoothing(Some(3.0));
        assert_eq!(camera.smoothing_speed(), 1.0);
        let camera = NavigationCamera::new(CameraPresetKind::Mobile).with_smoothing(Some(-1.0));
        assert_eq!(camera.smoothing_speed(), 0.12);
    }

    #[test]
    fn test_camera_follows_origin_shift() {
        let mut camera = NavigationCamera::new(CameraPresetKind::ThirdPerson);
        camera.update(&standing_at(100.0, 0.0), None);
        camera.shift_origin(DVec3::new(100.0, 7.0, 0.0));
        camera.update(&standing_at(0.0, 0.0), None);
        let (pose, target) = (camera.pose(), camera.target());
        assert!(distance(pose.position, target.position) < 1e-9, "no pan after a recenter");
        assert!(distance(pose.look_at, target.look_at) < 1e-9);
    }

    // ---- Location handoff ----

    #[test]
    fn test_slot_keeps_only_newest() {
        let slot = LocationSlot::new();
        let writer = slot.writer();
        writer.publish(GeoCoordinate::new(1.0, 1.0));
        writer.publish(GeoCoordinate::new(2.0, 2.0));
        assert_eq!(slot.take().unwrap().lng, 2.0);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_slot_written_from_another_thread() {
        let slot = LocationSlot::new();
        let writer = slot.writer();
        std::thread::spawn(move || writer.publish(GeoCoordinate::new(3.0, 4.0)))
            .join()
            .unwrap();
        assert_eq!(slot.take().unwrap().lat, 4.0);
    }

    #[test]
    fn test_filter_drops_inaccurate_fixes() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        assert!(filter
            .accept(GeoCoordinate::new(0.0, 0.0).with_accuracy(150.0))
            .is_none());
        assert!(filter
            .accept(GeoCoordinate::new(0.0, 0.0).with_accuracy(f64::NAN))
            .is_none());
        assert!(filter.accept(GeoCoordinate::new(0.0, 0.0)).is_some(), "unknown accuracy");
        assert!(filter
            .accept(GeoCoordinate::new(0.0, 0.0).with_accuracy(100.0))
            .is_some());
    }

    #[test]
    fn test_filter_derives_heading_and_speed() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        filter.accept(GeoCoordinate::new(0.0, 0.0).with_timestamp(0));
        let fix = filter
            .accept(GeoCoordinate::new(0.0, 0.0001).with_timestamp(1000))
            .unwrap();
        assert!((fix.speed.unwrap() - 11.12).abs() < 0.05, "{:?}", fix.speed);
        assert!(fix.heading.unwrap().abs() < 1e-6, "due north");

        let reported = filter
            .accept(
                GeoCoordinate::new(0.0, 0.0002)
                    .with_timestamp(2000)
                    .with_motion(Some(45.0), Some(1.0)),
            )
            .unwrap();
        assert_eq!(reported.heading, Some(45.0));
        assert_eq!(reported.speed, Some(1.0));
    }

    #[test]
    fn test_filter_skips_bearing_when_stationary() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        filter.accept(GeoCoordinate::new(5.0, 5.0).with_timestamp(0));
        let fix = filter
            .accept(GeoCoordinate::new(5.0, 5.0).with_timestamp(1000))
            .unwrap();
        assert_eq!(fix.speed, Some(0.0));
        assert_eq!(fix.heading, None);
    }

    #[test]
    fn test_filter_rejects_out_of_range_fix_without_moving_baseline() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        filter.accept(GeoCoordinate::new(0.0, 0.0).with_timestamp(0));
        assert!(filter
            .accept(GeoCoordinate::new(200.0, 10.0).with_timestamp(1000))
            .is_none());
        assert!(filter
            .accept(GeoCoordinate::new(0.0, f64::NAN).with_timestamp(1500))
            .is_none());

        let fix = filter
            .accept(GeoCoordinate::new(0.0, 0.0001).with_timestamp(2000))
            .unwrap();
        assert!((fix.speed.unwrap() - 5.56).abs() < 0.05, "{:?}", fix.speed);
    }

    #[test]
    fn test_filter_drops_stale_fix() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        filter.accept(GeoCoordinate::new(0.0, 0.0).with_timestamp(5000));
        assert!(filter
            .accept(GeoCoordinate::new(0.0, 0.01).with_timestamp(4000))
            .is_none());

        let fix = filter
            .accept(GeoCoordinate::new(0.0, 0.0001).with_timestamp(6000))
            .unwrap();
        assert!((fix.speed.unwrap() - 11.12).abs() < 0.05, "{:?}", fix.speed);
    }

    #[test]
    fn test_filter_passes_untimed_fix_without_moving_baseline() {
        let mut filter = LocationFilter::new(&LocationConfig::default());
        filter.accept(GeoCoordinate::new(0.0, 0.0).with_timestamp(1000));
        let untimed = filter.accept(GeoCoordinate::new(0.0, 0.01)).unwrap();
        assert_eq!(untimed.speed, None);

        let fix = filter
            .accept(GeoCoordinate::new(0.0, 0.0001).with_timestamp(2000))
            .unwrap();
        assert!((fix.speed.unwrap() - 11.12).abs() < 0.05, "{:?}", fix.speed);
    }

    // ---- Simulated provider ----

    fn east_line() -> Vec<GeoCoordinate> {
        vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.001, 0.0)]
    }

    #[test]
    fn test_simulated_walk_along_path() {
        let mut sim = SimulatedLocation::new(east_line(), 10.0, 7).unwrap();
        assert!((sim.total_length_m() - 111.195).abs() < 0.01);

        let fix = sim.next_fix(1.0);
        let expected_lng = 0.001 * 10.0 / sim.total_length_m();
        assert!((fix.lng - expected_lng).abs() < 1e-9);
        assert!((fix.heading.unwrap() - 90.0).abs() < 1e-6);
        assert_eq!(fix.speed, Some(10.0));
        assert_eq!(fix.timestamp_ms, 1000);

        for _ in 0..20 {
            sim.next_fix(1.0);
        }
        assert!(sim.is_finished());
        let end = sim.next_fix(1.0);
        assert!((end.lng - 0.001).abs() < 1e-12);
        assert_eq!(end.speed, Some(0.0));
    }

    #[test]
    fn test_simulated_jitter_is_seeded_and_bounded() {
        let mut a = SimulatedLocation::new(east_line(), 1.0, 99)
            .unwrap()
            .with_jitter(3.0);
        let mut b = SimulatedLocation::new(east_line(), 1.0, 99)
            .unwrap()
            .with_jitter(3.0);
        let mut clean = SimulatedLocation::new(east_line(), 1.0, 99).unwrap();

        for _ in 0..50 {
            let fa = a.next_fix(0.5);
            let fb = b.next_fix(0.5);
            let fc = clean.next_fix(0.5);
            assert_eq!(fa, fb);
            assert!((fa.lng - fc.lng).abs() * 111_320.0 <= 3.0 + 1e-6);
            assert!((fa.lat - fc.lat).abs() * 111_320.0 <= 3.0 + 1e-6);
            assert_eq!(fa.accuracy, 5.0);
        }
    }

    #[test]
    fn test_simulated_rejects_bad_input() {
        assert!(SimulatedLocation::new(Vec::new(), 1.0, 0).is_err());
        assert!(SimulatedLocation::new(east_line(), f64::NAN, 0).is_err());
        let mut single = SimulatedLocation::new(vec![GeoCoordinate::new(1.0, 2.0)], 1.0, 0).unwrap();
        let fix = single.next_fix(1.0);
        assert_eq!((fix.lng, fix.lat), (1.0, 2.0));
        assert!(single.is_finished());
    }

    #[test]
    fn test_simulated_thread_publishes_into_slot() {
        let slot = LocationSlot::new();
        let sim = SimulatedLocation::new(east_line(), 5.0, 1).unwrap();
        let mut handle = sim.spawn(slot.writer(), Duration::from_millis(5)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut received = None;
        while received.is_none() && Instant::now() < deadline {
            received = slot.take();
            std::thread::sleep(Duration::from_millis(2));
        }
        handle.stop();
        assert!(!handle.is_running());
        assert!(received.unwrap().lng > 0.0);
    }

    // ---- Route fetch thread ----

    #[test]
    fn test_fetcher_round_trip() {
        let route = Route::new(east_line(), 0.0, 80.0).unwrap();
        let fetcher =
            RouteFetcher::spawn(Box::new(FixedRouteProvider::new(vec![route.clone()]))).unwrap();
        let request = RouteRequest {
            id: 7,
            start: east_line()[0],
            end: east_line()[1],
            options: RouteOptions::default(),
        };
        assert!(fetcher.submit(request));

        let (id, result) = fetcher.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(id, 7);
        assert_eq!(result.unwrap(), vec![route]);
        assert!(fetcher.poll().is_empty());
    }
}
