#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use glam::DVec3;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use wayfarer_core::commands::InputState;
    use wayfarer_core::config::{CharacterConfig, PhysicsConfig};

    use crate::body::PhysicsBody;
    use crate::character::{smooth_damp, CharacterController};
    use crate::world::PhysicsWorld;

    const DT: f64 = 1.0 / 60.0;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&PhysicsConfig::default())
    }

    fn floating(position: DVec3) -> PhysicsBody {
        PhysicsBody::new(position).with_gravity(false)
    }

    // ---- Body integration ----

    #[test]
    fn test_velocity_never_exceeds_max() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut body = PhysicsBody::new(DVec3::new(0.0, 50.0, 0.0))
            .with_max_velocity(20.0)
            .with_friction(0.95);

        for _ in 0..2_000 {
            for _ in 0..rng.gen_range(0..4) {
                body.add_force(DVec3::new(
                    rng.gen_range(-1e5..1e5),
                    rng.gen_range(-1e5..1e5),
                    rng.gen_range(-1e5..1e5),
                ));
            }
            if rng.gen_bool(0.05) {
                body.apply_impulse(DVec3::new(0.0, rng.gen_range(0.0..1e4), 0.0));
            }
            body.integrate(DT, 9.81, -100.0);
            assert!(
                body.velocity.length() <= 20.0 + 1e-9,
                "speed {} over cap",
                body.velocity.length()
            );
        }
    }

    #[test]
    fn test_falling_body_settles_on_ground() {
        let mut body = PhysicsBody::new(DVec3::new(3.0, 5.0, -2.0));
        for _ in 0..600 {
            body.integrate(DT, 9.81, -100.0);
        }
        assert_eq!(body.position.y, 0.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.is_grounded);
    }

    #[test]
    fn test_airborne_body_is_not_grounded() {
        let mut body = PhysicsBody::new(DVec3::new(0.0, 10.0, 0.0));
        body.integrate(DT, 9.81, -100.0);
        assert!(!body.is_grounded);
        assert!(body.velocity.y < 0.0);
    }

    // ---- Accumulator ----

    #[test]
    fn test_single_long_frame_matches_many_short_frames() {
        let start = DVec3::new(0.0, 4.0, 0.0);
        let launch = DVec3::new(3.0, 2.0, -1.5);

        let mut one_call = world();
        let a = one_call.add_body(PhysicsBody::new(start));
        one_call.body_mut(a).unwrap().velocity = launch;

        let mut six_calls = world();
        let b = six_calls.add_body(PhysicsBody::new(start));
        six_calls.body_mut(b).unwrap().velocity = launch;

        assert_eq!(one_call.step(0.1), 6);
        let mut total = 0;
        for _ in 0..6 {
            total += six_calls.step(DT);
        }
        assert_eq!(total, 6);

        let body_a = one_call.body(a).unwrap();
        let body_b = six_calls.body(b).unwrap();
        assert_eq!(body_a.position, body_b.position);
        assert_eq!(body_a.velocity, body_b.velocity);
    }

    #[test]
    fn test_short_frames_carry_remainder() {
        let mut world = world();
        assert_eq!(world.step(DT * 0.5), 0);
        assert!((world.accumulator() - DT * 0.5).abs() < 1e-12);
        assert_eq!(world.step(DT * 0.5), 1);
        assert!(world.accumulator() < 1e-9);
    }

    #[test]
    fn test_catch_up_is_capped_and_excess_discarded() {
        let mut world = world();
        world.add_body(PhysicsBody::new(DVec3::new(0.0, 1.0, 0.0)));
        let steps = world.step(1.0);
        assert_eq!(steps, PhysicsConfig::default().max_substeps);
        assert_eq!(world.accumulator(), 0.0);
        assert_eq!(world.total_steps(), steps as u64);
    }

    #[test]
    fn test_bad_elapsed_runs_nothing() {
        let mut world = world();
        assert_eq!(world.step(0.0), 0);
        assert_eq!(world.step(-1.0), 0);
        assert_eq!(world.step(f64::NAN), 0);
        assert_eq!(world.step(f64::INFINITY), 0);
        assert_eq!(world.accumulator(), 0.0);
    }

    #[test]
    fn test_accumulate_leaves_stepping_to_caller() {
        let mut world = world();
        let handle = world.add_body(PhysicsBody::new(DVec3::new(0.0, 2.0, 0.0)));
        assert_eq!(world.accumulate(3.0 * DT), 3);
        assert_eq!(world.total_steps(), 0);
        assert_eq!(world.body(handle).unwrap().position.y, 2.0);
        world.fixed_update();
        assert_eq!(world.total_steps(), 1);
        assert!(world.body(handle).unwrap().position.y < 2.0);
    }

    // ---- Collisions ----

    #[test]
    fn test_overlapping_bodies_pushed_apart_symmetrically() {
        let mut world = world();
        let a = world.add_body(floating(DVec3::new(0.0, 1.0, 0.0)));
        let b = world.add_body(floating(DVec3::new(0.6, 1.0, 0.0)));
        world.resolve_collisions();

        let pa = world.body(a).unwrap().position;
        let pb = world.body(b).unwrap().position;
        assert!((pa.x + 0.2).abs() < 1e-12);
        assert!((pb.x - 0.8).abs() < 1e-12);
        assert!(((pb - pa).length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_bodies_separate_along_x() {
        let mut world = world();
        let a = world.add_body(floating(DVec3::new(2.0, 1.0, 2.0)));
        let b = world.add_body(floating(DVec3::new(2.0, 1.0, 2.0)));
        world.resolve_collisions();
        assert_eq!(world.body(a).unwrap().position, DVec3::new(1.5, 1.0, 2.0));
        assert_eq!(world.body(b).unwrap().position, DVec3::new(2.5, 1.0, 2.0));
    }

    #[test]
    fn test_separated_bodies_untouched() {
        let mut world = world();
        let a = world.add_body(floating(DVec3::new(0.0, 1.0, 0.0)));
        let b = world.add_body(floating(DVec3::new(5.0, 1.0, 0.0)));
        world.resolve_collisions();
        assert_eq!(world.body(a).unwrap().position, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(world.body(b).unwrap().position, DVec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_push_never_sinks_clamped_body() {
        let mut world = world();
        let a = world.add_body(PhysicsBody::new(DVec3::new(0.0, 0.0, 0.0)));
        let b = world.add_body(floating(DVec3::new(0.0, 0.5, 0.0)));
        world.resolve_collisions();
        assert_eq!(world.body(a).unwrap().position.y, 0.0);
        assert!(world.body(b).unwrap().position.y > 0.5);
    }

    // ---- World management ----

    #[test]
    fn test_remove_body() {
        let mut world = world();
        let handle = world.add_body(PhysicsBody::default());
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(handle));
        assert!(!world.remove_body(handle));
        assert!(world.body(handle).is_none());
        assert!(world.body_mut(handle).is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_shift_origin_and_rescale_are_horizontal() {
        let mut world = world();
        let handle = world.add_body(floating(DVec3::new(10.0, 2.0, -5.0)));

        world.shift_origin(DVec3::new(4.0, 100.0, 1.0));
        assert_eq!(world.body(handle).unwrap().position, DVec3::new(6.0, 2.0, -6.0));

        world.rescale(2.0);
        assert_eq!(world.body(handle).unwrap().position, DVec3::new(12.0, 2.0, -12.0));

        world.rescale(f64::NAN);
        world.rescale(0.0);
        assert_eq!(world.body(handle).unwrap().position, DVec3::new(12.0, 2.0, -12.0));
    }

    // ---- Character ----

    fn character() -> (PhysicsWorld, CharacterController) {
        let mut world = world();
        let controller = CharacterController::new(&mut world, &CharacterConfig::default(), DVec3::ZERO);
        (world, controller)
    }

    #[test]
    fn test_diagonal_input_is_normalised() {
        let (_world, mut controller) = character();
        controller.set_input(InputState {
            forward: true,
            right: true,
            ..Default::default()
        });
        assert!((controller.move_input().length() - 1.0).abs() < 1e-12);

        controller.set_input(InputState {
            forward: true,
            backward: true,
            ..Default::default()
        });
        assert_eq!(controller.move_input().length(), 0.0);
    }

    #[test]
    fn test_walk_forward_writes_north_velocity() {
        let (mut world, mut controller) = character();
        controller.set_input(InputState {
            forward: true,
            ..Default::default()
        });
        controller.update(&mut world, DT);

        let body = world.body(controller.body()).unwrap();
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, -4.0);
        assert!(controller.state().is_moving);
        assert!((controller.state().speed - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_world_scale_keeps_ground_speed() {
        let (mut world, mut controller) = character();
        controller.set_world_scale(&mut world, 2.0);
        controller.set_world_scale(&mut world, f64::NAN);
        controller.set_world_scale(&mut world, 0.0);
        assert_eq!(controller.world_scale(), 2.0);

        controller.set_input(InputState {
            forward: true,
            ..Default::default()
        });
        controller.update(&mut world, DT);

        let body = world.body(controller.body()).unwrap();
        assert_eq!(body.velocity.z, -8.0);
        assert_eq!(body.max_velocity(), 2.0 * CharacterConfig::default().max_velocity);
        assert!((controller.state().speed - 4.0).abs() < 1e-12, "reported in m/s");
    }

    #[test]
    fn test_sprint_and_view_heading() {
        let (mut world, mut controller) = character();
        controller.set_view_heading(FRAC_PI_2);
        controller.set_input(InputState {
            forward: true,
            sprint: true,
            ..Default::default()
        });
        controller.update(&mut world, DT);

        let velocity = world.body(controller.body()).unwrap().velocity;
        assert!((velocity.x - 8.0).abs() < 1e-12, "facing east: {velocity}");
        assert!(velocity.z.abs() < 1e-12);
    }

    #[test]
    fn test_walking_preserves_vertical_velocity() {
        let (mut world, mut controller) = character();
        world.body_mut(controller.body()).unwrap().velocity.y = 3.0;
        controller.set_input(InputState {
            left: true,
            ..Default::default()
        });
        controller.update(&mut world, DT);
        assert_eq!(world.body(controller.body()).unwrap().velocity.y, 3.0);
    }

    #[test]
    fn test_heading_turns_smoothly() {
        let (mut world, mut controller) = character();
        controller.set_input(InputState {
            right: true,
            ..Default::default()
        });

        controller.update(&mut world, DT);
        let first = controller.heading();
        assert!(first > 0.0 && first < FRAC_PI_2, "no snap: {first}");

        let mut previous = first;
        for _ in 0..240 {
            controller.update(&mut world, DT);
            assert!(controller.heading() >= previous - 1e-12, "no overshoot back");
            assert!(controller.heading() <= FRAC_PI_2 + 1e-9);
            previous = controller.heading();
        }
        assert!((controller.heading() - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_heading_takes_shortest_way_round() {
        let (mut world, mut controller) = character();
        controller.set_input(InputState {
            left: true,
            ..Default::default()
        });
        controller.update(&mut world, DT);
        // Turning west from north goes counter-clockwise through 2π, not via π.
        assert!(controller.heading() > PI);
        for _ in 0..240 {
            controller.update(&mut world, DT);
        }
        assert!((controller.heading() - 1.5 * PI).abs() < 1e-3);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let (mut world, mut controller) = character();
        assert!(!controller.jump(&mut world), "not grounded before first step");

        world.step(DT);
        assert!(world.body(controller.body()).unwrap().is_grounded);
        assert!(controller.jump(&mut world));
        assert_eq!(world.body(controller.body()).unwrap().velocity.y, 5.0);
        assert!(!controller.jump(&mut world), "no double jump");

        world.step(DT);
        let body = world.body(controller.body()).unwrap();
        assert!(body.position.y > 0.0);
        assert!(!body.is_grounded);
        assert!(!controller.jump(&mut world));
    }

    #[test]
    fn test_anchor_pins_horizontal_position() {
        let (mut world, mut controller) = character();
        world.body_mut(controller.body()).unwrap().position.y = 1.5;
        controller.anchor_to(&mut world, DVec3::new(10.0, 99.0, -3.0), Some(90.0), Some(1.5));

        let body = world.body(controller.body()).unwrap();
        assert_eq!(body.position, DVec3::new(10.0, 1.5, -3.0));
        let state = controller.state();
        assert!(state.is_moving);
        assert_eq!(state.speed, 1.5);

        for _ in 0..240 {
            controller.update(&mut world, DT);
        }
        assert!((controller.heading() - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_anchor_heading_ignored_when_stationary() {
        let (mut world, mut controller) = character();
        controller.anchor_to(&mut world, DVec3::ZERO, Some(180.0), Some(0.0));
        for _ in 0..60 {
            controller.update(&mut world, DT);
        }
        assert_eq!(controller.heading(), 0.0);
        assert!(!controller.state().is_moving);
    }

    #[test]
    fn test_despawn_removes_body() {
        let (mut world, controller) = character();
        assert_eq!(world.body_count(), 1);
        assert!(controller.despawn(&mut world));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..600 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.12, DT);
            assert!(value <= 1.0);
        }
        assert!((value - 1.0).abs() < 1e-6);
    }
}
