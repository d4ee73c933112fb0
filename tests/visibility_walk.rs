//! Properties of the sub-chunk visibility walk over generated terrain.

use std::collections::HashSet;

use cgmath::{Deg, Point2, Point3, Rad};
use cosmicland_client::engine_state::{
    player::Player,
    screens::world_screen::visibility::{collect_visible_sub_chunks, VisibilityQuery},
    voxels::world::World,
};

fn generated_world() -> World {
    let mut world = World::new(42);
    world.load_around(Point2::new(0, 0), 2);
    world
}

fn eye_above_ground(world: &World) -> Point3<f64> {
    let ground = world.surface_height(8, 8).unwrap();
    Point3::new(8.5, ground as f64 + 1.62, 8.5)
}

fn query(eye: Point3<f64>, render_distance: u32) -> VisibilityQuery {
    VisibilityQuery {
        eye,
        view_direction: None,
        render_distance,
        view_cone: Rad(std::f64::consts::TAU),
    }
}

#[test]
fn repeated_walks_agree() {
    let world = generated_world();
    let query = query(eye_above_ground(&world), 4);

    let first = collect_visible_sub_chunks(&world, &query);
    let second = collect_visible_sub_chunks(&world, &query);

    assert!(first.count() > 0);
    assert_eq!(first, second);
}

#[test]
fn larger_render_distance_never_draws_less() {
    let world = generated_world();
    let eye = eye_above_ground(&world);

    let walks: Vec<_> = (0..=6)
        .map(|distance| collect_visible_sub_chunks(&world, &query(eye, distance)))
        .collect();

    for pair in walks.windows(2) {
        assert!(pair[0].count() <= pair[1].count());
        assert!(pair[0]
            .sub_chunks()
            .iter()
            .all(|visible| pair[1].contains(visible.position)));
    }
}

#[test]
fn no_sub_chunk_is_submitted_twice() {
    let world = generated_world();
    let player = Player::new(eye_above_ground(&world), Deg(30.0), Deg(-20.0));

    for view_cone in [None, Some(Deg(110.0))] {
        let query = VisibilityQuery::from_player(&player, 6, view_cone);
        let visible = collect_visible_sub_chunks(&world, &query);
        let unique: HashSet<_> = visible.sub_chunks().iter().map(|v| v.position).collect();

        assert_eq!(unique.len(), visible.count());
        assert!(visible.visited() >= visible.count());
    }
}

#[test]
fn view_cone_only_removes_sub_chunks() {
    let world = generated_world();
    let player = Player::new(eye_above_ground(&world), Deg(0.0), Deg(-10.0));

    let all = collect_visible_sub_chunks(&world, &VisibilityQuery::from_player(&player, 5, None));
    let culled = collect_visible_sub_chunks(
        &world,
        &VisibilityQuery::from_player(&player, 5, Some(Deg(90.0))),
    );

    assert!(culled.count() <= all.count());
    assert!(culled
        .sub_chunks()
        .iter()
        .all(|visible| all.contains(visible.position)));
}

#[test]
fn unloaded_columns_are_never_entered() {
    let mut world = generated_world();
    let eye = eye_above_ground(&world);
    world.remove_chunk(Point2::new(1, 0));

    let visible = collect_visible_sub_chunks(&world, &query(eye, 6));

    assert!(visible
        .sub_chunks()
        .iter()
        .all(|v| (v.position.x, v.position.z) != (1, 0)));

    world.remove_chunk(Point2::new(0, 0));
    assert_eq!(collect_visible_sub_chunks(&world, &query(eye, 6)).count(), 0);
}
