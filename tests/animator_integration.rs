//! Animator tick integration tests: attach/rescan, actions, locks and placement.

use std::task::Poll;

use bevy_ecs::prelude::*;

use memaoanimator::components::animationstate::{ActionName, AnimationMode, AnimationState};
use memaoanimator::components::charactergraphic::{CharacterGraphic, ScreenPosition};
use memaoanimator::components::facing::{Direction, Facing};
use memaoanimator::components::mapposition::MapPosition;
use memaoanimator::components::motion::{Controllable, EventId, Motion};
use memaoanimator::components::movementlock::{MovementGate, MovementLock};
use memaoanimator::components::rigidbody::RigidBody;
use memaoanimator::components::sprite::{SourceRect, Sprite};
use memaoanimator::components::spriteanimator::{SequenceKey, SpriteAnimator};
use memaoanimator::events::action::{ActionEnd, ActionFinishedEvent, ActionStartedEvent};
use memaoanimator::resources::actionaliases::ActionAliases;
use memaoanimator::resources::animatorconfig::AnimatorConfig;
use memaoanimator::resources::playerinput::PlayerInput;
use memaoanimator::resources::sheetlayout::SheetLayout;
use memaoanimator::systems::actions::{
    ActionTarget, FacingRequest, play_action, stop_action, wait_for_action,
};
use memaoanimator::systems::animation::sprite_animator_system;
use memaoanimator::systems::attach::memao_attach_system;
use memaoanimator::systems::input::player_input_system;
use memaoanimator::systems::movement::autonomous_movement_system;
use memaoanimator::systems::placement::{screen_position_system, sprite_placement_system};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Default)]
struct Finished(Vec<ActionFinishedEvent>);

#[derive(Resource, Default)]
struct Started(Vec<ActionStartedEvent>);

fn make_world(config: AnimatorConfig) -> World {
    let mut world = World::new();
    world.insert_resource(config.build_aliases());
    world.insert_resource(config);
    world.insert_resource(SheetLayout::default());
    world.insert_resource(PlayerInput::default());
    world.init_resource::<Finished>();
    world.init_resource::<Started>();
    world.add_observer(|trigger: On<ActionFinishedEvent>, mut log: ResMut<Finished>| {
        log.0.push(trigger.event().clone());
    });
    world.add_observer(|trigger: On<ActionStartedEvent>, mut log: ResMut<Started>| {
        log.0.push(trigger.event().clone());
    });
    world.flush();
    world
}

/// One schedule reused across ticks so the rescan counter keeps counting.
fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            memao_attach_system,
            player_input_system,
            autonomous_movement_system,
            screen_position_system,
            sprite_animator_system,
            sprite_placement_system,
        )
            .chain(),
    );
    schedule
}

fn run_ticks(world: &mut World, schedule: &mut Schedule, ticks: u32) {
    for _ in 0..ticks {
        schedule.run(world);
    }
}

fn spawn_player(world: &mut World) -> Entity {
    world
        .spawn((
            CharacterGraphic::new("teo_$(memao)"),
            Controllable,
            MapPosition::new(100.0, 50.0),
            ScreenPosition::default(),
            RigidBody::default(),
            Facing::default(),
            Motion::default(),
        ))
        .id()
}

fn spawn_npc(world: &mut World, id: u32, graphic: &str) -> Entity {
    world
        .spawn((
            CharacterGraphic::new(graphic),
            EventId(id),
            MapPosition::new(0.0, 0.0),
            ScreenPosition::default(),
            RigidBody::default(),
            Facing::default(),
            Motion::default(),
        ))
        .id()
}

fn src(world: &World, entity: Entity) -> SourceRect {
    world.get::<Sprite>(entity).map(|s| s.src).unwrap_or_default()
}

fn rect(row: u32, col: u32) -> SourceRect {
    SourceRect {
        x: (col - 1) * 48,
        y: (row - 1) * 48,
        width: 48,
        height: 48,
    }
}

#[test]
fn memao_graphic_gets_animator_and_idle_down_frame() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    let villager = spawn_npc(&mut world, 3, "villager");

    run_ticks(&mut world, &mut schedule, 1);

    assert!(world.get::<SpriteAnimator>(player).is_some());
    assert!(world.get::<AnimationState>(player).is_some());
    assert!(world.get::<MovementLock>(player).is_some());
    assert_eq!(src(&world, player), rect(1, 1));

    assert!(world.get::<SpriteAnimator>(villager).is_none());
    assert!(world.get::<Sprite>(villager).is_none());
}

#[test]
fn marker_match_is_case_insensitive() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let npc = spawn_npc(&mut world, 2, "Farmer_$(MEMAO)");

    run_ticks(&mut world, &mut schedule, 1);

    assert!(world.get::<SpriteAnimator>(npc).is_some());
}

#[test]
fn graphic_swap_is_noticed_on_next_rescan() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);

    run_ticks(&mut world, &mut schedule, 1);
    assert!(world.get::<SpriteAnimator>(player).is_some());

    world.get_mut::<CharacterGraphic>(player).unwrap().name = "teo".into();

    // Scans run every 20 ticks; the next one is the 21st run.
    run_ticks(&mut world, &mut schedule, 19);
    assert!(world.get::<SpriteAnimator>(player).is_some());
    run_ticks(&mut world, &mut schedule, 1);
    assert!(world.get::<SpriteAnimator>(player).is_none());
    assert!(world.get::<Sprite>(player).is_none());

    world.get_mut::<CharacterGraphic>(player).unwrap().name = "teo_$(memao)".into();
    run_ticks(&mut world, &mut schedule, 20);
    assert!(world.get::<SpriteAnimator>(player).is_some());
    assert_eq!(world.get::<Sprite>(player).unwrap().tex_key, "teo_$(memao)");
}

#[test]
fn swap_between_memao_sheets_keeps_playback() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);

    run_ticks(&mut world, &mut schedule, 1);
    world.get_mut::<CharacterGraphic>(player).unwrap().name = "ana_$(memao)".into();
    run_ticks(&mut world, &mut schedule, 20);

    assert_eq!(world.get::<Sprite>(player).unwrap().tex_key, "ana_$(memao)");
    let animator = world.get::<SpriteAnimator>(player).unwrap();
    assert_eq!(animator.key, Some(SequenceKey::Idle(Direction::Down)));
    assert_eq!(animator.frame_index, 1);
}

#[test]
fn walking_right_shows_walk_right_frames() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);

    world.insert_resource(PlayerInput::towards(Direction::Right, false));
    run_ticks(&mut world, &mut schedule, 1);

    assert_eq!(world.get::<Facing>(player).unwrap().0, Direction::Right);
    assert!(world.get::<Motion>(player).unwrap().moving);
    assert_eq!(src(&world, player), rect(5, 3));
    assert!(approx_eq(world.get::<MapPosition>(player).unwrap().x, 102.0));
}

#[test]
fn dashing_up_uses_split_run_sequence() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);

    world.insert_resource(PlayerInput::towards(Direction::Up, true));
    run_ticks(&mut world, &mut schedule, 1);

    let animator = world.get::<SpriteAnimator>(player).unwrap();
    assert_eq!(animator.key, Some(SequenceKey::Run(Direction::Up)));
    let rows: Vec<u32> = animator.sequence.iter().map(|c| c.row).collect();
    assert_eq!(rows, vec![6, 6, 7, 7, 7, 7]);
    assert_eq!(src(&world, player), rect(6, 7));
    assert!(approx_eq(world.get::<MapPosition>(player).unwrap().y, 46.0));
}

#[test]
fn one_shot_action_locks_then_releases_player() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    let target = play_action(
        &mut world,
        ActionTarget::Player,
        "  Chop ",
        FacingRequest::Fixed(Direction::Left),
        false,
        None,
    );
    assert_eq!(target, Some(player));
    assert!(world.is_locked(player));
    assert!(!world.can_accept_input(player));

    let started = &world.resource::<Started>().0;
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].action, ActionName::new("axe_chop"));
    assert_eq!(started[0].direction, Direction::Left);

    // Holding right must not move a locked player.
    world.insert_resource(PlayerInput::towards(Direction::Right, false));
    run_ticks(&mut world, &mut schedule, 1);
    assert_eq!(src(&world, player), rect(14, 1));

    run_ticks(&mut world, &mut schedule, 30);
    let state = world.get::<AnimationState>(player).unwrap();
    assert_eq!(state.mode, AnimationMode::Manual);
    assert!(!state.done);
    assert!(approx_eq(world.get::<MapPosition>(player).unwrap().x, 100.0));
    assert!(world.resource::<Finished>().0.is_empty());

    // 4 frames x 8 ticks: the 32nd tick wraps and completes.
    run_ticks(&mut world, &mut schedule, 1);
    let state = world.get::<AnimationState>(player).unwrap();
    assert_eq!(state.mode, AnimationMode::Autonomous);
    assert!(state.done);
    assert_eq!(state.cycle_count, 1);
    assert!(!world.is_locked(player));

    let finished = &world.resource::<Finished>().0;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].entity, player);
    assert_eq!(finished[0].reason, ActionEnd::Completed);
    assert_eq!(finished[0].cycles, 1);

    run_ticks(&mut world, &mut schedule, 1);
    assert!(approx_eq(world.get::<MapPosition>(player).unwrap().x, 102.0));
}

#[test]
fn looping_action_runs_until_stopped() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    play_action(
        &mut world,
        ActionTarget::Player,
        "hoe",
        FacingRequest::Current,
        true,
        None,
    );
    run_ticks(&mut world, &mut schedule, 96);

    let state = world.get::<AnimationState>(player).unwrap();
    assert_eq!(state.cycle_count, 3);
    assert_eq!(state.direction, Direction::Down);
    assert!(state.is_manual());
    assert!(world.is_locked(player));
    assert!(world.resource::<Finished>().0.is_empty());

    assert_eq!(
        stop_action(&mut world, ActionTarget::Player, None),
        Some(player)
    );
    let state = world.get::<AnimationState>(player).unwrap();
    assert_eq!(state.mode, AnimationMode::Autonomous);
    assert!(state.done);
    assert!(!world.is_locked(player));

    let finished = &world.resource::<Finished>().0;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].reason, ActionEnd::Stopped);
    assert_eq!(finished[0].cycles, 3);

    run_ticks(&mut world, &mut schedule, 1);
    let animator = world.get::<SpriteAnimator>(player).unwrap();
    assert_eq!(animator.key, Some(SequenceKey::Idle(Direction::Down)));
    assert_eq!(src(&world, player), rect(1, 1));
}

#[test]
fn stopping_an_idle_character_emits_nothing() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    assert_eq!(
        stop_action(&mut world, ActionTarget::Player, None),
        Some(player)
    );
    assert!(world.resource::<Finished>().0.is_empty());
    assert!(world.get::<AnimationState>(player).unwrap().done);
}

#[test]
fn wait_is_pending_until_action_finishes() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    // Nothing playing: ready right away.
    let wait = wait_for_action(&mut world, ActionTarget::Player, None).unwrap();
    assert_eq!(wait.poll(&world), Poll::Ready(()));

    play_action(
        &mut world,
        ActionTarget::Player,
        "pickup",
        FacingRequest::Current,
        false,
        None,
    );
    let wait = wait_for_action(&mut world, ActionTarget::Player, None).unwrap();

    let mut ready_after = None;
    for tick in 1..=40u32 {
        run_ticks(&mut world, &mut schedule, 1);
        if wait.poll(&world).is_ready() {
            ready_after = Some(tick);
            break;
        }
    }
    assert_eq!(ready_after, Some(32));
}

#[test]
fn wait_on_despawned_target_is_ready() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let npc = spawn_npc(&mut world, 5, "girl_$(memao)");
    run_ticks(&mut world, &mut schedule, 1);

    play_action(
        &mut world,
        ActionTarget::EventId(5),
        "reap",
        FacingRequest::Current,
        true,
        None,
    );
    let wait = wait_for_action(&mut world, ActionTarget::EventId(5), None).unwrap();
    assert!(wait.poll(&world).is_pending());

    world.despawn(npc);
    assert!(wait.poll(&world).is_ready());
}

#[test]
fn targets_resolve_by_event_id_and_invoker() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    let npc = spawn_npc(&mut world, 7, "smith_$(memao)");
    run_ticks(&mut world, &mut schedule, 1);

    let hit = play_action(
        &mut world,
        ActionTarget::ThisEvent,
        "Axe_Strike",
        FacingRequest::parse("UP"),
        false,
        Some(7),
    );
    assert_eq!(hit, Some(npc));
    let state = world.get::<AnimationState>(npc).unwrap();
    assert_eq!(state.action, ActionName::new("axe_strike"));
    assert_eq!(state.direction, Direction::Up);
    assert!(world.is_locked(npc));
    assert!(!world.is_locked(player));

    assert_eq!(
        stop_action(&mut world, ActionTarget::EventId(7), None),
        Some(npc)
    );
    assert!(!world.is_locked(npc));
}

#[test]
fn unknown_target_is_a_no_op() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let npc = spawn_npc(&mut world, 7, "smith_$(memao)");
    run_ticks(&mut world, &mut schedule, 1);

    let missing = play_action(
        &mut world,
        ActionTarget::EventId(99),
        "hoe",
        FacingRequest::Current,
        false,
        None,
    );
    assert_eq!(missing, None);
    assert_eq!(
        play_action(
            &mut world,
            ActionTarget::ThisEvent,
            "hoe",
            FacingRequest::Current,
            false,
            None,
        ),
        None
    );
    assert_eq!(stop_action(&mut world, ActionTarget::Player, None), None);
    assert!(wait_for_action(&mut world, ActionTarget::EventId(99), None).is_none());

    assert!(!world.get::<AnimationState>(npc).unwrap().is_manual());
    assert!(world.resource::<Started>().0.is_empty());
}

#[test]
fn locked_npc_ignores_its_velocity() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let npc = spawn_npc(&mut world, 4, "dog_$(memao)");
    world.get_mut::<RigidBody>(npc).unwrap().vx = -1.0;
    run_ticks(&mut world, &mut schedule, 1);
    assert!(approx_eq(world.get::<MapPosition>(npc).unwrap().x, -1.0));
    assert_eq!(world.get::<Facing>(npc).unwrap().0, Direction::Left);

    play_action(
        &mut world,
        ActionTarget::EventId(4),
        "plant",
        FacingRequest::Fixed(Direction::Down),
        true,
        None,
    );
    run_ticks(&mut world, &mut schedule, 10);
    assert!(approx_eq(world.get::<MapPosition>(npc).unwrap().x, -1.0));

    stop_action(&mut world, ActionTarget::EventId(4), None);
    run_ticks(&mut world, &mut schedule, 1);
    assert!(approx_eq(world.get::<MapPosition>(npc).unwrap().x, -2.0));
}

#[test]
fn unknown_action_plays_idle_with_first_frame_hold() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    play_action(
        &mut world,
        ActionTarget::Player,
        "juggle",
        FacingRequest::Fixed(Direction::Right),
        false,
        None,
    );
    run_ticks(&mut world, &mut schedule, 1);

    let state = world.get::<AnimationState>(player).unwrap();
    assert!(state.action.is_idle());
    let cols: Vec<u32> = world
        .get::<SpriteAnimator>(player)
        .unwrap()
        .sequence
        .iter()
        .map(|c| c.col)
        .collect();
    assert_eq!(cols, vec![5, 5, 5, 5, 5, 6, 7, 8]);

    // 8 frames x 8 ticks.
    run_ticks(&mut world, &mut schedule, 62);
    assert!(world.is_locked(player));
    run_ticks(&mut world, &mut schedule, 1);
    assert!(!world.is_locked(player));
}

#[test]
fn configured_fps_and_aliases_apply() {
    let mut config = AnimatorConfig::new();
    config
        .load_from_str("[timing]\naction_fps = 4\n\n[aliases]\nslash = axe_strike\n")
        .unwrap();
    let mut world = make_world(config);
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    run_ticks(&mut world, &mut schedule, 1);

    assert!(!world.resource::<ActionAliases>().is_empty());
    play_action(
        &mut world,
        ActionTarget::Player,
        "Slash",
        FacingRequest::Current,
        false,
        None,
    );
    assert_eq!(
        world.get::<AnimationState>(player).unwrap().action,
        ActionName::new("axe_strike")
    );

    // 60 / 4 = 15 ticks per frame, 4 frames.
    run_ticks(&mut world, &mut schedule, 59);
    assert!(world.is_locked(player));
    run_ticks(&mut world, &mut schedule, 1);
    assert!(!world.is_locked(player));
}

#[test]
fn placement_anchors_feet_with_scale_and_offset() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    *world.get_mut::<MapPosition>(player).unwrap() = MapPosition::new(100.3, 50.2);

    run_ticks(&mut world, &mut schedule, 1);

    let sprite = world.get::<Sprite>(player).unwrap();
    // y = 50.2 + 5 * 1.5 = 57.7, rounded.
    assert!(approx_eq(sprite.x, 100.0));
    assert!(approx_eq(sprite.y, 58.0));
    assert!(approx_eq(sprite.origin_x, 24.0));
    assert!(approx_eq(sprite.origin_y, 48.0));
    assert!(approx_eq(sprite.zoom, 1.5));
}

#[test]
fn placement_without_crisp_pixels_keeps_fractions() {
    let mut config = AnimatorConfig::new();
    config.crisp_pixels = false;
    config.x_offset = 2.0;
    let mut world = make_world(config);
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);
    *world.get_mut::<MapPosition>(player).unwrap() = MapPosition::new(100.3, 50.2);

    run_ticks(&mut world, &mut schedule, 1);

    let sprite = world.get::<Sprite>(player).unwrap();
    assert!(approx_eq(sprite.x, 102.3));
    assert!(approx_eq(sprite.y, 57.7));
}

#[test]
fn action_started_mid_walk_returns_straight_to_idle() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let player = spawn_player(&mut world);

    world.insert_resource(PlayerInput::towards(Direction::Right, false));
    run_ticks(&mut world, &mut schedule, 5);
    assert!(world.get::<Motion>(player).unwrap().moving);

    world.resource_mut::<PlayerInput>().release();
    play_action(
        &mut world,
        ActionTarget::Player,
        "chop",
        FacingRequest::Current,
        false,
        None,
    );

    run_ticks(&mut world, &mut schedule, 1);
    assert!(!world.get::<Motion>(player).unwrap().moving);

    run_ticks(&mut world, &mut schedule, 31);
    assert!(!world.is_locked(player));
    let x = world.get::<MapPosition>(player).unwrap().x;

    run_ticks(&mut world, &mut schedule, 1);
    let animator = world.get::<SpriteAnimator>(player).unwrap();
    assert_eq!(animator.key, Some(SequenceKey::Idle(Direction::Right)));
    assert_eq!(src(&world, player), rect(2, 5));
    assert!(approx_eq(world.get::<MapPosition>(player).unwrap().x, x));
}

#[test]
fn detaching_mid_action_stops_it_and_unlocks() {
    let mut world = make_world(AnimatorConfig::new());
    let mut schedule = make_schedule();
    let npc = spawn_npc(&mut world, 6, "miner_$(memao)");
    run_ticks(&mut world, &mut schedule, 1);

    play_action(
        &mut world,
        ActionTarget::EventId(6),
        "pickaxe",
        FacingRequest::Current,
        false,
        None,
    );
    let wait = wait_for_action(&mut world, ActionTarget::EventId(6), None).unwrap();
    run_ticks(&mut world, &mut schedule, 5);
    assert!(wait.poll(&world).is_pending());

    world.get_mut::<CharacterGraphic>(npc).unwrap().name = "miner".into();
    run_ticks(&mut world, &mut schedule, 15);

    assert!(world.get::<SpriteAnimator>(npc).is_none());
    assert!(!world.is_locked(npc));
    assert!(wait.poll(&world).is_ready());
    let state = world.get::<AnimationState>(npc).unwrap();
    assert_eq!(state.mode, AnimationMode::Autonomous);
    assert!(state.done);

    let finished = &world.resource::<Finished>().0;
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].entity, npc);
    assert_eq!(finished[0].reason, ActionEnd::Stopped);
}
