//! Memao animator main entry point.
//!
//! Runs a headless simulation of a controllable character and a map event wearing a Memao
//! sheet, using:
//! - **bevy_ecs** for the component/system schedule
//! - **configparser** for the INI configuration
//! - **serde_json** for an optional layout override
//!
//! # Main Loop
//!
//! 1. Load `memao.ini` (or `--config`), then the layout override if any
//! 2. Insert resources, register observers, spawn the player and one map event
//! 3. Walk for `--walk-ticks`, then play `--action` on `--target` if given
//! 4. Log every source-rectangle change and action completion
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --walk-ticks 30 --action chop --direction left
//! ```

use std::path::PathBuf;
use std::task::Poll;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use memaoanimator::components::charactergraphic::{CharacterGraphic, ScreenPosition};
use memaoanimator::components::facing::{Direction, Facing};
use memaoanimator::components::mapposition::MapPosition;
use memaoanimator::components::motion::{Controllable, EventId, Motion};
use memaoanimator::components::rigidbody::RigidBody;
use memaoanimator::components::sprite::{SourceRect, Sprite};
use memaoanimator::events::action::{ActionFinishedEvent, ActionStartedEvent};
use memaoanimator::resources::animatorconfig::AnimatorConfig;
use memaoanimator::resources::playerinput::PlayerInput;
use memaoanimator::resources::sheetlayout::SheetLayout;
use memaoanimator::systems::actions::{
    ActionTarget, ActionWait, FacingRequest, play_action, wait_for_action,
};
use memaoanimator::systems::animation::sprite_animator_system;
use memaoanimator::systems::attach::memao_attach_system;
use memaoanimator::systems::input::player_input_system;
use memaoanimator::systems::movement::autonomous_movement_system;
use memaoanimator::systems::placement::{screen_position_system, sprite_placement_system};

/// Memao sprite animator
#[derive(Parser)]
#[command(version, about = "Headless driver for Memao-style character sheets")]
struct Cli {
    /// INI configuration file (default: ./memao.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON layout override; takes precedence over the config's `layout`.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,

    /// Total ticks to simulate.
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Ticks the player walks before the action starts.
    #[arg(long, default_value_t = 60)]
    walk_ticks: u32,

    /// Hold the dash button while walking.
    #[arg(long)]
    dash: bool,

    /// Action to play after walking (synonyms accepted).
    #[arg(long)]
    action: Option<String>,

    /// Walk and action direction: up, down, left, right or numpad 2/4/6/8.
    #[arg(long, default_value = "right")]
    direction: String,

    /// Who plays the action: player, this_event or event_id.
    #[arg(long, default_value = "player")]
    target: String,

    /// Event id used by `--target event_id` and `--target this_event`.
    #[arg(long, default_value_t = 1)]
    event_id: u32,

    /// Repeat the action until the simulation ends.
    #[arg(long = "loop")]
    looped: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnimatorConfig::with_path(path),
        None => AnimatorConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let layout_path = cli.layout.clone().or_else(|| config.layout_path.clone());
    let layout = match layout_path {
        Some(path) => SheetLayout::load_from_file(&path).unwrap_or_else(|e| {
            error!("Failed to load layout {}: {}", path.display(), e);
            SheetLayout::default()
        }),
        None => SheetLayout::default(),
    };
    info!("Sheet layout has {} entries", layout.len());

    let direction = match cli.direction.trim().parse::<u8>() {
        Ok(code) => Direction::from_numpad(code),
        Err(_) => Direction::parse(&cli.direction).unwrap_or_else(|| {
            warn!("Unknown direction '{}', walking right", cli.direction);
            Direction::Right
        }),
    };
    let target = ActionTarget::from_name(&cli.target, cli.event_id).unwrap_or_else(|| {
        warn!("Unknown target '{}', using the player", cli.target);
        ActionTarget::Player
    });

    let mut world = World::new();
    world.insert_resource(config.build_aliases());
    world.insert_resource(config);
    world.insert_resource(layout);
    world.insert_resource(PlayerInput::default());

    world.add_observer(|trigger: On<ActionStartedEvent>| {
        let event = trigger.event();
        info!(
            "Action started: '{}' facing {} ({}) on {:?}",
            event.action,
            event.direction.label(),
            event.direction.as_numpad(),
            event.entity
        );
    });
    world.add_observer(|trigger: On<ActionFinishedEvent>| {
        let event = trigger.event();
        info!(
            "Action finished: '{}' on {:?} ({:?}, {} cycles)",
            event.action, event.entity, event.reason, event.cycles
        );
    });
    world.flush();

    let player = world
        .spawn((
            CharacterGraphic::new("teo_$(memao)"),
            Controllable,
            MapPosition::new(160.0, 120.0),
            ScreenPosition::new(160.0, 120.0),
            RigidBody::default(),
            Facing::default(),
            Motion::default(),
        ))
        .id();
    world.spawn((
        CharacterGraphic::new("smith_$(memao)"),
        EventId(cli.event_id),
        MapPosition::new(200.0, 120.0),
        ScreenPosition::new(200.0, 120.0),
        RigidBody::default(),
        Facing::default(),
        Motion::default(),
    ));

    let mut update = Schedule::default();
    update.add_systems(
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

    let mut last_src: Option<SourceRect> = None;
    let mut pending: Option<ActionWait> = None;

    for tick in 0..cli.ticks {
        if tick < cli.walk_ticks {
            world.insert_resource(PlayerInput::towards(direction, cli.dash));
        } else if tick == cli.walk_ticks {
            world.resource_mut::<PlayerInput>().release();
            if let Some(action) = &cli.action {
                let invoker = Some(cli.event_id);
                play_action(
                    &mut world,
                    target,
                    action,
                    FacingRequest::Fixed(direction),
                    cli.looped,
                    invoker,
                );
                pending = wait_for_action(&mut world, target, invoker);
            }
        }

        update.run(&mut world);

        if let Some(sprite) = world.get::<Sprite>(player) {
            if last_src != Some(sprite.src) {
                info!(
                    "tick {:>4}: src ({}, {}) at ({}, {})",
                    tick, sprite.src.x, sprite.src.y, sprite.x, sprite.y
                );
                last_src = Some(sprite.src);
            }
        }

        if let Some(wait) = pending {
            if let Poll::Ready(()) = wait.poll(&world) {
                info!("tick {:>4}: {:?} is free to move again", tick, wait.entity);
                pending = None;
            }
        }
    }

    info!("Simulated {} ticks", cli.ticks);
}
