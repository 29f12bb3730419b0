//=========================================================================
// Level
//=========================================================================
//
// Level definitions and the scene that plays them.
//
// Responsibilities:
// - `LevelDefinition`: TOML description of player spawn, solid geometry,
//   props and inline notes
// - `LevelSource`: where a level and its note directory come from
// - `LevelScene`: builds world, entities and player on every `on_enter`
//   and forwards `update` / `fixed_update` to the movement controller
//
// Lifecycle:
// ```text
//   on_enter ─► reload source (keep last good on error) ─► build state
//            └► presenter.close()
//   update   ─► controller.look(...) ─► camera.follow(body)
//            └► controller.update(...)
//   fixed    ─► controller.fixed_update(world, step)
//   on_exit  ─► drop state, presenter.close()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::camera::Camera;
use super::movement::MovementController;
use super::note::{NoteContent, NoteLibrary};
use super::presenter::{NotePanel, NotePresenter};
use super::{GameScene, NoteAction};
use crate::config::PlayerConfig;
use crate::core::entity::{Capability, EntityStore};
use crate::core::globals::GlobalContext;
use crate::core::input::InputSource;
use crate::core::physics::{Aabb, BodyDesc, CollisionWorld, PhysicsWorld};
use crate::core::scene::{Scene, SceneTransition};
use crate::error::{NotesError, Result};

//=== LevelDefinition =====================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDefinition {
    pub player: PlayerSpawn,
    pub solids: Vec<BoxDef>,
    pub props: Vec<PropDef>,

    /// Notes defined inline, merged over the note directory.
    pub notes: Vec<NoteContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpawn {
    /// Body centre.
    pub position: Vec3,

    /// Rotation about +Y; 0 faces +Z.
    pub yaw_degrees: f32,

    pub half_extents: Vec3,
    pub eye_height: f32,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.9, 0.0),
            yaw_degrees: 0.0,
            half_extents: Vec3::new(0.3, 0.9, 0.3),
            eye_height: 0.6,
        }
    }
}

/// Named solid box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

/// Solid box that may carry a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDef {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,

    /// Name of the note this prop shows when clicked.
    #[serde(default)]
    pub note: Option<String>,
}

impl LevelDefinition {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| NotesError::io(path, e))?;
        toml::from_str(&source).map_err(|e| NotesError::parse(path, e))
    }

    /// A small walled room with two pinned notes and a crate.
    pub fn demo() -> Self {
        let wall = |name: &str, min: [f32; 3], max: [f32; 3]| BoxDef {
            name: name.to_string(),
            min: Vec3::from(min),
            max: Vec3::from(max),
        };

        Self {
            player: PlayerSpawn::default(),
            solids: vec![
                wall("floor", [-5.0, -0.2, -5.0], [5.0, 0.0, 5.0]),
                wall("north wall", [-5.0, 0.0, 5.0], [5.0, 3.0, 5.2]),
                wall("south wall", [-5.0, 0.0, -5.2], [5.0, 3.0, -5.0]),
                wall("east wall", [5.0, 0.0, -5.0], [5.2, 3.0, 5.0]),
                wall("west wall", [-5.2, 0.0, -5.0], [-5.0, 3.0, 5.0]),
            ],
            props: vec![
                PropDef {
                    name: "notice board".to_string(),
                    min: Vec3::new(-0.6, 1.0, 4.8),
                    max: Vec3::new(0.6, 2.0, 5.0),
                    note: Some("welcome".to_string()),
                },
                PropDef {
                    name: "torn page".to_string(),
                    min: Vec3::new(4.8, 1.2, -0.4),
                    max: Vec3::new(5.0, 1.8, 0.4),
                    note: Some("torn-page".to_string()),
                },
                PropDef {
                    name: "crate".to_string(),
                    min: Vec3::new(2.0, 0.0, 2.0),
                    max: Vec3::new(3.0, 1.0, 3.0),
                    note: None,
                },
            ],
            notes: vec![
                NoteContent::new(
                    "welcome",
                    "Welcome to the archive.\nWalk with WASD, click a note to read it,\npress Escape to put it down.",
                ),
                NoteContent::new(
                    "torn-page",
                    "...the last entry is dated three days before the flood.",
                ),
            ],
        }
    }
}

//=== LevelSource =========================================================

/// Where a level comes from. Files are re-read on each scene entry.
#[derive(Debug, Clone, Default)]
pub struct LevelSource {
    level: Option<PathBuf>,
    notes: Option<PathBuf>,
}

impl LevelSource {
    /// The built-in demo level with its inline notes.
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, path: impl Into<PathBuf>) -> Self {
        self.level = Some(path.into());
        self
    }

    pub fn with_notes(mut self, dir: impl Into<PathBuf>) -> Self {
        self.notes = Some(dir.into());
        self
    }

    /// Reads the level and note library.
    pub fn load(&self) -> Result<(LevelDefinition, NoteLibrary)> {
        let definition = match &self.level {
            Some(path) => LevelDefinition::load(path)?,
            None => LevelDefinition::demo(),
        };

        let mut library = match &self.notes {
            Some(dir) => NoteLibrary::load_dir(dir)?,
            None => NoteLibrary::new(),
        };
        for note in &definition.notes {
            library.insert(note.clone());
        }

        Ok((definition, library))
    }
}

//=== LevelState ==========================================================

/// Everything rebuilt when the level is entered.
struct LevelState {
    world: CollisionWorld,
    entities: EntityStore,
    camera: Camera,
    controller: MovementController,
}

fn build_state(
    definition: &LevelDefinition,
    library: &NoteLibrary,
    player: &PlayerConfig,
    aspect: f32,
) -> Result<LevelState> {
    let mut world = CollisionWorld::new();
    let mut entities = EntityStore::new();

    for solid in &definition.solids {
        let id = entities.spawn(solid.name.as_str(), Vec::new());
        world.add_static(Aabb::new(solid.min, solid.max), Some(id));
    }

    for prop in &definition.props {
        let capabilities: Vec<Box<dyn Capability>> = match &prop.note {
            Some(name) => vec![Box::new(library.marker(name))],
            None => Vec::new(),
        };
        let id = entities.spawn(prop.name.as_str(), capabilities);
        world.add_static(Aabb::new(prop.min, prop.max), Some(id));
    }

    let spawn = &definition.player;
    let player_id = entities.spawn("player", Vec::new());
    let body = world.add_body(BodyDesc {
        position: spawn.position,
        rotation: Quat::from_rotation_y(spawn.yaw_degrees.to_radians()),
        half_extents: spawn.half_extents,
        entity: Some(player_id),
    });

    let mut controller = MovementController::new(body, &world)?
        .with_speed(player.move_speed)
        .with_look_sensitivity(player.look_sensitivity);
    if let Some(distance) = player.interact_distance {
        controller = controller.with_interact_distance(distance);
    }

    let mut camera = Camera {
        aspect,
        eye_height: spawn.eye_height,
        ..Camera::default()
    };
    camera.follow(&world.body_transform(body));

    Ok(LevelState {
        world,
        entities,
        camera,
        controller,
    })
}

//=== LevelScene ==========================================================

/// Playable level. Owns the note presenter for its lifetime.
pub struct LevelScene<P: NotePanel> {
    key: GameScene,
    source: LevelSource,
    player: PlayerConfig,
    aspect: f32,
    presenter: NotePresenter<P>,
    loaded: (LevelDefinition, NoteLibrary),
    state: Option<LevelState>,
}

impl<P: NotePanel> LevelScene<P> {
    /// Loads `source` once up front so broken files fail at startup.
    pub fn new(
        key: GameScene,
        source: LevelSource,
        player: PlayerConfig,
        aspect: f32,
        panel: P,
    ) -> Result<Self> {
        let loaded = source.load()?;
        info!(
            "Level ready: {} solids, {} props, {} notes",
            loaded.0.solids.len(),
            loaded.0.props.len(),
            loaded.1.len()
        );

        Ok(Self {
            key,
            source,
            player,
            aspect,
            presenter: NotePresenter::new(panel),
            loaded,
            state: None,
        })
    }

    pub fn presenter(&self) -> &NotePresenter<P> {
        &self.presenter
    }

    pub fn is_built(&self) -> bool {
        self.state.is_some()
    }

    /// Position of the player body, when the level is built.
    pub fn player_position(&self) -> Option<Vec3> {
        self.state
            .as_ref()
            .map(|s| s.world.body_transform(s.controller.body()).position)
    }

    fn rebuild(&mut self) {
        match self.source.load() {
            Ok(loaded) => self.loaded = loaded,
            Err(e) => warn!("Level reload failed, keeping previous version: {}", e),
        }

        let (definition, library) = &self.loaded;
        self.state = match build_state(definition, library, &self.player, self.aspect) {
            Ok(state) => Some(state),
            Err(e) => {
                error!("Could not build level: {}", e);
                None
            }
        };
    }
}

impl<P: NotePanel> Scene<GameScene, NoteAction> for LevelScene<P> {
    fn on_enter(&mut self, _context: &GlobalContext<GameScene, NoteAction>) {
        info!("Entering level {:?}", self.key);
        self.rebuild();
        self.presenter.close();
    }

    fn on_exit(&mut self, _context: &GlobalContext<GameScene, NoteAction>) {
        info!("Leaving level {:?}", self.key);
        self.state = None;
        self.presenter.close();
    }

    fn update(&mut self, context: &mut GlobalContext<GameScene, NoteAction>, _dt: f32) {
        if let Some(state) = self.state.as_mut() {
            state.controller.look(&context.input, &mut state.world);
            state
                .camera
                .follow(&state.world.body_transform(state.controller.body()));
            state.controller.update(
                &context.input,
                &state.world,
                &state.entities,
                &state.camera,
                &mut self.presenter,
            );
        }

        if context.input.triggered(NoteAction::ReloadLevel) {
            context.scene_transitions.push(SceneTransition::Reload(self.key));
        }
    }

    fn fixed_update(&mut self, _context: &mut GlobalContext<GameScene, NoteAction>, dt: f32) {
        if let Some(state) = self.state.as_mut() {
            state.controller.fixed_update(&mut state.world, dt);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
