//=========================================================================
// Entities & Capabilities
//=========================================================================
//
// Scene entities and the capabilities attached to them.
//
// Responsibilities:
// - Allocate stable entity ids for the lifetime of a scene
// - Hold each entity's name and capability set
// - Answer capability queries through trait methods (no downcasting)
//
// Query Flow:
// ```text
//   RayHit.entity ──► EntityStore::readable(id)
//                         └─► capabilities.iter().find_map(as_readable)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::{self, Debug};

//=== EntityId ============================================================

/// Identifier of an entity within an [`EntityStore`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity#{}", self.0)
    }
}

//=== Capabilities ========================================================

/// Something that can be read by the player.
pub trait Readable {
    /// Text to show when read.
    fn read(&self) -> String;
}

/// A behaviour attached to an entity.
///
/// Each capability advertises the interfaces it provides by overriding
/// the matching query method. Unimplemented queries answer `None`.
pub trait Capability: Send + Sync + Debug {
    fn as_readable(&self) -> Option<&dyn Readable> {
        None
    }
}

//=== Entity ==============================================================

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    capabilities: Vec<Box<dyn Capability>>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> &[Box<dyn Capability>] {
        &self.capabilities
    }

    /// First capability that is readable.
    pub fn readable(&self) -> Option<&dyn Readable> {
        self.capabilities.iter().find_map(|c| c.as_readable())
    }
}

//=== EntityStore =========================================================

/// Owns every entity of a scene. Ids are never reused.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity and returns its id.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        capabilities: Vec<Box<dyn Capability>>,
    ) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity {
            id,
            name: name.into(),
            capabilities,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.get(id).map(Entity::name)
    }

    /// Readable capability of an entity, if it has one.
    pub fn readable(&self, id: EntityId) -> Option<&dyn Readable> {
        self.get(id).and_then(Entity::readable)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Sign(&'static str);

    impl Readable for Sign {
        fn read(&self) -> String {
            self.0.to_string()
        }
    }

    impl Capability for Sign {
        fn as_readable(&self) -> Option<&dyn Readable> {
            Some(self)
        }
    }

    #[derive(Debug)]
    struct Solid;

    impl Capability for Solid {}

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut store = EntityStore::new();
        let a = store.spawn("a", Vec::new());
        let b = store.spawn("b", Vec::new());

        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.name(b), Some("b"));
    }

    #[test]
    fn readable_query_finds_capability() {
        let mut store = EntityStore::new();
        let sign = store.spawn("sign", vec![Box::new(Solid), Box::new(Sign("hello"))]);

        let readable = store.readable(sign).expect("sign is readable");
        assert_eq!(readable.read(), "hello");
    }

    #[test]
    fn non_readable_entity_answers_none() {
        let mut store = EntityStore::new();
        let crate_box = store.spawn("crate", vec![Box::new(Solid)]);

        assert!(store.readable(crate_box).is_none());
        assert_eq!(store.get(crate_box).map(|e| e.capabilities().len()), Some(1));
    }

    #[test]
    fn unknown_id_answers_none() {
        let store = EntityStore::new();
        assert!(store.is_empty());
        assert!(store.get(EntityId::from_raw(4)).is_none());
        assert!(store.readable(EntityId::from_raw(4)).is_none());
    }

    #[test]
    fn entity_id_debug_is_compact() {
        assert_eq!(format!("{:?}", EntityId::from_raw(3)), "Entity#3");
    }
}
