//! Tag and group indices of entities.

use std::collections::{BTreeSet, HashMap};

use crate::Entity;

/// Bidirectional map between unique tag names and entities.
///
/// Each tag names at most one entity and each entity holds at most one tag.
///
#[derive(Debug, Default)]
pub(crate) struct TagIndex {
    entity_per_tag: HashMap<String, Entity>,
    tag_per_entity: HashMap<Entity, String>,
}

impl TagIndex {
    /// Binds tag to the entity.
    ///
    /// Previous tag of the entity and previous holder of the tag are released,
    /// so both directions of the map stay consistent.
    ///
    pub fn insert(&mut self, entity: Entity, tag: &str) {
        self.remove(entity);
        if let Some(previous) = self.entity_per_tag.insert(tag.to_owned(), entity) {
            log::warn!("tag `{}` moved from {} to {}", tag, previous, entity);
            self.tag_per_entity.remove(&previous);
        }
        self.tag_per_entity.insert(entity, tag.to_owned());
    }

    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.entity_per_tag.get(tag) == Some(&entity)
    }

    pub fn entity(&self, tag: &str) -> Option<Entity> {
        self.entity_per_tag.get(tag).copied()
    }

    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.tag_per_entity.get(&entity).map(String::as_str)
    }

    /// Releases tag of the entity, if any.
    pub fn remove(&mut self, entity: Entity) -> Option<String> {
        let tag = self.tag_per_entity.remove(&entity)?;
        self.entity_per_tag.remove(&tag);
        Some(tag)
    }
}

/// Map from group names to sets of entities.
///
/// An entity belongs to at most one group:
/// grouping it again moves it out of its previous group.
///
#[derive(Debug, Default)]
pub(crate) struct GroupIndex {
    entities_per_group: HashMap<String, BTreeSet<Entity>>,
    group_per_entity: HashMap<Entity, String>,
}

impl GroupIndex {
    pub fn insert(&mut self, entity: Entity, group: &str) {
        if self.group_of(entity) == Some(group) {
            return;
        }
        self.remove(entity);
        self.entities_per_group
            .entry(group.to_owned())
            .or_default()
            .insert(entity);
        self.group_per_entity.insert(entity, group.to_owned());
    }

    pub fn belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.entities_per_group
            .get(group)
            .map(|entities| entities.contains(&entity))
            .unwrap_or(false)
    }

    /// Members of the group in ascending order; empty for unknown groups.
    pub fn entities(&self, group: &str) -> Vec<Entity> {
        self.entities_per_group
            .get(group)
            .map(|entities| entities.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.group_per_entity.get(&entity).map(String::as_str)
    }

    /// Moves the entity out of its group, if any.
    ///
    /// The group itself stays known even when it becomes empty.
    ///
    pub fn remove(&mut self, entity: Entity) -> Option<String> {
        let group = self.group_per_entity.remove(&entity)?;
        if let Some(entities) = self.entities_per_group.get_mut(&group) {
            entities.remove(&entity);
        }
        Some(group)
    }
}
