//! Scene container owning every live point cloud.

use crate::core::Id;
use crate::objects::Points;

/// Lifetime counters for scene membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneInfo {
    /// Objects ever added.
    pub added: u64,
    /// Objects disposed through [`Scene::dispose`].
    pub disposed: u64,
}

impl SceneInfo {
    /// Objects added but not yet disposed.
    #[inline]
    pub fn outstanding(&self) -> u64 {
        self.added - self.disposed
    }
}

/// The scene: a flat, ordered set of point clouds.
pub struct Scene {
    /// Scene ID.
    id: Id,
    /// Scene name.
    name: String,
    /// Top-level objects in insertion order.
    children: Vec<Points>,
    info: SceneInfo,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            id: Id::new(),
            name: "Scene".to_owned(),
            children: Vec::new(),
            info: SceneInfo::default(),
        }
    }

    /// Get the scene ID.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the scene name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the scene name.
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Add an object to the scene. Returns its ID.
    pub fn add(&mut self, points: Points) -> Id {
        let id = points.id();
        self.children.push(points);
        self.info.added += 1;
        id
    }

    /// Detach an object by ID, handing ownership back.
    pub fn remove(&mut self, id: Id) -> Option<Points> {
        let index = self.children.iter().position(|p| p.id() == id)?;
        Some(self.children.remove(index))
    }

    /// Detach and dispose an object. Returns false if it was not in the scene.
    pub fn dispose(&mut self, id: Id) -> bool {
        match self.remove(id) {
            Some(points) => {
                points.dispose();
                self.info.disposed += 1;
                true
            }
            None => false,
        }
    }

    /// Get an object by ID.
    pub fn get(&self, id: Id) -> Option<&Points> {
        self.children.iter().find(|p| p.id() == id)
    }

    /// Get a mutable object by ID.
    pub fn get_mut(&mut self, id: Id) -> Option<&mut Points> {
        self.children.iter_mut().find(|p| p.id() == id)
    }

    /// Check whether an object is in the scene.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Iterate objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Points> {
        self.children.iter()
    }

    /// Iterate objects mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Points> {
        self.children.iter_mut()
    }

    /// Get the number of top-level objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check whether the scene is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Membership counters.
    #[inline]
    pub fn info(&self) -> SceneInfo {
        self.info
    }

    /// Dispose every object.
    pub fn clear(&mut self) {
        for points in self.children.drain(..) {
            points.dispose();
            self.info.disposed += 1;
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("children", &self.len())
            .field("info", &self.info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BufferGeometry;
    use crate::material::FireworkMaterial;
    use crate::math::Color;
    use crate::texture::SpriteId;

    fn points() -> Points {
        Points::new(
            BufferGeometry::new(),
            FireworkMaterial::new(0.1, SpriteId(0), Color::WHITE, [1.0, 1.0]),
        )
    }

    #[test]
    fn test_add_get_remove() {
        let mut scene = Scene::new();
        let a = scene.add(points());
        let b = scene.add(points());
        assert_eq!(scene.len(), 2);
        assert!(scene.contains(a));

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.id(), a);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert!(scene.remove(a).is_none());
    }

    #[test]
    fn test_dispose_counts_once() {
        let mut scene = Scene::new();
        let a = scene.add(points());
        assert!(scene.dispose(a));
        assert!(!scene.dispose(a));
        assert!(scene.is_empty());
        assert_eq!(scene.info(), SceneInfo { added: 1, disposed: 1 });
        assert_eq!(scene.info().outstanding(), 0);
    }

    #[test]
    fn test_iteration_order_and_mutation() {
        let mut scene = Scene::new();
        let ids: Vec<Id> = (0..3).map(|_| scene.add(points())).collect();
        assert_eq!(scene.iter().map(Points::id).collect::<Vec<_>>(), ids);

        for p in scene.iter_mut() {
            p.material_mut().set_progress(0.5);
        }
        assert!(scene.iter().all(|p| p.material().progress() == 0.5));

        scene.get_mut(ids[1]).unwrap().visible = false;
        assert!(!scene.get(ids[1]).unwrap().visible);
    }

    #[test]
    fn test_clear_disposes_all() {
        let mut scene = Scene::new();
        scene.add(points());
        scene.add(points());
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.info().disposed, 2);
    }
}
