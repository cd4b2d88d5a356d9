//! Free-lists that recycle entities and sparks
//!
//! In steady state the only allocation is the first construction of an entity
//! for a given key. Ownership moves: an entity is either in an active list or
//! in its pool, never both.

use super::entity::{Category, Entity, Role, Style, TargetColor};
use super::mesh::MeshSet;
use super::particles::Spark;

const SLOT_COUNT: usize = Category::ALL.len() * TargetColor::ALL.len() * Style::ALL.len();

/// Compound pool key over closed enumerations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub category: Category,
    pub color: TargetColor,
    pub style: Style,
}

impl PoolKey {
    pub fn new(category: Category, color: TargetColor, style: Style) -> Self {
        Self {
            category,
            color,
            style,
        }
    }

    pub fn of(entity: &Entity) -> Self {
        Self::new(entity.category(), entity.color, entity.style)
    }

    #[inline]
    fn slot(&self) -> usize {
        (self.category.index() * TargetColor::ALL.len() + self.color.index()) * Style::ALL.len()
            + self.style.index()
    }
}

/// Entity free-lists, one per (category, color, style)
#[derive(Debug)]
pub struct EntityPool {
    meshes: MeshSet,
    free: [Vec<Entity>; SLOT_COUNT],
    constructed: [usize; SLOT_COUNT],
}

impl EntityPool {
    pub fn new(meshes: MeshSet) -> Self {
        Self {
            meshes,
            free: std::array::from_fn(|_| Vec::new()),
            constructed: [0; SLOT_COUNT],
        }
    }

    pub fn meshes(&self) -> &MeshSet {
        &self.meshes
    }

    /// Reuse a pooled entity for `key`, constructing one only when the free-list is empty.
    pub fn acquire(&mut self, key: PoolKey) -> Entity {
        let slot = key.slot();
        if let Some(entity) = self.free[slot].pop() {
            return entity;
        }
        self.constructed[slot] += 1;
        log::trace!(
            "constructing {:?} entity ({:?}, {:?}), #{}",
            key.category,
            key.color,
            key.style,
            self.constructed[slot]
        );
        let (mesh, role) = match key.category {
            Category::Target => (
                self.meshes.target.clone(),
                Role::Target {
                    health: 0,
                    max_health: 0,
                },
            ),
            Category::Fragment => (self.meshes.fragment.clone(), Role::Fragment),
        };
        Entity::new(mesh, key.color, key.style, role)
    }

    /// Reset the entity to its freshly built state and take ownership of it
    pub fn release(&mut self, mut entity: Entity) {
        entity.reset();
        let slot = PoolKey::of(&entity).slot();
        self.free[slot].push(entity);
    }

    /// Entities waiting for reuse under `key`
    pub fn pooled(&self, key: PoolKey) -> usize {
        self.free[key.slot()].len()
    }

    /// Entities ever built for `key`
    pub fn constructed(&self, key: PoolKey) -> usize {
        self.constructed[key.slot()]
    }

    pub fn total_pooled(&self) -> usize {
        self.free.iter().map(Vec::len).sum()
    }
}

/// Spark free-list
#[derive(Debug, Default)]
pub struct SparkPool {
    free: Vec<Spark>,
    constructed: usize,
}

impl SparkPool {
    pub fn acquire(&mut self) -> Spark {
        self.free.pop().unwrap_or_else(|| {
            self.constructed += 1;
            Spark::default()
        })
    }

    pub fn release(&mut self, spark: Spark) {
        self.free.push(spark);
    }

    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    pub fn constructed(&self) -> usize {
        self.constructed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn pool() -> EntityPool {
        EntityPool::new(MeshSet::cubes(40.0, 10.0))
    }

    #[test]
    fn test_slots_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for category in Category::ALL {
            for color in TargetColor::ALL {
                for style in Style::ALL {
                    let slot = PoolKey::new(category, color, style).slot();
                    assert!(slot < SLOT_COUNT);
                    assert!(seen.insert(slot));
                }
            }
        }
        assert_eq!(seen.len(), SLOT_COUNT);
    }

    #[test]
    fn test_acquire_builds_correct_entity() {
        let mut pool = pool();
        let key = PoolKey::new(Category::Fragment, TargetColor::Pink, Style::Wireframe);
        let e = pool.acquire(key);
        assert_eq!(PoolKey::of(&e), key);
        assert_eq!(e.vertices().len(), 8);
        assert!(e.poly_style.wireframe);
        assert_eq!(pool.constructed(key), 1);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let mut pool = pool();
        let key = PoolKey::new(Category::Target, TargetColor::Blue, Style::Solid);
        let mut e = pool.acquire(key);
        e.kin.position = Vec3::new(5.0, 6.0, 7.0);
        e.kin.velocity = Vec3::ONE;
        e.hit = true;
        pool.release(e);
        assert_eq!(pool.pooled(key), 1);

        let e = pool.acquire(key);
        assert_eq!(pool.constructed(key), 1);
        assert_eq!(pool.pooled(key), 0);
        assert_eq!(e.kin.position, Vec3::ZERO);
        assert_eq!(e.kin.velocity, Vec3::ZERO);
        assert_eq!(e.kin.scale, Vec3::ONE);
        assert!(!e.hit);
    }

    #[test]
    fn test_recycled_target_matches_fresh() {
        let mut pool = pool();
        let key = PoolKey::new(Category::Target, TargetColor::Pink, Style::Solid);
        let mut damaged = pool.acquire(key);
        damaged.set_health(3, 3);
        damaged.damage();
        damaged.kin.position = Vec3::new(20.0, -30.0, 5.0);
        damaged.transform();
        let fresh = pool.acquire(key);
        pool.release(damaged);

        let recycled = pool.acquire(key);
        assert_eq!(pool.constructed(key), 2);
        assert_eq!(recycled.role, fresh.role);
        assert_eq!(recycled.poly_style, fresh.poly_style);
        assert_eq!(recycled.kin, fresh.kin);
        assert_eq!(recycled.vertices(), fresh.vertices());
        assert_eq!(recycled.shadow_vertices(), fresh.shadow_vertices());
        assert_eq!(recycled.projected, fresh.projected);
        assert_eq!(recycled.hit, fresh.hit);
    }

    #[test]
    fn test_keys_do_not_share_entities() {
        let mut pool = pool();
        let solid = PoolKey::new(Category::Target, TargetColor::Blue, Style::Solid);
        let wire = PoolKey::new(Category::Target, TargetColor::Blue, Style::Wireframe);
        let e = pool.acquire(solid);
        pool.release(e);
        let w = pool.acquire(wire);
        assert_eq!(w.style, Style::Wireframe);
        assert_eq!(pool.pooled(solid), 1);
        assert_eq!(pool.constructed(wire), 1);
    }

    #[test]
    fn test_spark_pool_recycles() {
        let mut sparks = SparkPool::default();
        let s = sparks.acquire();
        sparks.release(s);
        let _ = sparks.acquire();
        assert_eq!(sparks.constructed(), 1);
        assert_eq!(sparks.pooled(), 0);
    }

    fn key_strategy() -> impl Strategy<Value = PoolKey> {
        (0..2usize, 0..4usize, 0..2usize).prop_map(|(c, k, s)| {
            PoolKey::new(Category::ALL[c], TargetColor::ALL[k], Style::ALL[s])
        })
    }

    proptest! {
        #[test]
        fn prop_pool_conservation(
            ops in prop::collection::vec((key_strategy(), any::<bool>()), 1..300)
        ) {
            let mut pool = pool();
            let mut active: Vec<Entity> = Vec::new();
            for (key, acquire) in ops {
                let before = pool.constructed(key);
                let was_empty = pool.pooled(key) == 0;
                if acquire {
                    active.push(pool.acquire(key));
                    // Construction happens only when nothing could be reused
                    let grew = pool.constructed(key) - before;
                    prop_assert_eq!(grew, usize::from(was_empty));
                } else if let Some(pos) = active.iter().position(|e| PoolKey::of(e) == key) {
                    pool.release(active.swap_remove(pos));
                    prop_assert_eq!(pool.constructed(key), before);
                }
                let live = active.iter().filter(|e| PoolKey::of(e) == key).count();
                prop_assert_eq!(live + pool.pooled(key), pool.constructed(key));
            }
        }
    }
}
