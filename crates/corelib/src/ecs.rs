//! Tiny ECS: World, Entity, components: Transform + Renderable.

use crate::{Vec3, transform::Transform};

/// Entity id (dense, index into component arrays).
pub type Entity = u32;

/// Handle of a mesh uploaded to the renderer's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Component: draw the pooled mesh with this entity's transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub mesh: MeshId,
}

/// Very small ECS world with dense parallel arrays.
/// No allocations per-frame; spawn may allocate to grow capacity.
#[derive(Default)]
pub struct World {
    transforms: Vec<Transform>,
    renderables: Vec<Option<Renderable>>,
    alive: Vec<bool>,
    len: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn entity with Transform and optional Renderable.
    pub fn spawn(&mut self, t: Transform, r: Option<Renderable>) -> Entity {
        let id = self.len;
        let idx = id as usize;
        self.len += 1;

        if idx >= self.transforms.len() {
            // grow all arrays equally
            let new_len = (idx + 1).next_power_of_two().max(8);
            self.transforms.resize(new_len, Transform::identity());
            self.renderables.resize(new_len, None);
            self.alive.resize(new_len, false);
        }

        self.transforms[idx] = t;
        self.renderables[idx] = r;
        self.alive[idx] = true;
        id
    }

    /// Mark an entity dead; its slot is not reused.
    pub fn despawn(&mut self, e: Entity) {
        if self.is_alive(e) {
            let i = e as usize;
            self.alive[i] = false;
            self.renderables[i] = None;
        }
    }

    #[inline]
    pub fn is_alive(&self, e: Entity) -> bool {
        let i = e as usize;
        i < self.alive.len() && self.alive[i]
    }

    /// Mutable access to a transform (for animation).
    #[inline]
    pub fn transform_mut(&mut self, e: Entity) -> Option<&mut Transform> {
        let i = e as usize;
        if self.is_alive(e) {
            Some(&mut self.transforms[i])
        } else {
            None
        }
    }

    /// Iterate over (Transform, Renderable) pairs.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (&Transform, &Renderable)> {
        (0..self.len as usize).filter_map(move |i| {
            if self.alive.get(i).copied().unwrap_or(false) {
                if let Some(r) = self.renderables[i].as_ref() {
                    return Some((&self.transforms[i], r));
                }
            }
            None
        })
    }

    /// Rotate all transforms by given Euler speed * dt.
    pub fn system_rotate_all(&mut self, dt: f32, speed_xyz: [f32; 3]) {
        let delta = Vec3::from(speed_xyz) * dt;
        for i in 0..(self.len as usize) {
            if self.alive[i] {
                self.transforms[i].rotate_euler(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quat;

    #[test]
    fn spawn_grows_and_iterates_renderables_only() {
        let mut world = World::new();
        let a = world.spawn(Transform::identity(), Some(Renderable { mesh: MeshId(0) }));
        let _b = world.spawn(Transform::identity(), None);
        for i in 0..10 {
            world.spawn(Transform::identity(), Some(Renderable { mesh: MeshId(i) }));
        }
        assert!(world.is_alive(a));
        assert_eq!(world.iter_renderables().count(), 11);
    }

    #[test]
    fn despawn_hides_entity() {
        let mut world = World::new();
        let e = world.spawn(Transform::identity(), Some(Renderable { mesh: MeshId(3) }));
        world.despawn(e);
        assert!(!world.is_alive(e));
        assert!(world.transform_mut(e).is_none());
        assert_eq!(world.iter_renderables().count(), 0);
    }

    #[test]
    fn rotate_system_integrates_speed() {
        let mut world = World::new();
        let e = world.spawn(Transform::identity(), None);
        world.system_rotate_all(0.5, [0.0, 2.0, 0.0]);
        let t = world.transform_mut(e).unwrap();
        let expected = Quat::from_rotation_y(1.0);
        assert!(t.rotation.abs_diff_eq(expected, 1e-6));
    }
}
