//! Local transform state and parent/child composition.
//!
//! A [`Transform`] holds one object's *local* position, rotation and scale.
//! The parent relation itself is owned by the scene graph (an object's parent
//! is its owning node), so world values are computed by folding
//! [`Transform::compose`] over the chain from the root down to the object.
//! Nothing here caches world state: every read reflects the live chain.
//!
//! Composition of a parent world transform `P` with a child local `L`:
//!
//! ```text
//! world.position = P.position + rotate(P.scale * L.position, P.rotation)
//! world.rotation = P.rotation + L.rotation
//! world.scale    = P.scale * L.scale
//! ```

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Position, rotation (radians) and scale relative to a parent frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The world root frame.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    #[inline]
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Maps a point from this frame into the parent frame.
    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + local.scale(self.scale).rotated(self.rotation)
    }

    /// Maps a point from the parent frame into this frame.
    #[inline]
    pub fn inverse_transform_point(&self, outer: Vec2) -> Vec2 {
        (outer - self.position)
            .rotated(-self.rotation)
            .inv_scale(self.scale)
    }

    /// Treats `self` as a parent world transform and returns the world
    /// transform of a child whose local transform is `child`.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: self.rotation + child.rotation,
            scale: self.scale.scale(child.scale),
        }
    }

    /// Treats `self` as a world transform and returns the local transform
    /// that reproduces it under `parent_world`.
    ///
    /// `parent_world.compose(&self.relative_to(parent_world)) == *self`
    /// up to float error, as long as the parent scale has no zero axis.
    pub fn relative_to(&self, parent_world: &Transform) -> Transform {
        Transform {
            position: parent_world.inverse_transform_point(self.position),
            rotation: self.rotation - parent_world.rotation,
            scale: self.scale.inv_scale(parent_world.scale),
        }
    }

    /// Folds a root-first chain of local transforms into a world transform.
    pub fn chain<'a, I>(locals_root_first: I) -> Transform
    where
        I: IntoIterator<Item = &'a Transform>,
    {
        locals_root_first
            .into_iter()
            .fold(Transform::IDENTITY, |world, local| world.compose(local))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    #[test]
    fn translation_only_composition() {
        let parent = Transform::from_position(Vec2::new(10.0, 10.0));
        let child = Transform::from_position(Vec2::new(5.0, 5.0));
        assert_eq!(parent.compose(&child).position, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn rotated_parent_rotates_child_offset() {
        let parent = Transform::IDENTITY.with_rotation(FRAC_PI_2);
        let child = Transform::from_position(Vec2::new(1.0, 0.0));
        let world = parent.compose(&child);
        assert!(world.position.approx_eq(Vec2::new(0.0, 1.0), EPS));
        assert!((world.rotation - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn scaled_parent_scales_child_offset() {
        let parent = Transform::from_position(Vec2::new(1.0, 1.0)).with_scale(Vec2::splat(2.0));
        let child = Transform::from_position(Vec2::new(3.0, 0.0)).with_scale(Vec2::splat(0.5));
        let world = parent.compose(&child);
        assert!(world.position.approx_eq(Vec2::new(7.0, 1.0), EPS));
        assert!(world.scale.approx_eq(Vec2::ONE, EPS));
    }

    #[test]
    fn relative_to_inverts_compose() {
        let parent = Transform::from_position(Vec2::new(-3.0, 8.0))
            .with_rotation(0.7)
            .with_scale(Vec2::new(2.0, 0.5));
        let world = Transform::from_position(Vec2::new(4.0, 4.0)).with_rotation(1.2);
        let local = world.relative_to(&parent);
        let back = parent.compose(&local);
        assert!(back.position.approx_eq(world.position, EPS));
        assert!((back.rotation - world.rotation).abs() < EPS);
    }

    #[test]
    fn empty_chain_is_identity() {
        let none: [Transform; 0] = [];
        assert_eq!(Transform::chain(none.iter()), Transform::IDENTITY);
    }

    #[test]
    fn chain_matches_nested_compose() {
        let a = Transform::from_position(Vec2::new(10.0, 0.0));
        let b = Transform::from_position(Vec2::new(0.0, 2.0)).with_rotation(FRAC_PI_2);
        let c = Transform::from_position(Vec2::new(1.0, 0.0));
        let world = Transform::chain([a, b, c].iter());
        assert!(world.position.approx_eq(Vec2::new(10.0, 3.0), EPS));
    }
}
