//! Reference Transform Hierarchy
//!
//! Parent links are weak and child links are strong, so dropping a root
//! releases the whole tree and a detached subtree is only kept alive by
//! whoever still references it (typically a collision entry).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::vec2::Vec2;
use super::SceneNode;

/// Local transform relative to the parent: scale, then rotate, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Position in the parent's space.
    pub position: Vec2,
    /// Counter-clockwise rotation in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Map a local point into the parent's space.
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.position + local.scale(self.scale).rotate(self.rotation)
    }

    /// Map a parent-space point into local space.
    #[inline]
    pub fn apply_inverse(&self, parent: Vec2) -> Vec2 {
        (parent - self.position).rotate(-self.rotation).scale(1.0 / self.scale)
    }
}

/// A named node in a 2D transform tree.
#[derive(Debug)]
pub struct TransformNode {
    name: String,
    transform: Cell<Transform>,
    parent: RefCell<Weak<TransformNode>>,
    children: RefCell<Vec<Rc<TransformNode>>>,
}

impl TransformNode {
    /// Create a new, unparented node with an identity transform.
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            transform: Cell::new(Transform::default()),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Create a node at `position` with an identity rotation and scale.
    pub fn at(name: impl Into<String>, position: Vec2) -> Rc<Self> {
        let node = Self::new(name);
        node.set_position(position);
        node
    }

    /// Node name (diagnostics only).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current local transform.
    pub fn transform(&self) -> Transform {
        self.transform.get()
    }

    /// Replace the local transform.
    pub fn set_transform(&self, transform: Transform) {
        self.transform.set(transform);
    }

    /// Local position.
    pub fn position(&self) -> Vec2 {
        self.transform.get().position
    }

    /// Set local position.
    pub fn set_position(&self, position: Vec2) {
        let mut t = self.transform.get();
        t.position = position;
        self.transform.set(t);
    }

    /// Move by `delta` in the parent's space.
    pub fn translate(&self, delta: Vec2) {
        self.set_position(self.position() + delta);
    }

    /// Set local rotation (radians, counter-clockwise).
    pub fn set_rotation(&self, rotation: f32) {
        let mut t = self.transform.get();
        t.rotation = rotation;
        self.transform.set(t);
    }

    /// Set local uniform scale.
    pub fn set_scale(&self, scale: f32) {
        let mut t = self.transform.get();
        t.scale = scale;
        self.transform.set(t);
    }

    /// Parent node, if attached and still alive.
    pub fn parent(&self) -> Option<Rc<TransformNode>> {
        self.parent.borrow().upgrade()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Attach `child` under this node, detaching it from any previous parent.
    pub fn add_child(self: &Rc<Self>, child: &Rc<TransformNode>) {
        child.remove_from_parent();
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(Rc::clone(child));
    }

    /// Detach from the parent. No-op for an unparented node.
    pub fn remove_from_parent(&self) {
        let parent = self.parent.replace(Weak::new()).upgrade();
        if let Some(parent) = parent {
            parent
                .children
                .borrow_mut()
                .retain(|c| !std::ptr::eq(Rc::as_ptr(c), self));
        }
    }
}

impl SceneNode for TransformNode {
    fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    fn to_world(&self, local: Vec2) -> Vec2 {
        let mut point = self.transform.get().apply(local);
        let mut ancestor = self.parent();
        while let Some(node) = ancestor {
            point = node.transform.get().apply(point);
            ancestor = node.parent();
        }
        point
    }

    fn to_local(&self, world: Vec2) -> Vec2 {
        let parent_space = match self.parent() {
            Some(parent) => parent.to_local(world),
            None => world,
        };
        self.transform.get().apply_inverse(parent_space)
    }

    fn combined_scale(&self) -> f32 {
        let mut scale = self.transform.get().scale;
        let mut ancestor = self.parent();
        while let Some(node) = ancestor {
            scale *= node.transform.get().scale;
            ancestor = node.parent();
        }
        scale
    }

    fn detach(&self) {
        self.remove_from_parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(
            (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4,
            "expected {b}, got {a}"
        );
    }

    #[test]
    fn test_identity_chain_is_identity() {
        let root = TransformNode::new("root");
        let child = TransformNode::new("child");
        root.add_child(&child);

        let p = Vec2::new(3.5, -7.25);
        assert_eq!(child.to_world(p), p);
        assert_eq!(child.to_local(p), p);
        assert_eq!(child.combined_scale(), 1.0);
    }

    #[test]
    fn test_nested_transform() {
        let root = TransformNode::new("root");
        let ship = TransformNode::at("ship", Vec2::new(100.0, 50.0));
        ship.set_scale(2.0);
        ship.set_rotation(FRAC_PI_2);
        let turret = TransformNode::at("turret", Vec2::new(10.0, 0.0));
        turret.set_scale(0.5);
        root.add_child(&ship);
        ship.add_child(&turret);

        // turret origin: ship applies scale 2 then +90 degrees: (10,0) -> (20,0) -> (0,20)
        assert_close(turret.to_world(Vec2::ZERO), Vec2::new(100.0, 70.0));
        // local (4,0): turret scale 0.5 -> (2,0) + (10,0) = (12,0); ship -> (0,24)
        assert_close(turret.to_world(Vec2::new(4.0, 0.0)), Vec2::new(100.0, 74.0));
        assert_eq!(turret.combined_scale(), 1.0);

        let world = Vec2::new(93.0, 81.0);
        assert_close(turret.to_world(turret.to_local(world)), world);
    }

    #[test]
    fn test_detach_and_reparent() {
        let root = TransformNode::new("root");
        let a = TransformNode::new("a");
        let b = TransformNode::new("b");
        root.add_child(&a);
        assert!(a.is_attached());
        assert!(!root.is_attached());
        assert_eq!(root.child_count(), 1);

        a.detach();
        assert!(!a.is_attached());
        assert_eq!(root.child_count(), 0);
        // Detaching twice is harmless
        a.detach();

        root.add_child(&b);
        b.add_child(&a);
        assert!(a.is_attached());
        assert_eq!(b.child_count(), 1);

        // Reparenting removes from the old parent
        root.add_child(&a);
        assert_eq!(b.child_count(), 0);
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_dropped_parent_detaches() {
        let child = TransformNode::new("child");
        {
            let parent = TransformNode::new("parent");
            parent.add_child(&child);
            assert!(child.is_attached());
        }
        assert!(!child.is_attached());
        assert_eq!(child.name(), "child");
    }
}
