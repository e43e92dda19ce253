//! Packed element representation
//!
//! Each grid cell is two `u32` words: the physics `head` and the render
//! `tail`. The codec modules are pure functions over those words.

pub mod head;
pub mod tail;

pub use head::{Behaviour, TypeClass};

/// A single cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Element {
    pub head: u32,
    pub tail: u32,
}

impl Element {
    pub const fn new(head: u32, tail: u32) -> Self {
        Self { head, tail }
    }

    #[inline]
    pub const fn type_class(&self) -> TypeClass {
        head::type_class(self.head)
    }

    #[inline]
    pub const fn behaviour(&self) -> Behaviour {
        head::behaviour(self.head)
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.type_class() == TypeClass::Air
    }
}

/// An element together with the grid position it was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedElement {
    pub x: i32,
    pub y: i32,
    pub element: Element,
}

impl PositionedElement {
    pub const fn new(x: i32, y: i32, element: Element) -> Self {
        Self { x, y, element }
    }
}
