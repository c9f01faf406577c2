//! Utilities for signatures of entities and *systems* in ECS.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::{component::ComponentType, Component, ComponentId};

/// Maximal count of distinct component types, which is the width of [`Signature`].
pub const MAX_COMPONENTS: usize = 32;

/// Fixed-width bit set with one bit per component *type*.
///
/// Describes which components an entity has,
/// or which components a system requires.
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u32);

impl Signature {
    /// Signature without any bits set.
    pub const EMPTY: Self = Self(0);

    /// Creates new empty signature.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Sets bit of the component.
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= Self::bit(id);
    }

    /// Clears bit of the component.
    pub fn reset(&mut self, id: ComponentId) {
        self.0 &= !Self::bit(id);
    }

    /// Returns `true` if bit of the component is set.
    pub const fn test(self, id: ComponentId) -> bool {
        self.0 & Self::bit(id) != 0
    }

    /// Returns `true` if every bit set in `other` is also set in `self`.
    pub const fn contains(self, other: Signature) -> bool {
        self.0 & other.0 == other.0
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Count of bits set.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over all components whose bits are set, in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ComponentId> {
        (0..MAX_COMPONENTS)
            .map(ComponentId::new)
            .filter(move |&id| self.test(id))
    }

    const fn bit(id: ComponentId) -> u32 {
        assert!(id.index() < MAX_COMPONENTS, "component id out of signature range");
        1 << id.index()
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut signature = Self::new();
        iter.into_iter().for_each(|id| signature.set(id));
        signature
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = MAX_COMPONENTS)
    }
}

/// Set of component types, known at compile time.
///
/// Implemented for the unit type and for tuples of components up to 12 elements.
///
pub trait ComponentSet {
    /// Types of all components of this set.
    fn component_types() -> Vec<ComponentType>;
}

macro_rules! impl_component_set {
    ($($name:ident),*) => {
        impl<$($name),*> ComponentSet for ($($name,)*)
        where
            $($name: Component,)*
        {
            fn component_types() -> Vec<ComponentType> {
                vec![$(ComponentType::of::<$name>()),*]
            }
        }
    };
}

impl_component_set!();
impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
impl_component_set!(A, B, C, D, E, F, G, H, I);
impl_component_set!(A, B, C, D, E, F, G, H, I, J);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K, L);
