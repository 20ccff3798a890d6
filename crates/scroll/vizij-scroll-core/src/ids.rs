//! Identifiers and simple allocators for tracked entities.

use serde::{Deserialize, Serialize};

/// Stable handle for an element registered with the visibility controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Handle for a reveal group (one descriptor shared by N children).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Handle for a parallax binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BindingId(pub u32);

/// Handle for a typewriter reveal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TypewriterId(pub u32);

/// Handle for a scroll state subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Monotonic allocator for the handle types above.
/// Handles are never reused within one allocator lifetime.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_element: u32,
    next_group: u32,
    next_binding: u32,
    next_typewriter: u32,
    next_subscription: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_element(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element = self.next_element.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group = self.next_group.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_binding(&mut self) -> BindingId {
        let id = BindingId(self.next_binding);
        self.next_binding = self.next_binding.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_typewriter(&mut self) -> TypewriterId {
        let id = TypewriterId(self.next_typewriter);
        self.next_typewriter = self.next_typewriter.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_element(), ElementId(0));
        assert_eq!(alloc.alloc_element(), ElementId(1));
        assert_eq!(alloc.alloc_group(), GroupId(0));
        assert_eq!(alloc.alloc_binding(), BindingId(0));
        assert_eq!(alloc.alloc_typewriter(), TypewriterId(0));
        assert_eq!(alloc.alloc_subscription(), SubscriptionId(0));
        assert_eq!(alloc.alloc_subscription(), SubscriptionId(1));
    }
}
