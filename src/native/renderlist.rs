//! Bounded render list.
//!
//! Fixed-capacity table of attached sprites, walked in slot order on every
//! present. Freed slots are reused first-fit; each reuse bumps the slot's
//! generation so handles from an earlier occupant are rejected.
use log::warn;

use crate::components::sprite::SpriteLink;
use crate::native::{NativeError, NodeHandle, TextureHandle};
use crate::resources::spritesheet::Rect;

/// Default number of render nodes a backend can hold.
pub const RENDER_LIST_LEN: usize = 2048;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    sprite: Option<SpriteLink>,
}

/// One textured quad to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureHandle,
    pub source: Rect,
    /// Destination in pixels, rounded to the nearest integer.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug)]
pub struct RenderList {
    slots: Vec<Slot>,
    capacity: usize,
}

impl Default for RenderList {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderList {
    pub fn new() -> Self {
        Self::with_capacity(RENDER_LIST_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    /// Store a sprite link in the first free slot.
    pub fn insert(&mut self, sprite: SpriteLink) -> Result<NodeHandle, NativeError> {
        if let Some(index) = self.slots.iter().position(|slot| slot.sprite.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.sprite = Some(sprite);
            return Ok(NodeHandle {
                index: index as u32,
                generation: slot.generation,
            });
        }
        if self.slots.len() >= self.capacity {
            return Err(NativeError::RenderQueueFull);
        }
        self.slots.push(Slot {
            generation: 0,
            sprite: Some(sprite),
        });
        Ok(NodeHandle {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        })
    }

    /// Free the slot addressed by `node`.
    pub fn remove(&mut self, node: NodeHandle) -> Result<SpriteLink, NativeError> {
        match self.slots.get_mut(node.index as usize) {
            Some(slot) if slot.generation == node.generation => {
                slot.sprite.take().ok_or(NativeError::BadNode(node))
            }
            _ => Err(NativeError::BadNode(node)),
        }
    }

    pub fn contains(&self, node: NodeHandle) -> bool {
        self.slots
            .get(node.index as usize)
            .is_some_and(|slot| slot.generation == node.generation && slot.sprite.is_some())
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.sprite.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resolve every attached sprite into a draw command, in slot order.
    ///
    /// Nodes whose sprite is gone or whose frame index falls outside the
    /// sheet are skipped with a warning; the frame index is content, not
    /// something the binding layer validates.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(link) = &slot.sprite else {
                continue;
            };
            let Some(state) = link.upgrade() else {
                warn!("render node {} points at a dropped sprite", index);
                continue;
            };
            let state = state.borrow();
            let Some(source) = state.sheet.frame(state.frame) else {
                warn!(
                    "render node {}: frame {} out of range ({} frames)",
                    index,
                    state.frame,
                    state.sheet.len()
                );
                continue;
            };
            commands.push(DrawCommand {
                texture: state.sheet.texture().handle(),
                source,
                x: state.x.round(),
                y: state.y.round(),
            });
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Weak;

    use super::*;
    use crate::components::sprite::SpriteState;

    fn dangling() -> SpriteLink {
        Weak::<RefCell<SpriteState>>::new()
    }

    #[test]
    fn test_insert_fills_slots_in_order() {
        let mut list = RenderList::with_capacity(4);
        let a = list.insert(dangling()).unwrap();
        let b = list.insert(dangling()).unwrap();
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_insert_fails_when_full() {
        let mut list = RenderList::with_capacity(1);
        list.insert(dangling()).unwrap();
        assert_eq!(
            list.insert(dangling()).unwrap_err(),
            NativeError::RenderQueueFull
        );
    }

    #[test]
    fn test_remove_frees_slot_for_reuse() {
        let mut list = RenderList::with_capacity(1);
        let first = list.insert(dangling()).unwrap();
        list.remove(first).unwrap();
        assert!(list.is_empty());

        let second = list.insert(dangling()).unwrap();
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut list = RenderList::with_capacity(2);
        let first = list.insert(dangling()).unwrap();
        list.remove(first).unwrap();
        let _second = list.insert(dangling()).unwrap();

        assert_eq!(list.remove(first).unwrap_err(), NativeError::BadNode(first));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_double_remove_is_bad_node() {
        let mut list = RenderList::new();
        let node = list.insert(dangling()).unwrap();
        list.remove(node).unwrap();
        assert!(!list.contains(node));
        assert!(matches!(list.remove(node), Err(NativeError::BadNode(_))));
    }

    #[test]
    fn test_draw_commands_skip_dropped_sprites() {
        let mut list = RenderList::new();
        list.insert(dangling()).unwrap();
        assert!(list.draw_commands().is_empty());
    }
}
