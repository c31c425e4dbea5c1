//! Sprites and their render-graph binding.
//!
//! A [`Sprite`] is a position and a frame index over a shared
//! [`SpriteSheet`]. Making it visible attaches a node to the native render
//! graph; the node handle is stored on the sprite and is present exactly
//! while the sprite is visible.
//!
//! The renderer only ever sees a [`SpriteLink`], a weak reference to the
//! sprite's state, so it reads the current position and frame each time it
//! draws. Dropping a sprite detaches its node first and only then releases
//! the state (and with it the sheet reference).
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::native::{NativeError, NodeHandle, RendererRef};
use crate::resources::spritesheet::SpriteSheet;

/// Drawable state shared with the render graph.
#[derive(Debug)]
pub struct SpriteState {
    pub x: f32,
    pub y: f32,
    pub frame: usize,
    pub sheet: Rc<SpriteSheet>,
}

/// Non-owning view of a sprite handed to the native renderer.
pub type SpriteLink = Weak<RefCell<SpriteState>>;

/// Native render-graph call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("failed to attach sprite render node: {0}")]
    Attach(#[source] NativeError),
    #[error("failed to detach sprite render node: {0}")]
    Detach(#[source] NativeError),
}

pub struct Sprite {
    state: Rc<RefCell<SpriteState>>,
    node: Option<NodeHandle>,
    renderer: RendererRef,
}

impl Sprite {
    /// New sprite at (0, 0) showing frame 0, not visible.
    pub fn create(renderer: &RendererRef, sheet: Rc<SpriteSheet>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SpriteState {
                x: 0.0,
                y: 0.0,
                frame: 0,
                sheet,
            })),
            node: None,
            renderer: renderer.clone(),
        }
    }

    pub fn x(&self) -> f32 {
        self.state.borrow().x
    }

    pub fn y(&self) -> f32 {
        self.state.borrow().y
    }

    pub fn position(&self) -> (f32, f32) {
        let state = self.state.borrow();
        (state.x, state.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        let mut state = self.state.borrow_mut();
        state.x = x;
        state.y = y;
    }

    pub fn frame(&self) -> usize {
        self.state.borrow().frame
    }

    /// Select the frame to draw. Not checked against the sheet: an index past
    /// the end is stored as-is and skipped by the renderer.
    pub fn set_frame(&mut self, frame: usize) {
        self.state.borrow_mut().frame = frame;
    }

    pub fn sheet(&self) -> Rc<SpriteSheet> {
        self.state.borrow().sheet.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.node.is_some()
    }

    pub fn render_node(&self) -> Option<NodeHandle> {
        self.node
    }

    /// Attach to or detach from the render graph. Repeating the current
    /// visibility is a no-op.
    ///
    /// On failure the sprite keeps its previous visibility: a failed attach
    /// stores no handle, a failed detach keeps the handle it had.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        match (visible, self.node) {
            (true, None) => {
                let node = self
                    .renderer
                    .attach_sprite(Rc::downgrade(&self.state))
                    .map_err(RenderError::Attach)?;
                debug!("Attached sprite node {:?}", node);
                self.node = Some(node);
            }
            (false, Some(node)) => {
                self.renderer.detach(node).map_err(RenderError::Detach)?;
                debug!("Detached sprite node {:?}", node);
                self.node = None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Detach from the render graph and release the sheet.
    ///
    /// Equivalent to dropping the sprite; a detach failure is logged, never
    /// returned.
    pub fn destroy(self) {
        drop(self);
    }
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Sprite")
            .field("x", &state.x)
            .field("y", &state.y)
            .field("frame", &state.frame)
            .field("node", &self.node)
            .finish()
    }
}

impl Drop for Sprite {
    fn drop(&mut self) {
        if let Some(node) = self.node.take() {
            match self.renderer.detach(node) {
                Ok(()) => debug!("Detached sprite node {:?} on drop", node),
                Err(e) => warn!("Ignoring detach failure while destroying sprite: {}", e),
            }
        }
        // `state` is dropped after this body, releasing the sheet only once
        // the node is gone.
    }
}
