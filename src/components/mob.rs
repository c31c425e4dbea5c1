//! Tile-stepping movement controller.
//!
//! A [`Mob`] moves a sprite toward a destination one unit per axis per step.
//! Steps are paced by a time accumulator: every `1 / speed` seconds of
//! accumulated time buys one step, and a long frame pays out several steps at
//! once. Displacement therefore depends only on the total time fed to
//! [`Mob::update`], never on how it was split across calls.
//!
//! The mob does not own its sprite; every call borrows it.
use log::trace;

use crate::components::sprite::Sprite;
use crate::events::input::{Edge, KeyCode, KeyEdge};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MobError {
    #[error("mob speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mob {
    destination: (f32, f32),
    time_accumulator: f32,
    /// Steps per second.
    speed: f32,
}

/// Signed step toward `delta`, at most one unit.
///
/// A remainder below one unit is covered exactly so the mob lands on the
/// destination instead of oscillating around it.
fn unit_step(delta: f32) -> f32 {
    if delta == 0.0 {
        0.0
    } else {
        delta.signum() * delta.abs().min(1.0)
    }
}

impl Mob {
    /// Idle mob parked on the sprite's current position.
    pub fn new(sprite: &Sprite, speed: f32) -> Result<Self, MobError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MobError::InvalidSpeed(speed));
        }
        Ok(Self {
            destination: sprite.position(),
            time_accumulator: 0.0,
            speed,
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Seconds of accumulated time per step.
    pub fn step_period(&self) -> f32 {
        1.0 / self.speed
    }

    pub fn destination(&self) -> (f32, f32) {
        self.destination
    }

    pub fn time_accumulator(&self) -> f32 {
        self.time_accumulator
    }

    pub fn is_moving(&self, sprite: &Sprite) -> bool {
        sprite.position() != self.destination
    }

    /// Retarget. Progress already accumulated toward the next step is kept
    /// unless the new destination is where `sprite` already stands.
    pub fn set_destination(&mut self, sprite: &Sprite, x: f32, y: f32) {
        self.destination = (x, y);
        if !self.is_moving(sprite) {
            self.time_accumulator = 0.0;
        }
    }

    /// Advance the sprite by the steps `dt` seconds pay for. Returns the
    /// number of steps taken.
    pub fn update(&mut self, sprite: &mut Sprite, dt: f32) -> u32 {
        if !self.is_moving(sprite) {
            self.time_accumulator = 0.0;
            return 0;
        }

        self.time_accumulator += dt.max(0.0);
        let period = self.step_period();
        let mut steps = 0;
        while self.time_accumulator >= period {
            let (x, y) = sprite.position();
            let (dest_x, dest_y) = self.destination;
            sprite.set_position(x + unit_step(dest_x - x), y + unit_step(dest_y - y));
            self.time_accumulator -= period;
            steps += 1;

            if !self.is_moving(sprite) {
                self.time_accumulator = 0.0;
                break;
            }
        }
        if steps > 0 {
            trace!("mob took {} step(s), now at {:?}", steps, sprite.position());
        }
        steps
    }

    /// Push the destination one `stride` in the direction of each W/A/S/D
    /// press. Releases and other keys are ignored.
    pub fn steer(&mut self, sprite: &Sprite, edges: &[KeyEdge], stride: f32) {
        let (mut x, mut y) = self.destination;
        for edge in edges.iter().filter(|e| e.edge == Edge::Pressed) {
            let (dx, dy) = match edge.code {
                KeyCode::W => (0.0, -stride),
                KeyCode::S => (0.0, stride),
                KeyCode::A => (-stride, 0.0),
                KeyCode::D => (stride, 0.0),
                KeyCode::Esc | KeyCode::Space => continue,
            };
            x += dx;
            y += dy;
        }
        self.set_destination(sprite, x, y);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::native::RendererRef;
    use crate::native::headless::HeadlessRenderer;
    use crate::resources::spritesheet::{Rect, SpriteSheet};
    use crate::resources::texture::{PixelFormat, Texture};

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn sprite_at(x: f32, y: f32) -> Sprite {
        let renderer: RendererRef = Rc::new(HeadlessRenderer::new());
        let tex = Texture::create(&renderer, &[0; 4], 1, 1, PixelFormat::Rgba8888).unwrap();
        let sheet = Rc::new(SpriteSheet::create(Rc::new(tex), vec![Rect::new(0, 0, 1, 1)]));
        let mut sprite = Sprite::create(&renderer, sheet);
        sprite.set_position(x, y);
        sprite
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let sprite = sprite_at(0.0, 0.0);
        assert_eq!(Mob::new(&sprite, 0.0), Err(MobError::InvalidSpeed(0.0)));
        assert!(Mob::new(&sprite, -1.0).is_err());
        assert!(Mob::new(&sprite, f32::INFINITY).is_err());
    }

    #[test]
    fn test_new_mob_is_idle() {
        let mut sprite = sprite_at(3.0, 4.0);
        let mut mob = Mob::new(&sprite, 8.0).unwrap();
        assert!(!mob.is_moving(&sprite));
        assert_eq!(mob.update(&mut sprite, 10.0), 0);
        assert_eq!(sprite.position(), (3.0, 4.0));
        assert_eq!(mob.time_accumulator(), 0.0);
    }

    #[test]
    fn test_single_step_per_period() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 4.0).unwrap();
        mob.set_destination(&sprite, 3.0, 0.0);

        assert_eq!(mob.update(&mut sprite, 0.125), 0);
        assert!(approx_eq(mob.time_accumulator(), 0.125));
        assert_eq!(mob.update(&mut sprite, 0.125), 1);
        assert_eq!(sprite.position(), (1.0, 0.0));
    }

    #[test]
    fn test_catch_up_stops_at_destination() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 10.0).unwrap();
        mob.set_destination(&sprite, -3.0, 0.0);

        assert_eq!(mob.update(&mut sprite, 5.0), 3);
        assert_eq!(sprite.position(), (-3.0, 0.0));
        assert_eq!(mob.time_accumulator(), 0.0);
    }

    #[test]
    fn test_fractional_remainder_lands_exactly() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 1.0).unwrap();
        mob.set_destination(&sprite, 1.5, 0.0);

        assert_eq!(mob.update(&mut sprite, 10.0), 2);
        assert_eq!(sprite.position(), (1.5, 0.0));
        assert!(!mob.is_moving(&sprite));
    }

    #[test]
    fn test_retarget_keeps_accumulated_progress() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 2.0).unwrap();
        mob.set_destination(&sprite, 5.0, 0.0);
        mob.update(&mut sprite, 0.25);

        mob.set_destination(&sprite, 0.0, 5.0);
        assert!(approx_eq(mob.time_accumulator(), 0.25));
        assert_eq!(mob.update(&mut sprite, 0.25), 1);
        assert_eq!(sprite.position(), (0.0, 1.0));
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 1.0).unwrap();
        mob.set_destination(&sprite, 1.0, 0.0);
        mob.update(&mut sprite, -5.0);
        assert_eq!(mob.time_accumulator(), 0.0);
    }

    #[test]
    fn test_steer_moves_destination_by_stride() {
        let sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 1.0).unwrap();
        mob.steer(
            &sprite,
            &[
                KeyEdge::pressed(KeyCode::D),
                KeyEdge::pressed(KeyCode::S),
                KeyEdge::released(KeyCode::A),
                KeyEdge::pressed(KeyCode::Space),
            ],
            16.0,
        );
        assert_eq!(mob.destination(), (16.0, 16.0));

        mob.steer(&sprite, &[KeyEdge::pressed(KeyCode::W), KeyEdge::pressed(KeyCode::A)], 16.0);
        assert_eq!(mob.destination(), (0.0, 0.0));
    }

    #[test]
    fn test_retarget_onto_sprite_clears_accumulator() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 2.0).unwrap();
        mob.set_destination(&sprite, 5.0, 0.0);
        mob.update(&mut sprite, 0.25);
        assert!(approx_eq(mob.time_accumulator(), 0.25));

        mob.set_destination(&sprite, 0.0, 0.0);
        assert!(!mob.is_moving(&sprite));
        assert_eq!(mob.time_accumulator(), 0.0);
    }

    #[test]
    fn test_steer_back_to_start_clears_accumulator() {
        let mut sprite = sprite_at(0.0, 0.0);
        let mut mob = Mob::new(&sprite, 2.0).unwrap();
        mob.steer(&sprite, &[KeyEdge::pressed(KeyCode::D)], 16.0);
        mob.update(&mut sprite, 0.25);
        assert!(approx_eq(mob.time_accumulator(), 0.25));

        mob.steer(&sprite, &[KeyEdge::pressed(KeyCode::A)], 16.0);
        assert_eq!(mob.destination(), (0.0, 0.0));
        assert_eq!(mob.time_accumulator(), 0.0);
    }
}
