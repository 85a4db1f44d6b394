//! Actor variants and their per-step motion rules
//!
//! Each kind integrates one step of motion per `advance` call. Cross-actor
//! and tile effects are not applied in place: the step returns [`Contact`]
//! events and the owning level resolves them afterward, keeping the borrow
//! of the level immutable while an actor moves.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::grid::TileKind;
use super::level::Level;
use super::tick::Intent;
use crate::consts::*;

/// Effects produced by one actor's step, resolved by the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// The bounding box touched a non-empty tile of this kind
    Tile(TileKind),
    /// The bounding box overlapped another actor
    Actor(u32),
    /// The bounding box crossed the bottom play boundary
    FellOut,
}

/// Kind-specific actor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    /// Bobs vertically around a fixed base position
    Pickup { base: DVec2, phase: f64 },
    /// Patrols horizontally, bouncing off walls
    Hazard,
}

/// A simulated entity: position (top-left of bounding box), velocity, and
/// per-kind update state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub kind: ActorKind,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Render hint: set when the player touches this actor, cleared by the
    /// renderer each frame. Never read by the simulation.
    pub touched: bool,
}

impl Actor {
    pub fn player(id: u32, tile: DVec2) -> Self {
        Self {
            id,
            kind: ActorKind::Player,
            pos: tile + PLAYER_SPAWN_OFFSET,
            vel: DVec2::ZERO,
            touched: false,
        }
    }

    pub fn pickup(id: u32, tile: DVec2, phase: f64) -> Self {
        let base = tile + PICKUP_SPAWN_OFFSET;
        Self {
            id,
            kind: ActorKind::Pickup { base, phase },
            pos: base,
            vel: DVec2::ZERO,
            touched: false,
        }
    }

    pub fn hazard(id: u32, tile: DVec2) -> Self {
        Self {
            id,
            kind: ActorKind::Hazard,
            pos: tile,
            vel: DVec2::new(HAZARD_SPEED_X, 0.0),
            touched: false,
        }
    }

    /// Bounding box size, constant per kind
    pub fn size(&self) -> DVec2 {
        match self.kind {
            ActorKind::Player => PLAYER_SIZE,
            ActorKind::Pickup { .. } => PICKUP_SIZE,
            ActorKind::Hazard => HAZARD_SIZE,
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player)
    }

    #[inline]
    pub fn is_pickup(&self) -> bool {
        matches!(self.kind, ActorKind::Pickup { .. })
    }

    /// Advance one step. `dt` arrives already clamped by the driver; only
    /// the player consumes `intent`.
    pub fn advance(&mut self, dt: f64, level: &Level, intent: &Intent) -> Vec<Contact> {
        match self.kind {
            ActorKind::Player => self.step_player(dt, level, intent),
            ActorKind::Pickup { .. } => {
                self.step_pickup(dt);
                Vec::new()
            }
            ActorKind::Hazard => {
                self.step_hazard(dt, level);
                Vec::new()
            }
        }
    }

    /// Axis-separated player integration: X, then Y, then actor overlap.
    fn step_player(&mut self, dt: f64, level: &Level, intent: &Intent) -> Vec<Contact> {
        let mut contacts = Vec::new();
        self.move_x(dt, level, intent, &mut contacts);
        self.move_y(dt, level, intent, &mut contacts);

        if let Some(other) = level.actor_at(self) {
            contacts.push(Contact::Actor(other));
        }
        contacts
    }

    fn move_x(&mut self, dt: f64, level: &Level, intent: &Intent, contacts: &mut Vec<Contact>) {
        let size = self.size();
        // Additive so holding both directions nets zero
        self.vel.x = (if intent.move_right { PLAYER_SPEED_X } else { 0.0 })
            - (if intent.move_left { PLAYER_SPEED_X } else { 0.0 });

        let new_pos = self.pos + DVec2::new(self.vel.x * dt, 0.0);
        match level.obstacle_at(new_pos, size) {
            Some(obstacle) => {
                contacts.extend(obstacle.touched_kinds.iter().map(|&k| Contact::Tile(k)));
                contacts.push(Contact::Tile(obstacle.kind));
                if self.vel.x > 0.0 {
                    self.pos.x = obstacle.tile.x - size.x;
                } else if self.vel.x < 0.0 {
                    self.pos.x = obstacle.tile.x + 1.0;
                }
                self.vel.x = 0.0;
            }
            None => self.pos = new_pos,
        }
    }

    fn move_y(&mut self, dt: f64, level: &Level, intent: &Intent, contacts: &mut Vec<Contact>) {
        let size = self.size();
        self.vel.y += GRAVITY * dt;

        let new_pos = self.pos + DVec2::new(0.0, self.vel.y * dt);
        if new_pos.y + size.y > level.height() as f64 - 1.0 {
            contacts.push(Contact::FellOut);
        }
        match level.obstacle_at(new_pos, size) {
            Some(obstacle) => {
                contacts.extend(obstacle.touched_kinds.iter().map(|&k| Contact::Tile(k)));
                contacts.push(Contact::Tile(obstacle.kind));
                if intent.jump && self.vel.y > 0.0 {
                    // A jump is granted only at the instant a downward fall
                    // is arrested by a surface; no position snap in that case
                    self.vel.y = -JUMP_FORCE;
                } else {
                    if self.vel.y > 0.0 {
                        self.pos.y = obstacle.tile.y - size.y;
                    }
                    self.vel.y = 0.0;
                }
            }
            None => self.pos = new_pos,
        }
    }

    /// Vertical bob around the fixed base; no collision, no velocity state.
    fn step_pickup(&mut self, dt: f64) {
        if let ActorKind::Pickup { base, phase } = &mut self.kind {
            *phase += PICKUP_WOBBLE_SPEED * dt;
            let bob = phase.sin() * PICKUP_WOBBLE_DIST;
            self.pos = *base + DVec2::new(0.0, bob);
        }
    }

    /// Constant-speed patrol; reverse on the step that would hit a wall.
    fn step_hazard(&mut self, dt: f64, level: &Level) {
        let new_pos = self.pos + self.vel * dt;
        if level.obstacle_at(new_pos, self.size()).is_none() {
            self.pos = new_pos;
        } else {
            self.vel = -self.vel;
        }
    }
}
