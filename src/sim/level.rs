//! Level state: the tile grid, the live actor set, and win/lose status
//!
//! The level owns every actor; cross-actor interaction goes through the
//! queries here (`obstacle_at`, `actor_at`) and through [`Contact`] events
//! resolved after each actor's step.

use glam::DVec2;
use rand::Rng as _;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorKind, Contact};
use super::grid::{Grid, MapError, TileKind};
use super::tick::Intent;

/// Level outcome flag. `Won` and `Lost` are terminal: once reached, the
/// level no longer mutates and is meant to be discarded or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

/// Result of a bounding-box-to-grid scan
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Kind of the first non-empty tile in scan order, used for clamping
    pub kind: TileKind,
    /// World-space origin of that anchor tile
    pub tile: DVec2,
    /// Every non-empty tile kind the box covers, in scan order (row-major,
    /// top to bottom then left to right); may repeat
    pub touched_kinds: Vec<TileKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    grid: Grid,
    /// Insertion order = map authoring order; the order breaks ties in
    /// overlap queries, nothing else
    actors: Vec<Actor>,
    status: Status,
    next_id: u32,
}

impl Level {
    /// Construct a level from rows of map symbols.
    ///
    /// The symbol alphabet: space = empty, `x` = wall, `!` = hazard tile,
    /// `@` = player spawn, `o` = pickup spawn, `v` = moving hazard spawn.
    /// The seed fixes the pickups' initial wobble phases, keeping a run
    /// reproducible. A map with no pickups constructs already won.
    pub fn from_map(rows: &[&str], seed: u64) -> Result<Self, MapError> {
        let grid = Grid::from_rows(rows)?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut level = Self {
            grid,
            actors: Vec::new(),
            status: Status::InProgress,
            next_id: 1,
        };

        for (row, line) in rows.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let tile = DVec2::new(col as f64, row as f64);
                match symbol {
                    '@' => {
                        let id = level.next_entity_id();
                        level.actors.push(Actor::player(id, tile));
                    }
                    'o' => {
                        let id = level.next_entity_id();
                        let phase = rng.random_range(0.0..std::f64::consts::TAU);
                        level.actors.push(Actor::pickup(id, tile, phase));
                    }
                    'v' => {
                        let id = level.next_entity_id();
                        level.actors.push(Actor::hazard(id, tile));
                    }
                    _ => {}
                }
            }
        }

        if !level.actors.iter().any(Actor::is_pickup) {
            // Nothing to collect: the no-pickups-remain check holds at birth
            level.status = Status::Won;
        }

        log::info!(
            "level {}x{} with {} actors ({:?})",
            level.grid.width(),
            level.grid.height(),
            level.actors.len(),
            level.status,
        );
        Ok(level)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Live actors in authoring order (render snapshot)
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.is_player())
    }

    /// Renderer duty: reset the per-frame touched flags after drawing.
    pub fn clear_touched(&mut self) {
        for actor in &mut self.actors {
            actor.touched = false;
        }
    }

    /// Scan the tiles covered by a bounding box at `pos` of `size`.
    ///
    /// Returns `None` when every covered tile is empty. Coverage is the
    /// inclusive floor/ceil range of the box edges; a box reaching past any
    /// grid edge short-circuits to a wall-shaped result whose anchor sits on
    /// the violated boundary, so clamping lands flush against the edge.
    pub fn obstacle_at(&self, pos: DVec2, size: DVec2) -> Option<Obstacle> {
        let start_x = pos.x.floor() as i64;
        let end_x = (pos.x + size.x).ceil() as i64;
        let start_y = pos.y.floor() as i64;
        let end_y = (pos.y + size.y).ceil() as i64;
        let width = self.grid.width() as i64;
        let height = self.grid.height() as i64;

        if start_x < 0 || end_x > width || start_y < 0 || end_y > height {
            let tile = if start_x < 0 {
                DVec2::new(-1.0, start_y as f64)
            } else if end_x > width {
                DVec2::new(width as f64, start_y as f64)
            } else if start_y < 0 {
                DVec2::new(start_x as f64, -1.0)
            } else {
                DVec2::new(start_x as f64, height as f64)
            };
            return Some(Obstacle {
                kind: TileKind::Wall,
                tile,
                touched_kinds: Vec::new(),
            });
        }

        let mut anchor: Option<(TileKind, DVec2)> = None;
        let mut touched_kinds = Vec::new();
        for row in start_y..end_y {
            for col in start_x..end_x {
                let kind = self.grid.tile(col as usize, row as usize);
                if kind.is_empty() {
                    continue;
                }
                touched_kinds.push(kind);
                if anchor.is_none() {
                    anchor = Some((kind, DVec2::new(col as f64, row as f64)));
                }
            }
        }

        anchor.map(|(kind, tile)| Obstacle {
            kind,
            tile,
            touched_kinds,
        })
    }

    /// First other actor (storage order) whose bounding box overlaps
    /// `actor`'s. Overlap is strict on both axes: touching edges miss.
    pub fn actor_at(&self, actor: &Actor) -> Option<u32> {
        let size = actor.size();
        self.actors
            .iter()
            .find(|other| {
                other.id != actor.id
                    && actor.pos.x + size.x > other.pos.x
                    && actor.pos.x < other.pos.x + other.size().x
                    && actor.pos.y + size.y > other.pos.y
                    && actor.pos.y < other.pos.y + other.size().y
            })
            .map(|other| other.id)
    }

    /// Advance every actor one step in storage order, resolving each actor's
    /// contacts right after its move. No-op once the status is terminal and
    /// for non-positive timesteps.
    pub fn advance(&mut self, dt: f64, intent: &Intent) {
        if self.status != Status::InProgress || dt <= 0.0 {
            return;
        }

        // Snapshot ids up front: a collected pickup is removed synchronously
        // and must not skew iteration over the rest
        let ids: Vec<u32> = self.actors.iter().map(|a| a.id).collect();
        for id in ids {
            let Some(idx) = self.actors.iter().position(|a| a.id == id) else {
                continue;
            };
            let mut actor = self.actors[idx].clone();
            let contacts = actor.advance(dt, &*self, intent);
            self.actors[idx] = actor;
            for contact in contacts {
                self.resolve_contact(contact);
            }
        }
    }

    /// Apply one contact event from the player's step.
    fn resolve_contact(&mut self, contact: Contact) {
        match contact {
            Contact::Tile(TileKind::Hazard) | Contact::FellOut => self.lose(),
            Contact::Tile(_) => {}
            Contact::Actor(id) => {
                let Some(idx) = self.actors.iter().position(|a| a.id == id) else {
                    return;
                };
                self.actors[idx].touched = true;
                match self.actors[idx].kind {
                    ActorKind::Pickup { .. } => {
                        self.actors.remove(idx);
                        if !self.actors.iter().any(Actor::is_pickup) {
                            self.win();
                        }
                    }
                    ActorKind::Hazard => self.lose(),
                    ActorKind::Player => {}
                }
            }
        }
    }

    fn win(&mut self) {
        if self.status == Status::InProgress {
            log::debug!("status -> won");
            self.status = Status::Won;
        }
    }

    fn lose(&mut self) {
        if self.status == Status::InProgress {
            log::debug!("status -> lost");
            self.status = Status::Lost;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level(rows: &[&str]) -> Level {
        Level::from_map(rows, 7).unwrap()
    }

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_obstacle_anchor_is_first_in_scan_order() {
        let lvl = level(&[
            "@ o  ",
            " !x  ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        // Box covering both row-1 tiles: the hazard at (1,1) scans first
        let obstacle = lvl
            .obstacle_at(DVec2::new(1.2, 1.2), DVec2::new(1.2, 0.6))
            .unwrap();
        assert_eq!(obstacle.kind, TileKind::Hazard);
        assert_eq!(obstacle.tile, DVec2::new(1.0, 1.0));
        assert_eq!(
            obstacle.touched_kinds,
            vec![TileKind::Hazard, TileKind::Wall]
        );
    }

    #[test]
    fn test_obstacle_clear_path() {
        let lvl = level(&[
            "@ o  ",
            "     ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        assert_eq!(
            lvl.obstacle_at(DVec2::new(1.2, 1.2), DVec2::new(0.6, 0.6)),
            None
        );
        // Flush contact does not cover the floor row (exclusive ceil edge)
        assert_eq!(
            lvl.obstacle_at(DVec2::new(1.0, 1.4), DVec2::new(0.6, 0.6)),
            None
        );
    }

    #[test]
    fn test_obstacle_out_of_bounds_is_wall_shaped() {
        let lvl = level(&[
            "@ o  ",
            "     ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        let size = DVec2::new(0.6, 0.6);

        let left = lvl.obstacle_at(DVec2::new(-0.2, 1.0), size).unwrap();
        assert_eq!(left.kind, TileKind::Wall);
        assert_eq!(left.tile.x, -1.0);
        assert!(left.touched_kinds.is_empty());

        let right = lvl.obstacle_at(DVec2::new(4.6, 1.0), size).unwrap();
        assert_eq!(right.kind, TileKind::Wall);
        assert_eq!(right.tile.x, 5.0);

        let top = lvl.obstacle_at(DVec2::new(1.0, -0.2), size).unwrap();
        assert_eq!(top.kind, TileKind::Wall);
        assert_eq!(top.tile.y, -1.0);

        let bottom = lvl.obstacle_at(DVec2::new(1.0, 4.6), size).unwrap();
        assert_eq!(bottom.kind, TileKind::Wall);
        assert_eq!(bottom.tile.y, 5.0);
    }

    #[test]
    fn test_actor_overlap_is_strict() {
        let lvl = level(&[
            "@o   ",
            "     ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        let player = lvl.player().unwrap().clone();
        let pickup = lvl.actors().iter().find(|a| a.is_pickup()).unwrap();

        // Probe exactly edge-to-edge with the pickup: no overlap
        let mut probe = player.clone();
        probe.pos = DVec2::new(pickup.pos.x - probe.size().x, pickup.pos.y);
        assert_eq!(lvl.actor_at(&probe), None);

        // Nudge inside: overlap, first match in storage order
        probe.pos.x += 1e-9;
        assert_eq!(lvl.actor_at(&probe), Some(pickup.id));
    }

    #[test]
    fn test_no_pickups_means_already_won() {
        let lvl = level(&[
            "@    ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        assert_eq!(lvl.status(), Status::Won);
    }

    #[test]
    fn test_terminal_status_is_absorbing() {
        let mut lvl = level(&[
            "@    ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        assert_eq!(lvl.status(), Status::Won);
        let before = lvl.player().unwrap().pos;
        for _ in 0..30 {
            lvl.advance(DT, &Intent::default());
        }
        assert_eq!(lvl.status(), Status::Won);
        assert_eq!(lvl.player().unwrap().pos, before);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut lvl = level(&[
            "     ",
            "@ o  ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        // Settle so velocities are in a steady state first
        for _ in 0..60 {
            lvl.advance(DT, &Intent::default());
        }
        let before = lvl.clone();
        lvl.advance(0.0, &Intent::default());
        assert_eq!(lvl.status(), before.status());
        for (a, b) in lvl.actors().iter().zip(before.actors()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_corridor_run_collects_pickup_and_wins() {
        // Flat corridor; the pickup rests in a one-tile floor gap, so a
        // player walking right enters its box without leaving the ground
        let mut lvl = level(&[
            "          ",
            "          ",
            "@         ",
            "xxxxxoxxxx",
            "          ",
            "          ",
        ]);
        let right = Intent {
            move_right: true,
            ..Intent::default()
        };

        let mut last_x = lvl.player().unwrap().pos.x;
        let mut frames = 0;
        while lvl.status() == Status::InProgress && frames < 600 {
            lvl.advance(DT, &right);
            let x = lvl.player().unwrap().pos.x;
            assert!(x >= last_x, "x must increase monotonically");
            last_x = x;
            frames += 1;
        }

        assert_eq!(lvl.status(), Status::Won);
        assert!(!lvl.actors().iter().any(Actor::is_pickup));
        assert!(frames < 600, "collection must happen within the run");
    }

    #[test]
    fn test_pickup_count_monotonic_and_won_once() {
        // Two pickups sharing a floor gap; walking right sweeps both
        let mut lvl = level(&[
            "          ",
            "          ",
            "@         ",
            "xxxooxxxxx",
            "          ",
            "          ",
        ]);
        let right = Intent {
            move_right: true,
            ..Intent::default()
        };

        let count = |lvl: &Level| lvl.actors().iter().filter(|a| a.is_pickup()).count();
        let mut last_count = count(&lvl);
        assert_eq!(last_count, 2);
        let mut won_frame = None;
        for frame in 0..600 {
            lvl.advance(DT, &right);
            let c = count(&lvl);
            assert!(c <= last_count, "pickup count never increases");
            if lvl.status() == Status::Won && won_frame.is_none() {
                assert_eq!(c, 0, "won exactly when the last pickup goes");
                won_frame = Some(frame);
            }
            last_count = c;
        }
        assert!(won_frame.is_some());
    }

    #[test]
    fn test_hazard_tile_contact_loses_without_overshoot() {
        // Player one tile above a hazard row, falling with no intent.
        // Frames arrive at the clamp bound (100 ms) and must still resolve
        // the contact instead of tunneling past the row.
        let mut lvl = level(&[
            "    o",
            "@    ",
            "     ",
            "     ",
            "!!!!!",
            "     ",
            "     ",
        ]);
        let mut frames = 0;
        while lvl.status() == Status::InProgress && frames < 100 {
            lvl.advance(0.1, &Intent::default());
            frames += 1;
        }
        assert_eq!(lvl.status(), Status::Lost);
        let p = lvl.player().unwrap();
        // Arrested on the hazard row's surface, never past it
        assert!(p.pos.y + p.size().y <= 4.0 + 1e-9);
    }

    #[test]
    fn test_touching_moving_hazard_loses() {
        // Mover patrols the floor tile next to the player spawn
        let mut lvl = level(&[
            "    o",
            "@ v  ",
            "xxxxx",
            "     ",
            "     ",
        ]);
        for _ in 0..600 {
            lvl.advance(DT, &Intent::default());
            if lvl.status() != Status::InProgress {
                break;
            }
        }
        assert_eq!(lvl.status(), Status::Lost);
        // Terminal stays terminal even if frames keep coming
        lvl.advance(DT, &Intent::default());
        assert_eq!(lvl.status(), Status::Lost);
    }

    #[test]
    fn test_falling_past_the_bottom_loses() {
        // No floor under the spawn column
        let mut lvl = level(&[
            "    o",
            "@    ",
            "  xxx",
            "     ",
            "     ",
        ]);
        for _ in 0..600 {
            lvl.advance(DT, &Intent::default());
            if lvl.status() != Status::InProgress {
                break;
            }
        }
        assert_eq!(lvl.status(), Status::Lost);
    }

    proptest! {
        /// Axis-separated resolution invariant: whatever the held keys, a
        /// step never ends with the player's box inside a wall tile.
        #[test]
        fn prop_player_never_ends_inside_wall(
            x in 1.0f64..8.4,
            move_left in any::<bool>(),
            move_right in any::<bool>(),
            jump in any::<bool>(),
            frames in 1usize..240,
        ) {
            let mut lvl = level(&[
                "xxxxxxxxxx",
                "x@       x",
                "x        x",
                "xo       x",
                "xxxxxxxxxx",
                "          ",
                "          ",
            ]);
            // Drop the player in at an arbitrary horizontal position
            let idx = lvl.actors.iter().position(Actor::is_player).unwrap();
            lvl.actors[idx].pos = DVec2::new(x, 1.2);

            let intent = Intent { move_left, move_right, jump };
            for _ in 0..frames {
                lvl.advance(DT, &intent);
            }

            let p = lvl.player().unwrap();
            let (pos, size) = (p.pos, p.size());
            for row in 0..lvl.height() {
                for col in 0..lvl.width() {
                    if lvl.grid().tile(col, row) != TileKind::Wall {
                        continue;
                    }
                    let overlaps = pos.x < col as f64 + 1.0
                        && pos.x + size.x > col as f64
                        && pos.y < row as f64 + 1.0
                        && pos.y + size.y > row as f64;
                    prop_assert!(!overlaps, "player box overlaps wall ({col},{row})");
                }
            }
        }
    }
}
