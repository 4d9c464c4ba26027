//! Axis-separated tile collision
//!
//! A kinematic body is an axis-aligned rectangle moving through a list of
//! static tiles. Movement is resolved one axis at a time: apply the X
//! component, snap out of any overlap, then apply Y against the already
//! X-resolved rectangle. Simultaneous two-axis resolution is out of scope.

use macroquad::prelude::{IVec2, Vec2};

/// Integer axis-aligned rectangle used for tiles and body bounds.
///
/// Overlap is strict: rectangles that merely touch along an edge do not
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TileRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }

    pub fn overlaps(&self, other: &TileRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Which sides of the body hit something during the last move call.
///
/// Replaced wholesale on every `move_by`; flags never persist across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// A rectangle with sub-pixel position that moves against static tiles.
///
/// The integer bounding rect always sits at the floored position; size is
/// fixed at creation.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub size: IVec2,
    pub rect: TileRect,
    pub collisions: CollisionFlags,
}

impl KinematicBody {
    pub fn new(pos: Vec2, size: IVec2) -> Self {
        let rect = TileRect::new(
            pos.x.floor() as i32,
            pos.y.floor() as i32,
            size.x,
            size.y,
        );
        Self {
            pos,
            size,
            rect,
            collisions: CollisionFlags::default(),
        }
    }

    /// Move by `displacement`, resolving against `tiles` one axis at a time.
    ///
    /// For each axis: position advances, the integer rect is recomputed, and
    /// every tile overlapping at that point snaps the matching edge and sets
    /// the matching flag. The overlap set is gathered before snapping, so
    /// when several tiles overlap at once each contributes its flag and the
    /// last one processed keeps the snap (iteration order decides). A zero
    /// displacement on an axis never snaps, even while overlapping. The
    /// resolved integer coordinate is written back into the sub-pixel
    /// position.
    pub fn move_by(&mut self, displacement: Vec2, tiles: &[TileRect]) -> CollisionFlags {
        let mut flags = CollisionFlags::default();

        // x-axis
        self.pos.x += displacement.x;
        self.rect.x = self.pos.x.floor() as i32;
        for tile in overlapping(&self.rect, tiles) {
            if displacement.x > 0.0 {
                self.rect.x = tile.x - self.rect.w;
                flags.right = true;
            } else if displacement.x < 0.0 {
                self.rect.x = tile.right();
                flags.left = true;
            }
        }
        self.pos.x = self.rect.x as f32;

        // y-axis, against the X-resolved rect
        self.pos.y += displacement.y;
        self.rect.y = self.pos.y.floor() as i32;
        for tile in overlapping(&self.rect, tiles) {
            if displacement.y > 0.0 {
                self.rect.y = tile.y - self.rect.h;
                flags.bottom = true;
            } else if displacement.y < 0.0 {
                self.rect.y = tile.bottom();
                flags.top = true;
            }
        }
        self.pos.y = self.rect.y as f32;

        self.collisions = flags;
        flags
    }
}

/// Tiles overlapping `rect`, in input order.
fn overlapping(rect: &TileRect, tiles: &[TileRect]) -> Vec<TileRect> {
    tiles.iter().filter(|t| rect.overlaps(t)).copied().collect()
}
