//! Creatures, their body segments, and the symbols they emit

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::size_at;

/// Stable creature identity, allocated in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u64);

/// Which way a creature is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// One body segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub pos: DVec2,
    pub rotation: f64,
    /// Creature this segment belongs to
    pub owner: CreatureId,
}

/// Optional overrides for [`Creature::spawn`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnParams {
    /// Head position (random x near the origin at height 1 when absent)
    pub position: Option<DVec2>,
    /// Birth time (adult when absent)
    pub born: Option<f64>,
    /// Skin colour (random grey-ish tint when absent)
    pub skin: Option<[f64; 3]>,
}

/// A segmented creature
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub id: CreatureId,
    /// Head first, then the trailing tail segments
    pub members: Vec<Member>,
    pub skin: [f64; 3],
    /// Velocity (scaled by [`VELOCITY_SCALE`] when integrated)
    pub mov: DVec2,
    pub direction: Facing,
    /// Phase offset of the head wobble
    pub time_start: f64,
    /// Bias applied to random escapes, built up by social contact
    pub influence: f64,
    /// Peak vertical speed seen, slowly forgotten
    pub thrill_speed: f64,
    pub born: f64,
    pub last_bounce: f64,
    pub last_symbol: f64,
}

impl Creature {
    /// A creature with every segment at `head`, at rest
    pub fn new(id: CreatureId, head: DVec2, segments: usize) -> Self {
        let member = Member {
            pos: head,
            rotation: 0.0,
            owner: id,
        };
        Self {
            id,
            members: vec![member; segments.max(1)],
            skin: [0.0; 3],
            mov: DVec2::ZERO,
            direction: Facing::Right,
            time_start: 0.0,
            influence: 0.0,
            thrill_speed: 0.0,
            born: 0.0,
            last_bounce: 0.0,
            last_symbol: 0.0,
        }
    }

    /// Build a fresh creature, drawing every unspecified trait from `rng`
    pub fn spawn(id: CreatureId, params: SpawnParams, rng: &mut impl Rng) -> Self {
        let light = rng.random::<f64>() - 0.5;
        let skin = params.skin.unwrap_or_else(|| {
            let colorize = 0.3;
            std::array::from_fn(|_| light + colorize * (rng.random::<f64>() - 0.5))
        });
        let direction = if rng.random::<f64>() > 0.5 {
            Facing::Right
        } else {
            Facing::Left
        };
        let time_start = rng.random::<f64>() * 1000.0;
        let born = params.born.unwrap_or(ADULT_BIRTH);
        let head_pos = params
            .position
            .unwrap_or_else(|| DVec2::new((rng.random::<f64>() - 0.5) * 0.2, 1.0));
        let head_rotation = (rng.random::<f64>() - 0.5) * 0.5;
        let mov = DVec2::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5);

        let scatter = 0.01;
        let mut members = Vec::with_capacity(MEMBER_COUNT);
        members.push(Member {
            pos: head_pos,
            rotation: head_rotation,
            owner: id,
        });
        for i in 1..MEMBER_COUNT {
            let prev = members[i - 1].pos;
            let dx = (rng.random::<f64>() - 0.5) * scatter;
            let dy = (rng.random::<f64>() - 0.5) * scatter;
            let rotation = head_rotation * (rng.random::<f64>() - 0.5) * 0.1;
            members.push(Member {
                pos: prev + DVec2::new(dx, dy),
                rotation,
                owner: id,
            });
        }

        Self {
            id,
            members,
            skin,
            mov,
            direction,
            time_start,
            influence: 0.0,
            thrill_speed: 0.0,
            born,
            last_bounce: 0.0,
            last_symbol: born,
        }
    }

    pub fn head_pos(&self) -> DVec2 {
        self.members[0].pos
    }

    /// Body size at `time` (0.5 at birth, 1.0 once mature)
    pub fn size(&self, time: f64) -> f64 {
        size_at(time, self.born)
    }

    /// Render scale of segment `index` (0 for hidden or missing segments)
    pub fn member_scale(index: usize) -> f64 {
        MEMBER_SCALE.get(index).copied().unwrap_or(0.0)
    }

    /// Phase 1: fall
    pub fn apply_gravity(&mut self) {
        self.mov.y -= GRAVITY;
    }

    /// Phase 3: face the way the creature is moving.
    ///
    /// A horizontal velocity of exactly zero keeps the previous facing.
    pub fn adjust_direction(&mut self) {
        if self.mov.x > 0.0 {
            self.direction = Facing::Right;
        } else if self.mov.x < 0.0 {
            self.direction = Facing::Left;
        }
    }

    /// Shift every tail segment onto its predecessor's previous pose
    pub fn follow_head(&mut self) {
        for i in (1..self.members.len()).rev() {
            let prev = self.members[i - 1];
            let member = &mut self.members[i];
            member.pos = prev.pos;
            member.rotation = prev.rotation;
        }
    }

    /// Whether the cooldown since the last symbol has elapsed
    pub fn can_signal(&self, time: f64) -> bool {
        time - self.last_symbol > SYMBOL_COOLDOWN
    }
}

/// What a symbol expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Love,
    Thrill,
}

impl SymbolKind {
    /// Sprite index used by renderers
    pub fn index(self) -> u32 {
        match self {
            SymbolKind::Love => 0,
            SymbolKind::Thrill => 1,
        }
    }
}

/// Short-lived marker emitted by a creature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub pos: DVec2,
    pub rotation: f64,
    pub size: f64,
    pub kind: SymbolKind,
    pub born: f64,
}

impl Symbol {
    /// Marker at the creature's head, sized by its thrill
    pub fn emit(creature: &Creature, kind: SymbolKind, time: f64, rng: &mut impl Rng) -> Self {
        Self {
            pos: creature.head_pos(),
            rotation: rng.random::<f64>() - 0.5,
            size: 1.0 + creature.thrill_speed.abs() / 10.0,
            kind,
            born: time,
        }
    }

    /// Fraction of the lifespan used up at `time`, in `[0, 1]`
    pub fn age_fraction(&self, time: f64) -> f64 {
        ((time - self.born) / SYMBOL_LIFETIME).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self, time: f64) -> bool {
        time - self.born >= SYMBOL_LIFETIME
    }
}
