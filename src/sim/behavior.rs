//! Social behavior and reproduction
//!
//! Once in a while a creature acts: if it bounced recently it gets restless,
//! and it looks at one random member of the population. Creatures close
//! enough to each other build love; when love outgrows the population a
//! mature creature gives birth to a child mixing both parents' skins.

use glam::DVec2;
use rand::Rng;

use super::creature::{Creature, CreatureId, SpawnParams, Symbol, SymbolKind};
use super::state::WorldStats;
use crate::consts::*;

/// A child waiting to be added to the population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Birth {
    pub position: DVec2,
    pub born: f64,
    pub skin: [f64; 3],
    /// The acting creature first, its partner second
    pub parents: (CreatureId, CreatureId),
}

impl Birth {
    pub fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            position: Some(self.position),
            born: Some(self.born),
            skin: Some(self.skin),
        }
    }
}

/// Mix two parent skins channel by channel.
///
/// Each channel is inherited from either parent with equal odds, or rarely
/// replaced by a fresh random tint shared by all mutated channels.
pub fn blend_skin(mine: [f64; 3], partner: [f64; 3], rng: &mut impl Rng) -> [f64; 3] {
    let light = rng.random::<f64>() - 0.5;
    let colorize = 0.5;
    let mutation = light + colorize * (rng.random::<f64>() - 0.5);
    std::array::from_fn(|i| {
        if rng.random::<f64>() < MUTATION_CHANCE {
            mutation
        } else if rng.random::<f64>() < 0.5 {
            mine[i]
        } else {
            partner[i]
        }
    })
}

/// Behavior phase for `creatures[index]`.
///
/// The population slice is read live, so children born earlier in the same
/// phase can be picked as partners and count toward the population size.
pub fn act(
    creatures: &mut [Creature],
    index: usize,
    stats: &mut WorldStats,
    symbols: &mut Vec<Symbol>,
    time: f64,
    rng: &mut impl Rng,
) -> Option<Birth> {
    if index >= creatures.len() || rng.random::<f64>() >= ACT_CHANCE {
        return None;
    }

    let me = &mut creatures[index];
    if time - me.last_bounce < RECENT_BOUNCE {
        me.mov.x += rng.random::<f64>() - 0.5;
        me.mov.x *= JITTER_DAMPING;
        me.mov.y = (rng.random::<f64>() - 0.5) * 2.0;
    }

    let population = creatures.len();
    let pick = ((rng.random::<f64>() * population as f64) as usize).min(population - 1);
    if pick == index {
        return None;
    }
    let partner = &creatures[pick];
    let (partner_id, partner_pos, partner_skin) = (partner.id, partner.head_pos(), partner.skin);

    let me = &mut creatures[index];
    let delta = partner_pos - me.head_pos();
    if delta.length_squared() >= CLOSENESS {
        return None;
    }

    me.influence -= delta.x;
    let count = population as f64;
    let before = stats.love;
    stats.love += (me.thrill_speed / 10.0).abs();
    let gauge_moved = (100.0 * before / count).round() != (100.0 * stats.love / count).round();
    if me.can_signal(time) && gauge_moved {
        me.last_symbol = time;
        symbols.push(Symbol::emit(me, SymbolKind::Love, time, rng));
    }

    if stats.love > count && me.size(time) >= BREEDING_SIZE {
        stats.love = 0.0;
        let skin = blend_skin(me.skin, partner_skin, rng);
        return Some(Birth {
            position: me.head_pos(),
            born: time,
            skin,
            parents: (me.id, partner_id),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::ScriptedRng;

    fn pair(gap: f64) -> Vec<Creature> {
        let mut a = Creature::new(CreatureId(1), DVec2::new(0.0, 1.0), 2);
        a.skin = [0.1, 0.2, 0.3];
        a.born = ADULT_BIRTH;
        a.last_bounce = -1000.0;
        let mut b = Creature::new(CreatureId(2), DVec2::new(gap, 1.0), 2);
        b.skin = [0.7, 0.8, 0.9];
        b.last_bounce = -1000.0;
        vec![a, b]
    }

    #[test]
    fn test_idle_most_ticks() {
        let mut creatures = pair(0.01);
        let mut stats = WorldStats::default();
        let mut symbols = Vec::new();
        let mut rng = ScriptedRng::new(&[0.5]);
        assert!(act(&mut creatures, 0, &mut stats, &mut symbols, 0.0, &mut rng).is_none());
        assert_eq!(creatures[0].influence, 0.0);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_restless_after_bounce() {
        let mut creatures = pair(1.0);
        creatures[0].last_bounce = 0.0;
        creatures[0].mov = DVec2::new(1.0, 0.3);
        let mut stats = WorldStats::default();
        let mut symbols = Vec::new();
        // act, jitter x, jitter y, pick self
        let mut rng = ScriptedRng::new(&[0.0, 0.75, 0.25, 0.25]);
        act(&mut creatures, 0, &mut stats, &mut symbols, 100.0, &mut rng);
        assert!((creatures[0].mov.x - 1.125).abs() < 1e-12);
        assert!((creatures[0].mov.y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_far_partner_ignored() {
        let mut creatures = pair(0.1);
        creatures[0].thrill_speed = 5.0;
        let mut stats = WorldStats::default();
        let mut symbols = Vec::new();
        let mut rng = ScriptedRng::new(&[0.0, 0.75]);
        assert!(act(&mut creatures, 0, &mut stats, &mut symbols, 0.0, &mut rng).is_none());
        assert_eq!(stats.love, 0.0);
    }

    #[test]
    fn test_bonding_builds_love_and_influence() {
        let mut creatures = pair(0.01);
        creatures[0].thrill_speed = 5.0;
        let mut stats = WorldStats::default();
        let mut symbols = Vec::new();
        // act, pick partner, symbol rotation
        let mut rng = ScriptedRng::new(&[0.0, 0.75, 0.5]);
        let birth = act(&mut creatures, 0, &mut stats, &mut symbols, 1000.0, &mut rng);
        assert!(birth.is_none());
        assert!((stats.love - 0.5).abs() < 1e-12);
        assert!((creatures[0].influence + 0.01).abs() < 1e-12);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind, SymbolKind::Love);
        assert!((symbols[0].size - 1.5).abs() < 1e-12);
        assert_eq!(creatures[0].last_symbol, 1000.0);
    }

    #[test]
    fn test_love_symbol_needs_cooldown() {
        let mut creatures = pair(0.01);
        creatures[0].thrill_speed = 5.0;
        creatures[0].last_symbol = 800.0;
        let mut stats = WorldStats::default();
        let mut symbols = Vec::new();
        let mut rng = ScriptedRng::new(&[0.0, 0.75]);
        act(&mut creatures, 0, &mut stats, &mut symbols, 1000.0, &mut rng);
        assert!(symbols.is_empty());
        assert!((stats.love - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reproduction_resets_love() {
        let mut creatures = pair(0.01);
        creatures[0].thrill_speed = 5.0;
        creatures[0].last_symbol = 1000.0;
        let mut stats = WorldStats {
            love: 1.8,
            ..Default::default()
        };
        let mut symbols = Vec::new();
        // act, pick, light, colorize, then (mutate?, side?) per channel
        let mut rng = ScriptedRng::new(&[0.0, 0.75, 0.5, 0.5, 0.5, 0.25, 0.5, 0.75, 0.0]);
        let birth = act(&mut creatures, 0, &mut stats, &mut symbols, 1000.0, &mut rng)
            .expect("birth");
        assert_eq!(stats.love, 0.0);
        assert_eq!(birth.parents, (CreatureId(1), CreatureId(2)));
        assert_eq!(birth.position, DVec2::new(0.0, 1.0));
        assert_eq!(birth.born, 1000.0);
        // mine, partner, mutation (light 0 + 0.5 * 0)
        assert_eq!(birth.skin, [0.1, 0.8, 0.0]);
    }

    #[test]
    fn test_immature_creature_cannot_breed() {
        let mut creatures = pair(0.01);
        creatures[0].thrill_speed = 5.0;
        creatures[0].born = 0.0;
        let mut stats = WorldStats {
            love: 1.8,
            ..Default::default()
        };
        let mut symbols = Vec::new();
        let mut rng = ScriptedRng::new(&[0.0, 0.75, 0.5]);
        // size(7000) = 0.85
        assert!(act(&mut creatures, 0, &mut stats, &mut symbols, 7000.0, &mut rng).is_none());
        assert!((stats.love - 2.3).abs() < 1e-12);
    }

    #[test]
    fn test_blend_skin_inherits_from_parents() {
        let mut rng = ScriptedRng::new(&[0.5, 0.5, 0.5, 0.0, 0.5, 0.75, 0.02, 0.9]);
        let skin = blend_skin([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], &mut rng);
        assert_eq!(skin, [1.0, 5.0, 6.0]);
    }
}
