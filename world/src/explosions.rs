//! Short-lived visual effect left behind by killed enemies.

use glam::Vec2;
use path_defence_core::{ExplosionRules, ExplosionSnapshot, FieldPoint};

#[derive(Clone, Debug)]
pub(crate) struct Explosion {
    position: Vec2,
    radius: i32,
    alpha: i32,
    radius_growth: i32,
    alpha_decay: i32,
}

impl Explosion {
    pub(crate) fn new(position: FieldPoint, rules: &ExplosionRules) -> Self {
        Self {
            position: position.to_vec2(),
            radius: 0,
            alpha: rules.initial_alpha,
            radius_growth: rules.radius_growth,
            alpha_decay: rules.alpha_decay,
        }
    }

    /// Grows and fades the explosion. Returns `true` once it has fully faded.
    pub(crate) fn update(&mut self) -> bool {
        self.radius += self.radius_growth;
        self.alpha -= self.alpha_decay;
        self.is_done()
    }

    pub(crate) const fn is_done(&self) -> bool {
        self.alpha <= 0
    }

    pub(crate) fn snapshot(&self) -> ExplosionSnapshot {
        ExplosionSnapshot {
            position: self.position,
            radius: self.radius,
            alpha: u8::try_from(self.alpha.clamp(0, 255)).unwrap_or(0),
        }
    }
}
