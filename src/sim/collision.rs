//! Swept collision detection and reflection
//!
//! The ball is a circle moving along a straight segment each tick. Every
//! test here is continuous: it reports the earliest time of impact within
//! the tick's displacement, so a fast ball cannot tunnel through a thin
//! brick. Circle-vs-rectangle sweeps reduce to point-vs-inflated-rectangle
//! (Minkowski sum), handled with the slab method.

use glam::DVec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extent(&self) -> DVec2 {
        (self.max - self.min) * 0.5
    }

    /// Rectangle grown by `amount` on every side
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(amount),
            max: self.max + DVec2::splat(amount),
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Earliest contact along a displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Fraction of the displacement consumed before contact, in [0, 1]
    pub toi: f64,
    /// Surface normal at contact, pointing away from the struck surface
    pub normal: DVec2,
}

/// Sweep a point along `disp` against a rectangle (slab method).
///
/// Returns the earliest entry in [0, 1] with the normal of the face crossed
/// first. A point already inside the rectangle reports `toi = 0` with the
/// normal of the face nearest to the approach direction, mirroring a
/// discrete side check - the bounded resolution loop upstream keeps this
/// from ping-ponging forever.
pub fn sweep_point_rect(start: DVec2, disp: DVec2, rect: &Rect) -> Option<Hit> {
    if rect.contains(start) {
        return Some(Hit {
            toi: 0.0,
            normal: overlap_normal(start, rect),
        });
    }

    let mut t_entry = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut normal = DVec2::ZERO;

    for axis in 0..2 {
        let (s, d, lo, hi) = match axis {
            0 => (start.x, disp.x, rect.min.x, rect.max.x),
            _ => (start.y, disp.y, rect.min.y, rect.max.y),
        };

        if d.abs() < f64::EPSILON {
            // Moving parallel to this slab: must already be inside it
            if s < lo || s > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut near, mut far) = ((lo - s) * inv, (hi - s) * inv);
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        // Entry is always through the face opposing the motion on this axis
        let axis_normal = if axis == 0 {
            DVec2::new(-d.signum(), 0.0)
        } else {
            DVec2::new(0.0, -d.signum())
        };

        if near > t_entry {
            t_entry = near;
            normal = axis_normal;
        }
        t_exit = t_exit.min(far);
    }

    if t_entry > t_exit || t_entry < 0.0 || t_entry > 1.0 {
        return None;
    }
    Some(Hit {
        toi: t_entry,
        normal,
    })
}

/// Side-based normal for a point that starts inside a rectangle
///
/// Picks the face whose proportional distance from the center is largest,
/// the same tie-break a discrete overlap check uses.
fn overlap_normal(p: DVec2, rect: &Rect) -> DVec2 {
    let rel = p - rect.center();
    let half = rect.half_extent();
    let px = rel.x / half.x.max(f64::EPSILON);
    let py = rel.y / half.y.max(f64::EPSILON);
    if px.abs() > py.abs() {
        DVec2::new(px.signum(), 0.0)
    } else {
        DVec2::new(0.0, py.signum())
    }
}

/// Sweep a point against the axis-aligned plane `x = bound` or `y = bound`.
///
/// `normal` is the interior-facing normal of the wall; a hit is reported
/// only when the point moves against it.
pub fn sweep_point_plane(start: DVec2, disp: DVec2, bound: f64, normal: DVec2) -> Option<Hit> {
    let d = disp.dot(-normal);
    if d <= f64::EPSILON {
        return None;
    }
    // Distance from the point to the plane, measured against the wall normal
    let dist = if normal.x != 0.0 {
        (bound - start.x) * -normal.x
    } else {
        (bound - start.y) * -normal.y
    };
    let toi = dist / d;
    if !(0.0..=1.0).contains(&toi) {
        return None;
    }
    Some(Hit { toi, normal })
}

/// Mirror reflection: v' = v - 2(v.n)n
#[inline]
pub fn reflect(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Paddle bounce: deterministic deflection by impact offset.
///
/// The offset of the contact point from the paddle center, normalized to
/// [-1, 1], maps linearly to a bounce angle off vertical (up to
/// `max_angle_deg`). The returned velocity always points upward and has
/// magnitude exactly `speed`, so the speed invariant holds by construction.
pub fn paddle_bounce(ball_x: f64, paddle_center_x: f64, half_width: f64, speed: f64, max_angle_deg: f64) -> DVec2 {
    let offset = ((ball_x - paddle_center_x) / half_width.max(f64::EPSILON)).clamp(-1.0, 1.0);
    let angle = (offset * max_angle_deg).to_radians();
    DVec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}
