//! Sweep tests between a static and a moving shape.
//!
//! Each sweep pads the static shape by the moving one (a Minkowski sum), then queries the
//! moving shape's center as a point travelling along `delta`. Reported `point`s are thus
//! the moving shape's center at the moment of contact.

use crate::{
    narrow::{Aabb, Circle, Hit, Intersect, Shape},
    Fp, Vec2,
};

// ---------- Sweep ---------- //

pub fn aabb_aabb_sweep(aabb: &Aabb, moving: &Aabb, delta: Vec2) -> Hit {
    aabb.pad(moving.size).line_query(moving.center, moving.center + delta)
}

pub fn aabb_circle_sweep(aabb: &Aabb, circle: &Circle, delta: Vec2) -> Hit {
    //! Sweeps against the box padded by the circle's diameter. That padding is exact along
    //! the box's sides but squares off the corners, so hits landing beyond both half extents
    //! are resolved against a circle of the moving radius at the nearest corner instead.
    let (a, b) = (circle.center, circle.center + delta);
    let hit = aabb.pad(Vec2::splat(circle.radius * 2.0)).line_query(a, b);
    if !hit.hit {
        return hit;
    }

    let p = hit.point - aabb.center;
    let half = aabb.half_size();
    let corner = if p.y < -half.y {
        if p.x < -half.x {
            Some(aabb.min())
        } else if p.x > half.x {
            Some(aabb.maxx_miny())
        } else {
            None
        }
    } else if p.y > half.y {
        if p.x < -half.x {
            Some(aabb.minx_maxy())
        } else if p.x > half.x {
            Some(aabb.max())
        } else {
            None
        }
    } else {
        None
    };

    match corner {
        Some(corner) => {
            let rounded = Circle { center: corner, radius: circle.radius };
            if rounded.contains(a) {
                // already overlapping the corner
                return hit;
            }
            log::trace!("sweep from {:?} resolved against corner {:?}", a, corner);
            rounded.line_query(a, b)
        }
        None => hit,
    }
}

pub fn circle_circle_sweep(circle: &Circle, moving: &Circle, delta: Vec2) -> Hit {
    Circle { center: circle.center, radius: circle.radius + moving.radius }
        .line_query(moving.center, moving.center + delta)
}

pub fn circle_aabb_sweep(circle: &Circle, moving: &Aabb, delta: Vec2) -> Hit {
    //! Swaps roles: the circle sweeps backwards past the stationary box, then the result is mapped
    //! back to the box's motion.
    log::trace!("mirroring aabb sweep against circle at {:?}", circle.center);
    let hit = aabb_circle_sweep(moving, circle, -delta);
    if hit.hit {
        Hit::new(hit.time, moving.center + delta * hit.time, -hit.normal)
    } else {
        hit
    }
}

impl Shape {
    pub fn sweep(&self, moving: &Shape, delta: Vec2) -> Hit {
        //! Earliest contact as `moving` is displaced by `delta` past `self`.
        match (self, moving) {
            (Shape::Aabb(a1), Shape::Aabb(a2)) => aabb_aabb_sweep(a1, a2, delta),
            (Shape::Aabb(a), Shape::Circle(c)) => aabb_circle_sweep(a, c, delta),
            (Shape::Circle(c), Shape::Aabb(a)) => circle_aabb_sweep(c, a, delta),
            (Shape::Circle(c1), Shape::Circle(c2)) => circle_circle_sweep(c1, c2, delta),
        }
    }
}

// ---------- Body ---------- //

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position
    pub pos: Vec2,
    /// Compositing shapes, relative to `pos`
    pub shapes: Vec<Shape>,
    /// Bounding box, in world space
    pub aabb: Aabb,
    /// Velocity
    pub vel: Vec2,
}
impl Body {
    pub fn new(shapes: Vec<Shape>, pos: Vec2, vel: Vec2) -> Body {
        // Body's full bounding box must be found.
        let mut bounds = shapes.iter().map(|s| s.bounding_box());
        let bbb = match bounds.next() {
            Some(first) => bounds.fold(first, |acc, sbb| {
                Aabb::from_min_max(acc.min().min(sbb.min()), acc.max().max(sbb.max()))
            }),
            None => Aabb { center: Vec2::ZERO, size: Vec2::ZERO },
        };

        Body { pos, vel, aabb: bbb.translate(pos), shapes }
    }

    pub fn get_broad(&self, t: Fp) -> Aabb {
        //! Returns `self`'s Aabb broadened over `self`'s displacement in `t`.
        self.aabb.broaden(self.vel * t)
    }

    pub fn translate(&mut self, offset: Vec2) {
        //! Teleports the body.
        self.pos += offset;
        self.aabb = self.aabb.translate(offset);
    }

    pub fn sweep(&self, other: &Body, t: Fp) -> Hit {
        //! Earliest contact of `other` with `self` as both move for `t`.
        //! The hit point is `other`'s contacting shape center, in world space.
        let rv = (other.vel - self.vel) * t;
        if !self.aabb.aabb_test(&other.aabb.broaden(rv)) {
            return Hit::MISS;
        }

        let mut result = Hit::MISS;
        for s1 in self.shapes.iter().map(|s| s.translate(self.pos)) {
            for s2 in other.shapes.iter().map(|s| s.translate(other.pos)) {
                result = result.earliest(s1.sweep(&s2, rv));
            }
        }

        // from the frame moving with `self` back to world space
        if result.hit {
            result.point += self.vel * (t * result.time);
        }
        result
    }
}
