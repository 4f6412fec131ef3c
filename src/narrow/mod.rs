//! Narrowphase data and logic module.

pub mod swept;

use crate::{
    error::{Result, ShapeError},
    Fp, Vec2,
};
use std::cmp::Ordering;

// ---------- Hit ---------- //

/// The outcome of a segment or sweep query.
///
/// `point` and `normal` only carry meaning while `hit` is set; a miss reports a `time` of `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub hit: bool,
    /// Fraction along the queried segment or displacement, within `[0, 1]`.
    pub time: Fp,
    pub point: Vec2,
    /// Outward surface normal at the contact. Zero if the query began overlapping.
    pub normal: Vec2,
}
impl Hit {
    pub const MISS: Hit = Hit {
        hit: false,
        time: 1.0,
        point: Vec2::ZERO,
        normal: Vec2::ZERO,
    };

    #[inline]
    pub fn new(time: Fp, point: Vec2, normal: Vec2) -> Hit {
        Hit { hit: true, time, point, normal }
    }
    #[inline]
    pub fn overlapping(point: Vec2) -> Hit {
        //! A contact at the very start of the query, where no normal applies.
        Hit::new(0.0, point, Vec2::ZERO)
    }

    pub fn compare(&self, other: &Hit) -> Ordering {
        //! Orders by how early the contact occurs. Misses come after every hit.
        match (self.hit, other.hit) {
            (true, true) => self.time.partial_cmp(&other.time).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
    #[inline]
    pub fn earliest(self, other: Hit) -> Hit {
        //! Returns the earlier of both hits, keeping `self` on ties.
        if other.compare(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }
}
impl Default for Hit {
    fn default() -> Self {
        Hit::MISS
    }
}

// ---------- Slab ---------- //

/// The range of segment times spent between one axis' pair of bounding planes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Span {
    /// Parallel to the slab and inside it: no constraint on time.
    Unbounded,
    Bounded { entry: Fp, exit: Fp },
}
impl Span {
    #[inline]
    fn of(from: Fp, delta: Fp, lower: Fp, upper: Fp) -> Option<Span> {
        //! Returns `None` if the segment runs parallel to the slab, outside of it.
        if delta == 0.0 {
            if lower < from && from < upper {
                Some(Span::Unbounded)
            } else {
                None
            }
        } else if delta > 0.0 {
            Some(Span::Bounded { entry: (lower - from) / delta, exit: (upper - from) / delta })
        } else {
            Some(Span::Bounded { entry: (upper - from) / delta, exit: (lower - from) / delta })
        }
    }

    #[inline]
    fn entry(self) -> Option<Fp> {
        match self {
            Span::Bounded { entry, .. } => Some(entry),
            Span::Unbounded => None,
        }
    }
    #[inline]
    fn exit(self) -> Option<Fp> {
        match self {
            Span::Bounded { exit, .. } => Some(exit),
            Span::Unbounded => None,
        }
    }
}

#[inline]
fn enters_before_exit(a: Span, b: Span) -> bool {
    //! Whether `b` is not exited before `a` is entered.
    match (a.entry(), b.exit()) {
        (Some(entry), Some(exit)) => exit >= entry,
        _ => true,
    }
}
#[inline]
fn latest(a: Option<Fp>, b: Option<Fp>) -> Option<Fp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(Fp::max(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}
#[inline]
fn soonest(a: Option<Fp>, b: Option<Fp>) -> Option<Fp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(Fp::min(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

// ---------- Primitives ---------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: Fp,
}
impl Circle {
    #[inline]
    pub fn new(center: Vec2, radius: Fp) -> Circle {
        Circle { center, radius: radius.abs() }
    }
    pub fn try_new(center: Vec2, radius: Fp) -> Result<Circle> {
        //! Rejects negative or non-finite input instead of correcting it.
        if !center.is_finite() || !radius.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if radius < 0.0 {
            return Err(ShapeError::NegativeRadius(radius));
        }
        Ok(Circle { center, radius })
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Circle {
        Circle { center: self.center + offset, radius: self.radius }
    }
}

/// An axis-aligned box, stored as its center and full width/height.
///
/// Bounds are derived: `top` is the lesser y bound, `bottom` the greater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}
impl Aabb {
    #[inline]
    pub fn new(center: Vec2, size: Vec2) -> Aabb {
        Aabb { center, size: size.abs() }
    }
    pub fn try_new(center: Vec2, size: Vec2) -> Result<Aabb> {
        //! Rejects negative or non-finite input instead of correcting it.
        if !center.is_finite() || !size.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if size.x < 0.0 || size.y < 0.0 {
            return Err(ShapeError::NegativeSize(size.x, size.y));
        }
        Ok(Aabb { center, size })
    }
    pub fn from_min_max(a: Vec2, b: Vec2) -> Aabb {
        //! Orders minimum and maximum values.
        let min = a.min(b);
        let max = a.max(b);
        Aabb { center: (min + max) * 0.5, size: max - min }
    }

    #[inline]
    pub fn half_size(self) -> Vec2 {
        self.size * 0.5
    }
    #[inline]
    pub fn left(self) -> Fp {
        self.center.x - self.size.x * 0.5
    }
    #[inline]
    pub fn right(self) -> Fp {
        self.center.x + self.size.x * 0.5
    }
    #[inline]
    pub fn top(self) -> Fp {
        self.center.y - self.size.y * 0.5
    }
    #[inline]
    pub fn bottom(self) -> Fp {
        self.center.y + self.size.y * 0.5
    }
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }
    #[inline]
    pub fn minx_maxy(self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }
    #[inline]
    pub fn maxx_miny(self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Aabb {
        Aabb { center: self.center + offset, size: self.size }
    }
    #[inline]
    pub fn pad(self, extra: Vec2) -> Aabb {
        //! Grows the box about its center by `extra` in total width and height.
        Aabb { center: self.center, size: self.size + extra }
    }
    #[inline]
    pub fn broaden(&self, dir: Vec2) -> Aabb {
        //! Returns the box covering `self` over its displacement along `dir`.
        let (min, max) = (self.min(), self.max());
        Aabb::from_min_max(min.min(min + dir), max.max(max + dir))
    }
}

// ---------- Shape-Shape intersection tests ---------- //

fn aabb_circle_test(aabb: &Aabb, &Circle { center, radius }: &Circle) -> bool {
    // closest point of the box to the circle's center
    let (min, max) = (aabb.min(), aabb.max());
    let closest = Vec2::new(center.x.max(min.x).min(max.x), center.y.max(min.y).min(max.y));
    (center - closest).length_squared() <= radius * radius
}

// ---------- Intersect ---------- //

pub trait Intersect {
    fn bounding_box(&self) -> Aabb;

    /// Strict containment: points on the boundary are outside.
    fn contains(&self, point: Vec2) -> bool;
    /// Earliest entry of the segment `a->b` into the shape.
    fn line_query(&self, a: Vec2, b: Vec2) -> Hit;

    fn circle_test(&self, circle: &Circle) -> bool;
    fn aabb_test(&self, aabb: &Aabb) -> bool;
}

impl Intersect for Circle {
    #[inline]
    fn bounding_box(&self) -> Aabb {
        Aabb { center: self.center, size: Vec2::splat(self.radius * 2.0) }
    }

    #[inline]
    fn contains(&self, point: Vec2) -> bool {
        (point - self.center).length_squared() < self.radius * self.radius
    }
    fn line_query(&self, a: Vec2, b: Vec2) -> Hit {
        //! Solves for the times at which `a->b` crosses the circle and reports the first
        //! within `[0, 1]`.
        //! Segments passing entirely outside, falling short or lying wholly within the circle miss.
        let ab = b - a;
        let ca = a - self.center;
        let rad2 = self.radius * self.radius;

        let qa = ab.dot(ab);
        if qa == 0.0 {
            log::trace!("zero-length segment at {:?} against circle at {:?}", a, self.center);
            return if ca.length_squared() <= rad2 { Hit::overlapping(a) } else { Hit::MISS };
        }
        let qb = 2.0 * ca.dot(ab);
        let qc = ca.dot(ca) - rad2;

        let mut discr = qb * qb - 4.0 * qa * qc;
        if discr < 0.0 {
            // tangent segments round to either side of zero
            if discr < -Fp::EPSILON * 32.0 * (qb * qb + 4.0 * qa * qc.abs()) {
                return Hit::MISS;
            }
            discr = 0.0;
        }
        let root = discr.sqrt();
        let t1 = (-qb - root) / (2.0 * qa);
        let t2 = (-qb + root) / (2.0 * qa);

        match [t1, t2].iter().copied().find(|t| (0.0..=1.0).contains(t)) {
            Some(t) => {
                let point = a + ab * t;
                Hit::new(t, point, (point - self.center).normalize_or_zero())
            }
            None => Hit::MISS,
        }
    }

    #[inline]
    fn circle_test(&self, c: &Circle) -> bool {
        (self.radius + c.radius) * (self.radius + c.radius)
            >= (self.center - c.center).length_squared()
    }
    #[inline]
    fn aabb_test(&self, aabb: &Aabb) -> bool {
        aabb_circle_test(aabb, self)
    }
}
impl Intersect for Aabb {
    #[inline]
    fn bounding_box(&self) -> Aabb {
        *self
    }

    #[inline]
    fn contains(&self, point: Vec2) -> bool {
        self.left() < point.x
            && point.x < self.right()
            && self.top() < point.y
            && point.y < self.bottom()
    }
    fn line_query(&self, a: Vec2, b: Vec2) -> Hit {
        //! Slab test of the segment `a->b`. A segment starting inside hits immediately.
        if self.contains(a) {
            return Hit::overlapping(a);
        }

        let ab = b - a;
        let (min, max) = (self.min(), self.max());
        let (x, y) = match (Span::of(a.x, ab.x, min.x, max.x), Span::of(a.y, ab.y, min.y, max.y)) {
            (Some(x), Some(y)) => (x, y),
            _ => return Hit::MISS, // parallel to a slab, outside of it
        };

        // both slabs unconstrained means `a` is strictly inside, which returned above
        let (entry, exit) = match (latest(x.entry(), y.entry()), soonest(x.exit(), y.exit())) {
            (Some(entry), Some(exit)) => (entry, exit),
            _ => return Hit::MISS,
        };
        if entry > exit
            || entry < 0.0
            || entry > 1.0
            || !enters_before_exit(x, y)
            || !enters_before_exit(y, x)
        {
            return Hit::MISS;
        }

        // the axis entered last is the face struck, x only when strictly later
        let x_face = match (x, y) {
            (Span::Bounded { entry: ex, .. }, Span::Bounded { entry: ey, .. }) => ex > ey,
            (Span::Bounded { .. }, Span::Unbounded) => true,
            _ => false,
        };
        let normal = if x_face {
            Vec2::new(-ab.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, -ab.y.signum())
        };
        Hit::new(entry, a + ab * entry, normal)
    }

    #[inline]
    fn circle_test(&self, circle: &Circle) -> bool {
        aabb_circle_test(self, circle)
    }
    #[inline]
    fn aabb_test(&self, other: &Aabb) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }
}

// ---------- Shape ---------- //

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Aabb(Aabb),
    Circle(Circle),
}
impl Shape {
    #[inline]
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Aabb(a) => a.center,
            Shape::Circle(c) => c.center,
        }
    }
    #[inline]
    pub fn translate(self, offset: Vec2) -> Shape {
        match self {
            Shape::Aabb(a) => Shape::Aabb(a.translate(offset)),
            Shape::Circle(c) => Shape::Circle(c.translate(offset)),
        }
    }

    pub fn overlaps(&self, other: &Shape) -> bool {
        //! Static, inclusive overlap between two shapes.
        match other {
            Shape::Aabb(a) => self.aabb_test(a),
            Shape::Circle(c) => self.circle_test(c),
        }
    }
}
impl Intersect for Shape {
    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Aabb(a) => *a,
            Shape::Circle(c) => c.bounding_box(),
        }
    }

    fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Aabb(a) => a.contains(point),
            Shape::Circle(c) => c.contains(point),
        }
    }
    fn line_query(&self, a: Vec2, b: Vec2) -> Hit {
        match self {
            Shape::Aabb(aabb) => aabb.line_query(a, b),
            Shape::Circle(c) => c.line_query(a, b),
        }
    }

    fn circle_test(&self, circle: &Circle) -> bool {
        match self {
            Shape::Aabb(a) => a.circle_test(circle),
            Shape::Circle(c) => c.circle_test(circle),
        }
    }
    fn aabb_test(&self, aabb: &Aabb) -> bool {
        match self {
            Shape::Aabb(a) => a.aabb_test(aabb),
            Shape::Circle(c) => c.aabb_test(aabb),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Aabb> for Shape {
    fn from(aabb: Aabb) -> Self {
        Shape::Aabb(aabb)
    }
}
