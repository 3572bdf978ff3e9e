//! Polyline route followed by every enemy.

use path_defence_core::FieldPoint;

const STANDARD_WAYPOINTS: [(i32, i32); 9] = [
    (50, 140),
    (250, 140),
    (450, 240),
    (350, 340),
    (150, 340),
    (150, 490),
    (400, 490),
    (650, 390),
    (750, 540),
];

/// Ordered waypoints describing the enemy route.
///
/// Waypoints are appended during setup only; the world never mutates the path
/// it was constructed with. Consecutive waypoints form the segments enemies
/// traverse. Zero-length segments are tolerated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    points: Vec<FieldPoint>,
}

impl Path {
    /// Creates an empty path ready to receive waypoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path from the provided waypoints.
    ///
    /// Returns `None` when fewer than two waypoints are supplied, since such a
    /// path has no segment to travel along.
    #[must_use]
    pub fn from_points(points: Vec<FieldPoint>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    /// Route used by the standard playing field.
    #[must_use]
    pub fn standard() -> Self {
        let mut path = Self::new();
        for (x, y) in STANDARD_WAYPOINTS {
            path.push(x, y);
        }
        path
    }

    /// Appends a waypoint to the end of the route.
    pub fn push(&mut self, x: i32, y: i32) {
        self.points.push(FieldPoint::new(x, y));
    }

    /// Waypoints in route order.
    #[must_use]
    pub fn points(&self) -> &[FieldPoint] {
        &self.points
    }

    /// Number of waypoints composing the route.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of segments between consecutive waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns the point at fraction `t` along the requested segment.
    ///
    /// Segment indices past the last segment are clamped onto it, so callers
    /// may query positions after logically finishing the route. Coordinates are
    /// truncated toward zero.
    #[must_use]
    pub fn interpolate(&self, segment: usize, t: f64) -> FieldPoint {
        match self.points.len() {
            0 => return FieldPoint::default(),
            1 => return self.points[0],
            _ => {}
        }

        let segment = segment.min(self.points.len() - 2);
        let start = self.points[segment];
        let end = self.points[segment + 1];

        let x = f64::from(start.x()) + f64::from(end.x() - start.x()) * t;
        let y = f64::from(start.y()) + f64::from(end.y() - start.y()) * t;
        FieldPoint::new(x as i32, y as i32)
    }

    /// Shortest Euclidean distance between `point` and any segment of the route.
    ///
    /// An empty path is infinitely far away from every point.
    #[must_use]
    pub fn distance_from(&self, point: FieldPoint) -> f64 {
        if let [only] = self.points.as_slice() {
            return (point.distance_squared(*only) as f64).sqrt();
        }

        self.points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Reports whether `point` lies strictly closer than `clearance` to the route.
    #[must_use]
    pub fn is_on_path(&self, point: FieldPoint, clearance: f64) -> bool {
        self.distance_from(point) < clearance
    }
}

fn distance_to_segment(point: FieldPoint, start: FieldPoint, end: FieldPoint) -> f64 {
    let px = f64::from(point.x());
    let py = f64::from(point.y());
    let x1 = f64::from(start.x());
    let y1 = f64::from(start.y());
    let along_x = f64::from(end.x()) - x1;
    let along_y = f64::from(end.y()) - y1;

    let length_squared = along_x * along_x + along_y * along_y;
    let (closest_x, closest_y) = if length_squared == 0.0 {
        (x1, y1)
    } else {
        let projection = ((px - x1) * along_x + (py - y1) * along_y) / length_squared;
        let clamped = projection.clamp(0.0, 1.0);
        (x1 + clamped * along_x, y1 + clamped * along_y)
    };

    let dx = px - closest_x;
    let dy = py - closest_y;
    (dx * dx + dy * dy).sqrt()
}
