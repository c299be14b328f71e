//! Geometry helpers on top of kurbo primitives.
//!
//! Paper, pane, client and page coordinates are all expressed with
//! [`kurbo::Point`], [`kurbo::Vec2`], [`kurbo::Size`] and [`kurbo::Rect`].
//! This module adds the few operations whose semantics differ from kurbo's
//! (zero-length normalization, edge-inclusive intersection) and the polyline
//! utilities used by content strategies.

use kurbo::{Point, Rect, Size, Vec2};

/// Normalize a vector to unit length.
///
/// A zero vector normalizes to itself instead of producing NaN.
pub fn normalize(v: Vec2) -> Vec2 {
    if v.x == 0.0 && v.y == 0.0 {
        return v;
    }
    let inverse_length = 1.0 / v.hypot();
    Vec2::new(v.x * inverse_length, v.y * inverse_length)
}

/// 2D cross product (z component of the 3D cross product).
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Point halfway between `a` and `b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Returns `true` if two rectangles intersect.
///
/// Rectangles sharing only an edge or a corner are considered intersecting.
pub fn intersects(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && a.y0 <= b.y1 && b.x0 <= a.x1 && b.y0 <= a.y1
}

/// Expand a rectangle by `padding` on all four sides.
pub fn pad_rect(rect: Rect, padding: f64) -> Rect {
    Rect::new(
        rect.x0 - padding,
        rect.y0 - padding,
        rect.x1 + padding,
        rect.y1 + padding,
    )
}

/// Largest size with the aspect ratio of `source` that fits into the target.
///
/// Either target dimension may be omitted, in which case it is derived from
/// the other one. With no target at all the source size is returned as is.
pub fn fit_rect_keeping_aspect_ratio(
    source: Size,
    target_width: Option<f64>,
    target_height: Option<f64>,
) -> Size {
    let aspect_ratio = source.width / source.height;
    let (target_width, target_height) = match (target_width, target_height) {
        (None, None) => return source,
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, w / aspect_ratio),
        (None, Some(h)) => (h * aspect_ratio, h),
    };
    if target_height * aspect_ratio <= target_width {
        Size::new(target_height * aspect_ratio, target_height)
    } else {
        Size::new(target_width, target_width / aspect_ratio)
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point located at `distance` along a polyline from its first vertex.
///
/// Distances outside the polyline are clamped to its ends.
/// Returns `None` for an empty polyline.
pub fn point_at_length(points: &[Point], distance: f64) -> Option<Point> {
    let first = *points.first()?;
    if distance <= 0.0 {
        return Some(first);
    }
    let mut remaining = distance;
    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let length = start.distance(end);
        if remaining <= length {
            if length == 0.0 {
                return Some(start);
            }
            return Some(start.lerp(end, remaining / length));
        }
        remaining -= length;
    }
    points.last().copied()
}

/// Axis-aligned bounding box of a set of points.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let rect = rest
        .iter()
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p));
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        let v = normalize(Vec2::ZERO);
        assert_eq!(v, Vec2::ZERO);
        assert!(!v.x.is_nan());
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(Vec2::new(3.0, 4.0));
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!((v.y - 0.8).abs() < 1e-12);
        assert!((v.hypot() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_and_dot() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!((cross(a, b) - 1.0).abs() < f64::EPSILON);
        assert!((cross(b, a) + 1.0).abs() < f64::EPSILON);
        assert!(a.dot(b).abs() < f64::EPSILON);
    }

    #[test]
    fn test_intersects_edge_touching() {
        let a = Rect::from_origin_size((0.0, 0.0), (10.0, 10.0));
        let b = Rect::from_origin_size((10.0, 0.0), (10.0, 10.0));
        let c = Rect::from_origin_size((10.5, 0.0), (10.0, 10.0));
        assert!(intersects(a, b));
        assert!(intersects(b, a));
        assert!(!intersects(a, c));
    }

    #[test]
    fn test_rect_center_and_padding() {
        let rect = Rect::from_origin_size((100.0, 100.0), (50.0, 50.0));
        assert_eq!(rect.center(), Point::new(125.0, 125.0));
        let padded = pad_rect(rect, 20.0);
        assert!((padded.width() - 90.0).abs() < f64::EPSILON);
        assert!((padded.height() - 90.0).abs() < f64::EPSILON);
        assert_eq!(padded.center(), rect.center());
    }

    #[test]
    fn test_fit_rect_keeping_aspect_ratio() {
        let source = Size::new(200.0, 100.0);
        let fitted = fit_rect_keeping_aspect_ratio(source, Some(100.0), Some(100.0));
        assert!((fitted.width - 100.0).abs() < 1e-12);
        assert!((fitted.height - 50.0).abs() < 1e-12);

        let tall = fit_rect_keeping_aspect_ratio(source, Some(1000.0), Some(100.0));
        assert!((tall.width - 200.0).abs() < 1e-12);
        assert!((tall.height - 100.0).abs() < 1e-12);

        let by_height = fit_rect_keeping_aspect_ratio(source, None, Some(50.0));
        assert!((by_height.width - 100.0).abs() < 1e-12);

        assert_eq!(fit_rect_keeping_aspect_ratio(source, None, None), source);
    }

    #[test]
    fn test_polyline_operations() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert!((polyline_length(&points) - 20.0).abs() < 1e-12);

        let p = point_at_length(&points, 15.0).unwrap();
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 5.0).abs() < 1e-12);

        assert_eq!(point_at_length(&points, -3.0), Some(Point::new(0.0, 0.0)));
        assert_eq!(point_at_length(&points, 99.0), Some(Point::new(10.0, 10.0)));
        assert_eq!(point_at_length(&[], 1.0), None);

        let bbox = bounding_box(&points).unwrap();
        assert_eq!(bbox, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(bounding_box(&[]), None);
    }
}
