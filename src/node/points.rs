//! Quadtree over scattered points.
//!
//! Same quartering as the image quadtree, but a cell is split while it
//! holds more than a fixed number of points, and leaves carry the points
//! themselves rather than a window into an image.

use super::{Leaves, Measure, Partition, QuadtreeNode, Stats};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned rectangle in the plane, `y` growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self { x, y, width, height }
	}

	/// Edges are inclusive, so points on the far edges of the root are kept.
	pub fn contains(&self, p: &Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width &&
			p.y >= self.y && p.y <= self.y + self.height
	}

	fn center(&self) -> Point {
		Point::new(self.x + self.width / 2., self.y + self.height / 2.)
	}

	/// Top-left, bottom-left, top-right and bottom-right halves.
	fn quadrants(&self) -> [Bounds; 4] {
		let (w, h) = (self.width / 2., self.height / 2.);
		[
			Bounds::new(self.x, self.y, w, h),
			Bounds::new(self.x, self.y + h, w, h),
			Bounds::new(self.x + w, self.y, w, h),
			Bounds::new(self.x + w, self.y + h, w, h),
		]
	}
}

/// A cell of the point quadtree and the points that fall inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCell {
	pub bounds: Bounds,
	pub points: Vec<Point>,
	pub depth: usize,
}

impl Measure for PointCell {
	type Area = f64;

	fn area(&self) -> f64 {
		self.bounds.width * self.bounds.height
	}
}

/// Splits cells holding more than `capacity` points, down to `max_depth`.
#[derive(Clone, Copy, Debug)]
pub struct CountPartition {
	pub capacity: usize,
	pub max_depth: usize,
}

impl Partition for CountPartition {
	type Cell = PointCell;

	fn split(&self, cell: &PointCell) -> Option<[PointCell; 4]> {
		if cell.points.len() <= self.capacity || cell.depth >= self.max_depth {
			return None;
		}
		let mid = cell.bounds.center();
		let mut quads = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];
		for p in &cell.points {
			// Quadrant index follows the split order: bit 0 is bottom, bit 1 is right.
			let ind = (p.y >= mid.y) as usize | ((p.x >= mid.x) as usize) << 1;
			quads[ind].push(*p);
		}
		let [b_0, b_1, b_2, b_3] = cell.bounds.quadrants();
		let [p_0, p_1, p_2, p_3] = quads;
		let depth = cell.depth + 1;
		Some([
			PointCell { bounds: b_0, points: p_0, depth },
			PointCell { bounds: b_1, points: p_1, depth },
			PointCell { bounds: b_2, points: p_2, depth },
			PointCell { bounds: b_3, points: p_3, depth },
		])
	}
}

/// Quadtree that partitions points until no leaf holds more than
/// `capacity` of them.
#[derive(Clone, Debug)]
pub struct PointQuadtree {
	capacity: usize,
	root: QuadtreeNode<PointCell>,
}

impl PointQuadtree {
	/// Default bound on subdivision depth, deep enough that only coincident
	/// points ever reach it.
	pub const MAX_DEPTH: usize = 32;

	/// Builds the tree over the points inside `bounds`; points outside are
	/// dropped.
	pub fn build(bounds: Bounds, points: &[Point], capacity: usize) -> Self {
		Self::build_with_depth(bounds, points, capacity, Self::MAX_DEPTH)
	}

	pub fn build_with_depth(
		bounds: Bounds,
		points: &[Point],
		capacity: usize,
		max_depth: usize
	) -> Self {
		let points = points.iter().filter(|p| bounds.contains(p)).copied().collect();
		let root = QuadtreeNode::grow(
			PointCell { bounds, points, depth: 0 },
			&CountPartition { capacity, max_depth },
		);
		Self { capacity, root }
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn root(&self) -> &QuadtreeNode<PointCell> {
		&self.root
	}

	pub fn leaves(&self) -> Leaves<'_, PointCell> {
		self.root.leaves()
	}

	pub fn stats(&self) -> Stats<f64> {
		self.root.stats()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	fn unit() -> Bounds {
		Bounds::new(0., 0., 10., 10.)
	}

	#[test]
	fn few_points_stay_in_root() {
		let pts = [Point::new(1., 1.), Point::new(9., 9.)];
		let tree = PointQuadtree::build(unit(), &pts, 2);
		assert!(tree.root().is_leaf());
		assert_eq!(tree.stats().leaf_count, 1);
		assert_eq!(tree.stats().min_leaf_area, 100.);
	}

	#[test]
	fn points_land_in_matching_quadrant() {
		let pts = [
			Point::new(1., 1.),
			Point::new(1., 9.),
			Point::new(9., 1.),
			Point::new(9., 9.),
			Point::new(5., 5.),
		];
		let tree = PointQuadtree::build(unit(), &pts, 1);
		let sects = tree.root().sections.as_ref().unwrap();
		assert_eq!(sects[0].cell.points, vec![Point::new(1., 1.)]);
		assert_eq!(sects[1].cell.points, vec![Point::new(1., 9.)]);
		assert_eq!(sects[2].cell.points, vec![Point::new(9., 1.)]);
		// The midpoint goes right and down.
		assert_eq!(sects[3].cell.points.len(), 2);
		assert!(!sects[3].is_leaf());
	}

	#[test]
	fn every_point_is_in_exactly_one_leaf() {
		let mut rng = StdRng::seed_from_u64(17);
		let pts = (0..500)
			.map(|_| Point::new(rng.random_range(0.0..=10.0), rng.random_range(0.0..=10.0)))
			.collect::<Vec<_>>();
		let tree = PointQuadtree::build(unit(), &pts, 4);
		let total: usize = tree.leaves().map(|c| c.points.len()).sum();
		assert_eq!(total, pts.len());
		for cell in tree.leaves() {
			assert!(cell.points.len() <= 4);
			assert!(cell.points.iter().all(|p| cell.bounds.contains(p)));
		}
	}

	#[test]
	fn coincident_points_stop_at_max_depth() {
		let pts = vec![Point::new(3., 3.); 10];
		let tree = PointQuadtree::build_with_depth(unit(), &pts, 1, 5);
		assert_eq!(tree.stats().depth, 5);
		assert!(tree.leaves().any(|c| c.points.len() == 10));
	}

	#[test]
	fn outside_points_are_dropped() {
		let pts = [Point::new(-1., 5.), Point::new(5., 11.), Point::new(5., 5.)];
		let tree = PointQuadtree::build(unit(), &pts, 1);
		let total: usize = tree.leaves().map(|c| c.points.len()).sum();
		assert_eq!(total, 1);
	}
}
