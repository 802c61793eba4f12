pub mod error;
pub mod region;

/// Node in a quadtree.
///
/// Every node carries a cell describing the part of the plane it covers.
/// It may contain four subsections tiling that cell (branch node) or none
/// (leaf node). Subsections are always stored in the order top-left,
/// bottom-left, top-right, bottom-right.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeNode<T> {
	pub cell: T,
	pub sections: Option<Box<[QuadtreeNode<T>; 4]>>,
}

/// Decides whether a cell is split, and how.
///
/// The same tree logic serves every kind of quadtree in this crate; only
/// the stopping rule and the payload carried by a cell differ.
pub trait Partition {
	type Cell;

	/// Returns the four quadrants of `cell` (top-left, bottom-left,
	/// top-right, bottom-right), or `None` if `cell` must stay a leaf.
	fn split(&self, cell: &Self::Cell) -> Option<[Self::Cell; 4]>;
}

/// Cells that have a measurable area, for reporting statistics.
pub trait Measure {
	type Area: PartialOrd + Copy;

	fn area(&self) -> Self::Area;
}

/// Summary of a built tree, for diagnostic reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats<A> {
	pub leaf_count: usize,
	pub min_leaf_area: A,
	pub depth: usize,
}

impl<T> QuadtreeNode<T> {
	/// Creates a node with no subsections.
	pub fn leaf(cell: T) -> Self {
		Self { cell, sections: None }
	}

	/// Recursively subdivides `cell` as long as `partition` allows it.
	///
	/// Subsections are grown depth-first in the fixed quadrant order, so
	/// growing twice from the same inputs yields identical trees.
	pub fn grow<P: Partition<Cell = T>>(cell: T, partition: &P) -> Self {
		let sections = partition.split(&cell).map(|quads| {
			let [top_left, bottom_left, top_right, bottom_right] = quads;
			Box::new([
				Self::grow(top_left, partition),
				Self::grow(bottom_left, partition),
				Self::grow(top_right, partition),
				Self::grow(bottom_right, partition),
			])
		});
		Self { cell, sections }
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}

	/// Iterates over the cells of all leaf nodes, depth-first, in quadrant
	/// order.
	pub fn leaves(&self) -> Leaves<'_, T> {
		Leaves { stack: vec![self] }
	}

	/// Number of nodes in the tree, branches included.
	pub fn node_count(&self) -> usize {
		1 + self.sections.as_ref()
			.map(|sects| sects.iter().map(QuadtreeNode::node_count).sum::<usize>())
			.unwrap_or(0)
	}

	/// Length of the longest path from this node down to a leaf.
	pub fn depth(&self) -> usize {
		self.sections.as_ref()
			.map(|sects| 1 + sects.iter().map(QuadtreeNode::depth).max().unwrap_or(0))
			.unwrap_or(0)
	}
}

impl<T: Measure> QuadtreeNode<T> {
	pub fn stats(&self) -> Stats<T::Area> {
		let mut leaves = self.leaves();
		// There is always at least one leaf; `leaves` starts from `self`.
		let first = leaves.next().map(Measure::area).unwrap_or_else(|| self.cell.area());
		let (leaf_count, min_leaf_area) = leaves.fold((1, first), |(n, min), cell| {
			let area = cell.area();
			(n + 1, if area < min { area } else { min })
		});
		Stats { leaf_count, min_leaf_area, depth: self.depth() }
	}
}

/// Depth-first iterator over leaf cells, created by
/// [`QuadtreeNode::leaves`].
#[derive(Clone, Debug)]
pub struct Leaves<'a, T> {
	stack: Vec<&'a QuadtreeNode<T>>,
}

impl<'a, T> Iterator for Leaves<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		while let Some(node) = self.stack.pop() {
			match &node.sections {
				Some(sects) => self.stack.extend(sects.iter().rev()),
				None => return Some(&node.cell),
			}
		}
		None
	}
}

pub mod image;
pub mod points;
pub mod shape;

#[cfg(test)]
mod tests {
	use super::*;

	/// Splits integer spans in half until they are a single unit wide.
	struct Halve;

	impl Partition for Halve {
		type Cell = (u32, u32);

		fn split(&self, cell: &(u32, u32)) -> Option<[(u32, u32); 4]> {
			let (start, len) = *cell;
			if len <= 1 {
				return None;
			}
			let half = len / 2;
			Some([(start, half), (start + half, half), (start + 2 * half, half), (start + 3 * half, half)])
		}
	}

	impl Measure for (u32, u32) {
		type Area = u32;

		fn area(&self) -> u32 {
			self.1
		}
	}

	#[test]
	fn leaf_has_no_sections() {
		let node = QuadtreeNode::leaf((0, 4));
		assert!(node.is_leaf());
		assert_eq!(node.leaves().collect::<Vec<_>>(), vec![&(0, 4)]);
		assert_eq!(node.node_count(), 1);
		assert_eq!(node.depth(), 0);
	}

	#[test]
	fn leaves_follow_quadrant_order() {
		let tree = QuadtreeNode::grow((0, 2), &Halve);
		let starts = tree.leaves().map(|c| c.0).collect::<Vec<_>>();
		assert_eq!(starts, vec![0, 1, 2, 3]);
	}

	#[test]
	fn leaves_descend_before_moving_on() {
		let tree = QuadtreeNode::grow((0, 4), &Halve);
		assert_eq!(tree.node_count(), 1 + 4 + 16);
		assert_eq!(tree.depth(), 2);
		let starts = tree.leaves().map(|c| c.0).collect::<Vec<_>>();
		// The first quadrant (start 0, len 2) is exhausted before the second.
		assert_eq!(&starts[..4], &[0, 1, 2, 3]);
		assert_eq!(&starts[4..8], &[2, 3, 4, 5]);
	}

	#[test]
	fn leaves_are_restartable() {
		let tree = QuadtreeNode::grow((0, 4), &Halve);
		let first = tree.leaves().collect::<Vec<_>>();
		let second = tree.leaves().collect::<Vec<_>>();
		assert_eq!(first, second);
	}

	#[test]
	fn stats_report_smallest_leaf() {
		let tree = QuadtreeNode::grow((0, 4), &Halve);
		let stats = tree.stats();
		assert_eq!(stats.leaf_count, 16);
		assert_eq!(stats.min_leaf_area, 1);
		assert_eq!(stats.depth, 2);
	}
}
