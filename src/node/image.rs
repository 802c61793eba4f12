use log::debug;

use super::error::{BuildError, DrawError};
use super::region::Region;
use super::{Leaves, Partition, QuadtreeNode, Stats};

/// Splits regions whose error is above `threshold`, as long as both halves
/// of the split stay larger than `min_size`.
#[derive(Clone, Copy, Debug)]
pub struct ErrorPartition<'a> {
	pub image: &'a image::RgbImage,
	pub threshold: f64,
	pub min_size: u32,
}

impl Partition for ErrorPartition<'_> {
	type Cell = Region;

	fn split(&self, region: &Region) -> Option<[Region; 4]> {
		// A region exactly at the threshold is uniform enough.
		if region.error(self.image) <= self.threshold {
			return None;
		}
		let ((w_1, _), (h_1, _)) = region.halves();
		if w_1 <= self.min_size || h_1 <= self.min_size {
			return None;
		}
		Some(region.quadrants())
	}
}

/// Rectangle outline drawn around every leaf when rendering.
///
/// A thickness of zero draws nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
	pub thickness: u32,
	pub color: image::Rgb<u8>,
}

impl Outline {
	pub fn none() -> Self {
		Self { thickness: 0, ..Default::default() }
	}
}

impl Default for Outline {
	fn default() -> Self {
		Self { thickness: 1, color: image::Rgb([255, 0, 0]) }
	}
}

/// Quadtree approximating an image by regions of flat color.
#[derive(Clone, Debug)]
pub struct Quadtree<'a> {
	image: &'a image::RgbImage,
	threshold: f64,
	min_size: u32,
	root: QuadtreeNode<Region>,
}

impl<'a> Quadtree<'a> {
	/// Decomposes `image` into regions whose error is at most `threshold`,
	/// or whose sides cannot be halved without going down to `min_size`.
	///
	/// Lower thresholds give finer partitions. Building is deterministic:
	/// the same inputs always give the same tree.
	pub fn build(
		image: &'a image::RgbImage,
		threshold: f64,
		min_size: u32
	) -> Result<Self, BuildError> {
		if image.width() == 0 || image.height() == 0 {
			return Err(BuildError::EmptyImage { width: image.width(), height: image.height() });
		}
		if threshold.is_nan() || threshold < 0. {
			return Err(BuildError::InvalidThreshold(threshold));
		}
		let partition = ErrorPartition { image, threshold, min_size };
		let root = QuadtreeNode::grow(Region::full(image.width(), image.height()), &partition);
		debug!(
			"built quadtree over {}x{} image (threshold {}, min size {}): {} nodes, depth {}",
			image.width(), image.height(), threshold, min_size, root.node_count(), root.depth()
		);
		Ok(Self { image, threshold, min_size, root })
	}

	pub fn image(&self) -> &'a image::RgbImage {
		self.image
	}

	pub fn threshold(&self) -> f64 {
		self.threshold
	}

	pub fn min_size(&self) -> u32 {
		self.min_size
	}

	pub fn root(&self) -> &QuadtreeNode<Region> {
		&self.root
	}

	pub fn leaves(&self) -> Leaves<'_, Region> {
		self.root.leaves()
	}

	pub fn stats(&self) -> Stats<u64> {
		self.root.stats()
	}

	/// Encodes the partition, without colors; see `QuadtreeNode::to_shape`.
	pub fn to_shape(&self) -> Vec<u8> {
		self.root.to_shape()
	}

	/// Paints every leaf with its mean color, then draws `outline` around
	/// each leaf. The source image is left untouched.
	pub fn render(&self, outline: &Outline) -> image::RgbImage {
		paint(self.image, self.leaves(), outline)
	}
}

/// Renders arbitrary leaf regions against `img`, for trees that were not
/// built from `img` (a decoded partition shape, for instance).
///
/// Fails without drawing anything if a region is empty or reaches outside
/// the image.
pub fn render_leaves<'r, I>(
	img: &image::RgbImage,
	leaves: I,
	outline: &Outline
) -> Result<image::RgbImage, DrawError>
where
	I: IntoIterator<Item = &'r Region>,
	I::IntoIter: Clone,
{
	let leaves = leaves.into_iter();
	if let Some(bad) = leaves.clone().find(|r| r.is_empty() || !r.fits(img.width(), img.height())) {
		return Err(DrawError::OutOfBounds(*bad));
	}
	Ok(paint(img, leaves, outline))
}

fn paint<'r, I>(img: &image::RgbImage, leaves: I, outline: &Outline) -> image::RgbImage
where
	I: Iterator<Item = &'r Region> + Clone,
{
	let mut out = img.clone();
	for leaf in leaves.clone() {
		image::imageops::replace(
			&mut out,
			&image::RgbImage::from_pixel(leaf.width, leaf.height, leaf.mean_color(img)),
			leaf.col,
			leaf.row,
		);
	}
	// Outlines go on last so no fill covers a neighbour's border.
	if outline.thickness > 0 {
		for leaf in leaves {
			draw_outline(&mut out, leaf, outline);
		}
	}
	out
}

/// Draws a band `thickness` pixels wide just inside each edge of `region`.
fn draw_outline(img: &mut image::RgbImage, region: &Region, outline: &Outline) {
	let t_h = outline.thickness.min(region.height);
	let t_w = outline.thickness.min(region.width);
	let horizontal = image::RgbImage::from_pixel(region.width, t_h, outline.color);
	let vertical = image::RgbImage::from_pixel(t_w, region.height, outline.color);
	image::imageops::replace(img, &horizontal, region.col, region.row);
	image::imageops::replace(img, &horizontal, region.col, region.row + region.height - t_h);
	image::imageops::replace(img, &vertical, region.col, region.row);
	image::imageops::replace(img, &vertical, region.col + region.width - t_w, region.row);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn checker(width: u32, height: u32) -> image::RgbImage {
		image::RgbImage::from_fn(width, height, |x, y| {
			if (x + y) % 2 == 0 { image::Rgb([0, 0, 0]) } else { image::Rgb([255, 255, 255]) }
		})
	}

	#[test]
	fn split_stops_at_threshold() {
		let img = checker(8, 8);
		let root = Region::full(8, 8);
		let err = root.error(&img);
		let at = ErrorPartition { image: &img, threshold: err, min_size: 0 };
		assert!(at.split(&root).is_none());
		let below = ErrorPartition { image: &img, threshold: err * 0.999, min_size: 0 };
		assert_eq!(below.split(&root), Some(root.quadrants()));
	}

	#[test]
	fn split_stops_at_min_size() {
		let img = checker(9, 8);
		let root = Region::full(9, 8);
		// floor(9 / 2) = 4, floor(8 / 2) = 4
		let forced = ErrorPartition { image: &img, threshold: 0., min_size: 4 };
		assert!(forced.split(&root).is_none());
		let free = ErrorPartition { image: &img, threshold: 0., min_size: 3 };
		assert!(free.split(&root).is_some());
	}

	#[test]
	fn rejects_empty_image() {
		let img = image::RgbImage::new(0, 5);
		assert_eq!(
			Quadtree::build(&img, 1., 1).unwrap_err(),
			BuildError::EmptyImage { width: 0, height: 5 }
		);
	}

	#[test]
	fn rejects_bad_threshold() {
		let img = checker(4, 4);
		assert!(matches!(Quadtree::build(&img, -1., 1), Err(BuildError::InvalidThreshold(_))));
		assert!(matches!(Quadtree::build(&img, f64::NAN, 1), Err(BuildError::InvalidThreshold(_))));
	}

	#[test]
	fn min_size_zero_bottoms_out_at_single_pixels() {
		let img = checker(4, 4);
		let tree = Quadtree::build(&img, 0., 0).unwrap();
		assert_eq!(tree.stats().leaf_count, 16);
		assert_eq!(tree.stats().min_leaf_area, 1);
		assert_eq!(tree.render(&Outline::none()), img);
	}

	#[test]
	fn outline_is_drawn_inside_leaf() {
		let img = image::RgbImage::from_pixel(5, 4, image::Rgb([9, 9, 9]));
		let tree = Quadtree::build(&img, 0., 1).unwrap();
		let red = image::Rgb([255, 0, 0]);
		let out = tree.render(&Outline::default());
		for (x, y, px) in out.enumerate_pixels() {
			let border = x == 0 || y == 0 || x == 4 || y == 3;
			assert_eq!(*px, if border { red } else { image::Rgb([9, 9, 9]) }, "at ({}, {})", x, y);
		}
	}

	#[test]
	fn thick_outline_is_clamped_to_leaf() {
		let img = image::RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]));
		let tree = Quadtree::build(&img, 0., 1).unwrap();
		let blue = image::Rgb([0, 0, 255]);
		let out = tree.render(&Outline { thickness: 10, color: blue });
		assert!(out.pixels().all(|px| *px == blue));
	}

	#[test]
	fn render_leaves_rejects_foreign_regions() {
		let img = checker(4, 4);
		let regions = [Region::full(4, 4), Region::new(2, 2, 4, 4)];
		assert_eq!(
			render_leaves(&img, regions.iter(), &Outline::none()).unwrap_err(),
			DrawError::OutOfBounds(Region::new(2, 2, 4, 4))
		);
	}
}
