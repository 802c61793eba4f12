use super::Measure;

/// Scale applied to the luma-weighted error so that a given threshold
/// behaves similarly across image resolutions.
pub const ERROR_SCALE: f64 = 90_000_000.;

/// Luma weights for the red, green and blue channels, in that order.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// An axis-aligned rectangle of pixels.
///
/// `row` and `col` locate the top-left corner; the region spans
/// `height` rows and `width` columns from there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
	pub row: u32,
	pub col: u32,
	pub width: u32,
	pub height: u32,
}

impl Region {
	pub fn new(row: u32, col: u32, width: u32, height: u32) -> Self {
		Self { row, col, width, height }
	}

	/// Region covering a whole `width` by `height` image.
	pub fn full(width: u32, height: u32) -> Self {
		Self::new(0, 0, width, height)
	}

	/// The (floor, ceil) halves of the width and of the height.
	pub fn halves(&self) -> ((u32, u32), (u32, u32)) {
		let w_1 = self.width / 2;
		let h_1 = self.height / 2;
		((w_1, self.width - w_1), (h_1, self.height - h_1))
	}

	/// Splits the region into top-left, bottom-left, top-right and
	/// bottom-right quadrants.
	///
	/// Odd sides are split floor/ceil, so the quadrants tile the region
	/// exactly. Quadrants may be empty if a side is shorter than 2.
	pub fn quadrants(&self) -> [Region; 4] {
		let ((w_1, w_2), (h_1, h_2)) = self.halves();
		[
			Region::new(self.row, self.col, w_1, h_1),
			Region::new(self.row + h_1, self.col, w_1, h_2),
			Region::new(self.row, self.col + w_1, w_2, h_1),
			Region::new(self.row + h_1, self.col + w_1, w_2, h_2),
		]
	}

	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// Whether the region lies entirely inside a `width` by `height` image.
	pub fn fits(&self, width: u32, height: u32) -> bool {
		self.col as u64 + self.width as u64 <= width as u64 &&
			self.row as u64 + self.height as u64 <= height as u64
	}

	pub fn contains(&self, row: u32, col: u32) -> bool {
		row >= self.row && row - self.row < self.height &&
			col >= self.col && col - self.col < self.width
	}

	/// Iterates over the `(x, y)` image coordinates inside the region,
	/// row by row.
	pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
		let (col, width) = (self.col, self.width);
		(self.row..self.row + self.height)
			.flat_map(move |y| (col..col + width).map(move |x| (x, y)))
	}

	/// Mean value of each channel over the region's window.
	///
	/// # Panics
	///
	/// Panics if the region is empty or reaches outside `img`.
	pub fn channel_means(&self, img: &image::RgbImage) -> [f64; 3] {
		self.check_window(img);
		let mut sums = [0u64; 3];
		for (x, y) in self.pixels() {
			let px = img.get_pixel(x, y);
			for c in 0..3 {
				sums[c] += px.0[c] as u64;
			}
		}
		let n = self.area() as f64;
		[sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n]
	}

	/// Mean squared deviation from the mean, for each channel.
	pub fn channel_mse(&self, img: &image::RgbImage) -> [f64; 3] {
		let means = self.channel_means(img);
		let mut sq = [0f64; 3];
		for (x, y) in self.pixels() {
			let px = img.get_pixel(x, y);
			for c in 0..3 {
				let d = px.0[c] as f64 - means[c];
				sq[c] += d * d;
			}
		}
		let n = self.area() as f64;
		[sq[0] / n, sq[1] / n, sq[2] / n]
	}

	/// The color a leaf over this region collapses to: channel means,
	/// rounded down.
	pub fn mean_color(&self, img: &image::RgbImage) -> image::Rgb<u8> {
		let means = self.channel_means(img);
		image::Rgb([means[0] as u8, means[1] as u8, means[2] as u8])
	}

	/// Luma-weighted error of the region against `img`, normalized by the
	/// area of the whole image.
	///
	/// # Panics
	///
	/// Panics if the region is empty or reaches outside `img`; regions
	/// produced by quartering a full-image region never do.
	pub fn error(&self, img: &image::RgbImage) -> f64 {
		let mse = self.channel_mse(img);
		let e = LUMA_WEIGHTS.iter().zip(mse.iter()).map(|(w, m)| w * m).sum::<f64>();
		e * img.height() as f64 * img.width() as f64 / ERROR_SCALE
	}

	fn check_window(&self, img: &image::RgbImage) {
		assert!(!self.is_empty(), "empty region {:?}", self);
		assert!(
			self.fits(img.width(), img.height()),
			"region {:?} outside {}x{} image", self, img.width(), img.height()
		);
	}
}

impl Measure for Region {
	type Area = u64;

	fn area(&self) -> u64 {
		self.width as u64 * self.height as u64
	}
}
