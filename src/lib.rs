//! Approximates raster images by recursively quartering them into regions
//! of near-uniform color.
//!
//! ```
//! use quadtree_approx::{Outline, Quadtree};
//!
//! let img = image::RgbImage::from_fn(16, 16, |x, _| image::Rgb([(x * 16) as u8, 0, 0]));
//! let tree = Quadtree::build(&img, 0.001, 1).unwrap();
//! let approx = tree.render(&Outline::none());
//! assert_eq!(approx.dimensions(), img.dimensions());
//! assert!(tree.stats().leaf_count > 1);
//! ```

pub mod node;

pub use node::{Leaves, Measure, Partition, QuadtreeNode, Stats};
pub use node::error::{BuildError, DecodeError, DrawError};
pub use node::image::{render_leaves, ErrorPartition, Outline, Quadtree};
pub use node::points::{Bounds, CountPartition, Point, PointCell, PointQuadtree};
pub use node::region::{Region, ERROR_SCALE, LUMA_WEIGHTS};
