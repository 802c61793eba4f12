use thiserror::Error;

use super::region::Region;

/// Reason why an image couldn't be turned into a quadtree.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
	/// The image has no pixels along at least one axis.
	#[error("image has invalid dimensions {width}x{height}")]
	EmptyImage { width: u32, height: u32 },
	/// The error threshold is negative or not a number.
	#[error("threshold must be a non-negative number, got {0}")]
	InvalidThreshold(f64),
}

/// Reason why leaf regions couldn't be rendered against an image.
#[derive(Debug, Error, PartialEq)]
pub enum DrawError {
	/// A region is empty or reaches outside the image.
	#[error("region {0:?} does not fit the image")]
	OutOfBounds(Region),
}

/// Reason why an encoded partition shape couldn't be decoded.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
	/// There was no valid shape header.
	#[error("missing shape header")]
	MissingHeader,
	/// The header names a version this crate cannot read.
	#[error("unsupported shape version {0}")]
	UnsupportedVersion(u8),
	/// The header carries a zero width or height.
	#[error("shape has invalid dimensions {width}x{height}")]
	EmptyShape { width: u32, height: u32 },
	/// A node bit was expected but not found.
	#[error("shape data ended before the tree was complete")]
	InsufficientData,
	/// A node is marked as split although its region is too small to split.
	#[error("region {0:?} is too small to split")]
	InvalidSplit(Region),
	/// Whole bytes were left over after the tree was complete.
	#[error("shape data continues past the end of the tree")]
	TrailingData,
}
