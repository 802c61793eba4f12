use bitvec::vec::BitVec;

use super::error::DecodeError;
use super::region::Region;
use super::QuadtreeNode;

/// A `BitVec` variant ideal for encoding and decoding partition shapes.
type ShapeBitVec = BitVec<bitvec::order::Msb0, u8>;

const MAGIC: &[u8] = b"QuTrSh";
const VERSION: u8 = 1;
/// Magic, version byte, then big-endian width and height.
const HEADER_LEN: usize = 6 + 1 + 4 + 4;

impl QuadtreeNode<Region> {
	/// Appends the shape of the tree to `buffer`: one bit per node in
	/// pre-order, set if the node has subsections.
	pub fn encode_bits(&self, buffer: &mut ShapeBitVec) {
		buffer.push(self.sections.is_some());
		if let Some(ref sects) = self.sections {
			for section in sects.iter() {
				section.encode_bits(buffer);
			}
		}
	}

	/// Reads a tree shape of the sort written by `.encode_bits()`, starting
	/// at `curr_ind`, and rebuilds the regions by quartering `region`.
	///
	/// Successful return value includes the index to which the parser has
	/// progressed, to assist with the recursive algorithm.
	pub fn decode_bits(
		region: Region,
		buffer: &ShapeBitVec,
		curr_ind: usize
	) -> Result<(Self, usize), DecodeError> {
		if curr_ind >= buffer.len() {
			return Err(DecodeError::InsufficientData);
		}
		let mut curr_ind = curr_ind + 1;
		if !buffer[curr_ind - 1] {
			return Ok((Self::leaf(region), curr_ind));
		}
		if region.width < 2 || region.height < 2 {
			return Err(DecodeError::InvalidSplit(region));
		}
		let [q_0, q_1, q_2, q_3] = region.quadrants();
		let mut decode = |quad| -> Result<Self, DecodeError> {
			let (node, next) = Self::decode_bits(quad, buffer, curr_ind)?;
			curr_ind = next;
			Ok(node)
		};
		let sections = Box::new([decode(q_0)?, decode(q_1)?, decode(q_2)?, decode(q_3)?]);
		Ok((Self { cell: region, sections: Some(sections) }, curr_ind))
	}

	/// Encodes the shape of the tree, with its root dimensions, as bytes.
	///
	/// The root is expected to start at the origin, as trees built from an
	/// image do.
	pub fn to_shape(&self) -> Vec<u8> {
		let mut ret = Vec::with_capacity(HEADER_LEN);
		ret.extend_from_slice(MAGIC);
		ret.push(VERSION);
		ret.extend_from_slice(&self.cell.width.to_be_bytes());
		ret.extend_from_slice(&self.cell.height.to_be_bytes());
		let mut bit_buf = ShapeBitVec::new();
		self.encode_bits(&mut bit_buf);
		ret.extend_from_slice(bit_buf.as_slice());
		ret
	}

	/// Rebuilds a region tree from data written by `.to_shape()`.
	pub fn from_shape(source: &[u8]) -> Result<Self, DecodeError> {
		if source.len() < MAGIC.len() + 1 || &source[..MAGIC.len()] != MAGIC {
			return Err(DecodeError::MissingHeader);
		}
		match source[MAGIC.len()] {
			VERSION => (),
			v => return Err(DecodeError::UnsupportedVersion(v)),
		}
		if source.len() < HEADER_LEN {
			return Err(DecodeError::InsufficientData);
		}
		let read_u32 = |at: usize| {
			let mut b = [0; 4];
			b.copy_from_slice(&source[at..at + 4]);
			u32::from_be_bytes(b)
		};
		let (width, height) = (read_u32(7), read_u32(11));
		if width == 0 || height == 0 {
			return Err(DecodeError::EmptyShape { width, height });
		}
		let tree_bits = ShapeBitVec::from(&source[HEADER_LEN..]);
		let (tree, used) = Self::decode_bits(Region::full(width, height), &tree_bits, 0)?;
		if (used + 7) / 8 < source.len() - HEADER_LEN {
			return Err(DecodeError::TrailingData);
		}
		Ok(tree)
	}
}
