//! Fixed-width binary share records
//!
//! ```text
//! [4-byte share index, little-endian][value, `value_width` bytes, least significant byte first]
//! ```
//!
//! There is no header: the value width (and with it the field modulus) is
//! recovered from the record length alone. Shares from different secrets
//! are only told apart when their widths differ.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use num_bigint::BigUint;

use crate::error::{Result, ShamirError};
use crate::field::to_le_bytes_fixed;

/// Size of the share index prefix
pub const INDEX_SIZE: usize = 4;

/// Smallest valid record: an index and a one-byte value
pub const MIN_RECORD_SIZE: usize = INDEX_SIZE + 1;

/// Encodes a share as `index || value`, with the value zero-extended to
/// `value_width` bytes
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use prime_share::codec;
///
/// let record = codec::encode(2, &BigUint::from(0x0102u32), 3).unwrap();
/// assert_eq!(&record[..], &[2, 0, 0, 0, 0x02, 0x01, 0x00]);
/// ```
pub fn encode(index: u32, value: &BigUint, value_width: usize) -> Result<Bytes> {
    let value_bytes = to_le_bytes_fixed(value, value_width)?;
    let mut buf = BytesMut::with_capacity(INDEX_SIZE + value_width);
    buf.put_u32_le(index);
    buf.put_slice(&value_bytes);
    Ok(buf.freeze())
}

/// Decodes a record into `(index, value, value_width)`
///
/// The value is returned as read; reducing it into the field is left to the
/// caller, which knows the modulus.
pub fn decode(record: &[u8]) -> Result<(u32, BigUint, usize)> {
    if record.len() < MIN_RECORD_SIZE {
        return Err(ShamirError::MalformedShare(format!(
            "record is {} bytes, need at least {MIN_RECORD_SIZE}",
            record.len()
        )));
    }

    let mut buf = record;
    let index = buf.get_u32_le();
    let value_width = buf.remaining();
    let value = BigUint::from_bytes_le(buf.chunk());
    Ok((index, value, value_width))
}
