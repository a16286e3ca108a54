use bytes::{Buf, BufMut, BytesMut};
use crossgrade_nbt::{NbtError, NbtValue};
use crossgrade_types::{BlockPos, ChunkPos, SubChunkPos, Vec2, Vec3};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound on slice lengths when the reader runs with limits enabled.
pub const MAX_SLICE_LENGTH: usize = 4096;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("VarInt too big")]
    VarIntTooBig,
    #[error("Not enough data")]
    NotEnoughData,
    #[error("Slice too long: {0} > {1}")]
    SliceTooLong(usize, usize),
    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("Unknown {kind} option {value}")]
    UnknownEnumOption { kind: &'static str, value: i64 },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("{0} unread bytes left in packet {1}")]
    TrailingBytes(usize, u32),
    #[error("NBT error: {0}")]
    Nbt(#[from] NbtError),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// A direction-polymorphic byte cursor.
///
/// Every structure is coded by a single `marshal` function that calls these
/// primitives: a `Reader` fills the fields in from the wire, a `Writer` emits them.
/// All fixed-width integers are little-endian.
pub trait Io {
    /// True for a `Reader`.
    fn reads(&self) -> bool;

    fn u8(&mut self, x: &mut u8) -> CodecResult<()>;
    fn i8(&mut self, x: &mut i8) -> CodecResult<()>;
    fn bool(&mut self, x: &mut bool) -> CodecResult<()>;
    fn u16(&mut self, x: &mut u16) -> CodecResult<()>;
    fn i16(&mut self, x: &mut i16) -> CodecResult<()>;
    fn u32(&mut self, x: &mut u32) -> CodecResult<()>;
    fn i32(&mut self, x: &mut i32) -> CodecResult<()>;
    fn u64(&mut self, x: &mut u64) -> CodecResult<()>;
    fn i64(&mut self, x: &mut i64) -> CodecResult<()>;
    fn f32(&mut self, x: &mut f32) -> CodecResult<()>;
    fn varint32(&mut self, x: &mut i32) -> CodecResult<()>;
    fn varuint32(&mut self, x: &mut u32) -> CodecResult<()>;
    fn varint64(&mut self, x: &mut i64) -> CodecResult<()>;
    fn varuint64(&mut self, x: &mut u64) -> CodecResult<()>;
    /// A varuint32 length-prefixed UTF-8 string.
    fn string(&mut self, x: &mut String) -> CodecResult<()>;
    /// A varuint32 length-prefixed byte slice.
    fn byte_slice(&mut self, x: &mut Vec<u8>) -> CodecResult<()>;
    /// All remaining bytes of the packet, without a length prefix.
    fn bytes(&mut self, x: &mut Vec<u8>) -> CodecResult<()>;
    fn uuid(&mut self, x: &mut Uuid) -> CodecResult<()>;
    /// A root compound in the little-endian network NBT encoding.
    fn nbt(&mut self, x: &mut NbtValue) -> CodecResult<()>;
    /// Codes a varuint32 slice length. The writer emits `len`; the reader
    /// ignores it and returns the length read from the wire.
    fn slice_len(&mut self, len: usize) -> CodecResult<usize>;
    /// Same as `slice_len`, for slices prefixed with a little-endian u32.
    fn slice_len_u32(&mut self, len: usize) -> CodecResult<usize>;

    fn vec2(&mut self, x: &mut Vec2) -> CodecResult<()> {
        self.f32(&mut x.x)?;
        self.f32(&mut x.y)
    }

    fn vec3(&mut self, x: &mut Vec3) -> CodecResult<()> {
        self.f32(&mut x.x)?;
        self.f32(&mut x.y)?;
        self.f32(&mut x.z)
    }

    /// Three varint32 coordinates.
    fn block_pos(&mut self, x: &mut BlockPos) -> CodecResult<()> {
        self.varint32(&mut x.x)?;
        self.varint32(&mut x.y)?;
        self.varint32(&mut x.z)
    }

    /// Block position with an unsigned y coordinate.
    fn ublock_pos(&mut self, x: &mut BlockPos) -> CodecResult<()> {
        self.varint32(&mut x.x)?;
        let mut y = x.y as u32;
        self.varuint32(&mut y)?;
        x.y = y as i32;
        self.varint32(&mut x.z)
    }

    fn chunk_pos(&mut self, x: &mut ChunkPos) -> CodecResult<()> {
        self.varint32(&mut x.x)?;
        self.varint32(&mut x.z)
    }

    fn sub_chunk_pos(&mut self, x: &mut SubChunkPos) -> CodecResult<()> {
        self.varint32(&mut x.x)?;
        self.varint32(&mut x.y)?;
        self.varint32(&mut x.z)
    }

    /// Builds the fault raised when a closed set of options meets an unknown value.
    fn unknown_enum_option(&self, value: i64, kind: &'static str) -> CodecError {
        CodecError::UnknownEnumOption { kind, value }
    }

    /// Builds the fault raised when a field holds a value its layout forbids.
    fn invalid_value(&self, field: &'static str, reason: String) -> CodecError {
        CodecError::InvalidValue { field, reason }
    }
}

/// A structure with a single symmetric encode/decode function.
pub trait Marshal {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()>;
}

/// Codes a varuint32-prefixed slice, coding each element with `f`.
pub fn func_slice<T: Default>(
    io: &mut dyn Io,
    v: &mut Vec<T>,
    mut f: impl FnMut(&mut dyn Io, &mut T) -> CodecResult<()>,
) -> CodecResult<()> {
    let len = io.slice_len(v.len())?;
    prepare(io, v, len);
    for x in v.iter_mut() {
        f(io, x)?;
    }
    Ok(())
}

/// Codes a little-endian u32-prefixed slice, coding each element with `f`.
pub fn func_slice_u32<T: Default>(
    io: &mut dyn Io,
    v: &mut Vec<T>,
    mut f: impl FnMut(&mut dyn Io, &mut T) -> CodecResult<()>,
) -> CodecResult<()> {
    let len = io.slice_len_u32(v.len())?;
    prepare(io, v, len);
    for x in v.iter_mut() {
        f(io, x)?;
    }
    Ok(())
}

/// Codes a varuint32-prefixed slice of `Marshal` structures.
pub fn slice<T: Marshal + Default>(io: &mut dyn Io, v: &mut Vec<T>) -> CodecResult<()> {
    func_slice(io, v, |io, x| x.marshal(io))
}

/// Codes a little-endian u32-prefixed slice of `Marshal` structures.
pub fn slice_u32<T: Marshal + Default>(io: &mut dyn Io, v: &mut Vec<T>) -> CodecResult<()> {
    func_slice_u32(io, v, |io, x| x.marshal(io))
}

/// Codes an optional value as a presence flag followed by the value.
pub fn optional<T: Default>(
    io: &mut dyn Io,
    x: &mut Option<T>,
    f: impl FnOnce(&mut dyn Io, &mut T) -> CodecResult<()>,
) -> CodecResult<()> {
    let mut present = x.is_some();
    io.bool(&mut present)?;
    if io.reads() {
        *x = present.then(T::default);
    }
    match x {
        Some(v) => f(io, v),
        None => Ok(()),
    }
}

fn prepare<T: Default>(io: &dyn Io, v: &mut Vec<T>, len: usize) {
    if io.reads() {
        v.clear();
        v.resize_with(len, T::default);
    }
}

/// Decodes from a borrowed packet payload.
pub struct Reader<'a> {
    buf: &'a [u8],
    limits: bool,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, limits: false }
    }

    /// Reject slices longer than `MAX_SLICE_LENGTH`.
    pub fn with_limits(mut self, enabled: bool) -> Self {
        self.limits = enabled;
        self
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, n: usize) -> CodecResult<()> {
        if self.buf.remaining() < n {
            return Err(CodecError::NotEnoughData);
        }
        Ok(())
    }

    fn read_varuint(&mut self, max_shift: u32) -> CodecResult<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            self.need(1)?;
            let byte = self.buf.get_u8();
            result |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= max_shift {
                return Err(CodecError::VarIntTooBig);
            }
        }
    }

    fn check_len(&self, len: usize) -> CodecResult<usize> {
        if self.limits && len > MAX_SLICE_LENGTH {
            return Err(CodecError::SliceTooLong(len, MAX_SLICE_LENGTH));
        }
        // Every element occupies at least one byte on the wire.
        self.need(len)?;
        Ok(len)
    }

    fn take(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        self.need(len)?;
        let out = self.buf[..len].to_vec();
        self.buf.advance(len);
        Ok(out)
    }
}

macro_rules! read_fixed {
    ($self:ident, $x:ident, $size:expr, $get:ident) => {{
        $self.need($size)?;
        *$x = $self.buf.$get();
        Ok(())
    }};
}

impl Io for Reader<'_> {
    fn reads(&self) -> bool {
        true
    }

    fn u8(&mut self, x: &mut u8) -> CodecResult<()> {
        read_fixed!(self, x, 1, get_u8)
    }

    fn i8(&mut self, x: &mut i8) -> CodecResult<()> {
        read_fixed!(self, x, 1, get_i8)
    }

    fn bool(&mut self, x: &mut bool) -> CodecResult<()> {
        self.need(1)?;
        *x = self.buf.get_u8() != 0;
        Ok(())
    }

    fn u16(&mut self, x: &mut u16) -> CodecResult<()> {
        read_fixed!(self, x, 2, get_u16_le)
    }

    fn i16(&mut self, x: &mut i16) -> CodecResult<()> {
        read_fixed!(self, x, 2, get_i16_le)
    }

    fn u32(&mut self, x: &mut u32) -> CodecResult<()> {
        read_fixed!(self, x, 4, get_u32_le)
    }

    fn i32(&mut self, x: &mut i32) -> CodecResult<()> {
        read_fixed!(self, x, 4, get_i32_le)
    }

    fn u64(&mut self, x: &mut u64) -> CodecResult<()> {
        read_fixed!(self, x, 8, get_u64_le)
    }

    fn i64(&mut self, x: &mut i64) -> CodecResult<()> {
        read_fixed!(self, x, 8, get_i64_le)
    }

    fn f32(&mut self, x: &mut f32) -> CodecResult<()> {
        read_fixed!(self, x, 4, get_f32_le)
    }

    fn varint32(&mut self, x: &mut i32) -> CodecResult<()> {
        let ux = self.read_varuint(35)? as u32;
        *x = (ux >> 1) as i32 ^ -((ux & 1) as i32);
        Ok(())
    }

    fn varuint32(&mut self, x: &mut u32) -> CodecResult<()> {
        *x = self.read_varuint(35)? as u32;
        Ok(())
    }

    fn varint64(&mut self, x: &mut i64) -> CodecResult<()> {
        let ux = self.read_varuint(70)?;
        *x = (ux >> 1) as i64 ^ -((ux & 1) as i64);
        Ok(())
    }

    fn varuint64(&mut self, x: &mut u64) -> CodecResult<()> {
        *x = self.read_varuint(70)?;
        Ok(())
    }

    fn string(&mut self, x: &mut String) -> CodecResult<()> {
        let len = self.read_varuint(35)? as usize;
        let bytes = self.take(len)?;
        *x = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(())
    }

    fn byte_slice(&mut self, x: &mut Vec<u8>) -> CodecResult<()> {
        let len = self.read_varuint(35)? as usize;
        *x = self.take(len)?;
        Ok(())
    }

    fn bytes(&mut self, x: &mut Vec<u8>) -> CodecResult<()> {
        let len = self.buf.remaining();
        *x = self.take(len)?;
        Ok(())
    }

    fn uuid(&mut self, x: &mut Uuid) -> CodecResult<()> {
        self.need(16)?;
        let hi = self.buf.get_u64_le();
        let lo = self.buf.get_u64_le();
        *x = Uuid::from_u64_pair(hi, lo);
        Ok(())
    }

    fn nbt(&mut self, x: &mut NbtValue) -> CodecResult<()> {
        *x = NbtValue::read_root_network(&mut self.buf)?;
        Ok(())
    }

    fn slice_len(&mut self, _len: usize) -> CodecResult<usize> {
        let len = self.read_varuint(35)? as usize;
        self.check_len(len)
    }

    fn slice_len_u32(&mut self, _len: usize) -> CodecResult<usize> {
        self.need(4)?;
        let len = self.buf.get_u32_le() as usize;
        self.check_len(len)
    }
}

/// Encodes into a growable buffer.
pub struct Writer<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }

    fn write_varuint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.put_u8(value as u8 | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }
}

impl Io for Writer<'_> {
    fn reads(&self) -> bool {
        false
    }

    fn u8(&mut self, x: &mut u8) -> CodecResult<()> {
        self.buf.put_u8(*x);
        Ok(())
    }

    fn i8(&mut self, x: &mut i8) -> CodecResult<()> {
        self.buf.put_i8(*x);
        Ok(())
    }

    fn bool(&mut self, x: &mut bool) -> CodecResult<()> {
        self.buf.put_u8(*x as u8);
        Ok(())
    }

    fn u16(&mut self, x: &mut u16) -> CodecResult<()> {
        self.buf.put_u16_le(*x);
        Ok(())
    }

    fn i16(&mut self, x: &mut i16) -> CodecResult<()> {
        self.buf.put_i16_le(*x);
        Ok(())
    }

    fn u32(&mut self, x: &mut u32) -> CodecResult<()> {
        self.buf.put_u32_le(*x);
        Ok(())
    }

    fn i32(&mut self, x: &mut i32) -> CodecResult<()> {
        self.buf.put_i32_le(*x);
        Ok(())
    }

    fn u64(&mut self, x: &mut u64) -> CodecResult<()> {
        self.buf.put_u64_le(*x);
        Ok(())
    }

    fn i64(&mut self, x: &mut i64) -> CodecResult<()> {
        self.buf.put_i64_le(*x);
        Ok(())
    }

    fn f32(&mut self, x: &mut f32) -> CodecResult<()> {
        self.buf.put_f32_le(*x);
        Ok(())
    }

    fn varint32(&mut self, x: &mut i32) -> CodecResult<()> {
        let v = *x;
        self.write_varuint(((v << 1) ^ (v >> 31)) as u32 as u64);
        Ok(())
    }

    fn varuint32(&mut self, x: &mut u32) -> CodecResult<()> {
        self.write_varuint(*x as u64);
        Ok(())
    }

    fn varint64(&mut self, x: &mut i64) -> CodecResult<()> {
        let v = *x;
        self.write_varuint(((v << 1) ^ (v >> 63)) as u64);
        Ok(())
    }

    fn varuint64(&mut self, x: &mut u64) -> CodecResult<()> {
        self.write_varuint(*x);
        Ok(())
    }

    fn string(&mut self, x: &mut String) -> CodecResult<()> {
        self.write_varuint(x.len() as u64);
        self.buf.put_slice(x.as_bytes());
        Ok(())
    }

    fn byte_slice(&mut self, x: &mut Vec<u8>) -> CodecResult<()> {
        self.write_varuint(x.len() as u64);
        self.buf.put_slice(x);
        Ok(())
    }

    fn bytes(&mut self, x: &mut Vec<u8>) -> CodecResult<()> {
        self.buf.put_slice(x);
        Ok(())
    }

    fn uuid(&mut self, x: &mut Uuid) -> CodecResult<()> {
        let (hi, lo) = x.as_u64_pair();
        self.buf.put_u64_le(hi);
        self.buf.put_u64_le(lo);
        Ok(())
    }

    fn nbt(&mut self, x: &mut NbtValue) -> CodecResult<()> {
        Ok(x.write_root_network(self.buf)?)
    }

    fn slice_len(&mut self, len: usize) -> CodecResult<usize> {
        self.write_varuint(len as u64);
        Ok(len)
    }

    fn slice_len_u32(&mut self, len: usize) -> CodecResult<usize> {
        self.buf.put_u32_le(len as u32);
        Ok(len)
    }
}
