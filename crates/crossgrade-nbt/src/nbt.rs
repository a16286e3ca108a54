use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// NBT tag type IDs.
pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_SHORT: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_LONG: u8 = 4;
pub const TAG_FLOAT: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_BYTE_ARRAY: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;
pub const TAG_INT_ARRAY: u8 = 11;
pub const TAG_LONG_ARRAY: u8 = 12;

/// Compounds and lists nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("Not enough data")]
    NotEnoughData,
    #[error("VarInt too big")]
    VarIntTooBig,
    #[error("Unknown tag type {0}")]
    UnknownTag(u8),
    #[error("Expected root compound, got tag type {0}")]
    RootNotCompound(u8),
    #[error("Negative length {0}")]
    NegativeLength(i32),
    #[error("Length {0} does not fit in an i32")]
    TooLong(usize),
    #[error("Nesting deeper than {MAX_DEPTH}")]
    TooDeep,
    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,
}

pub type NbtResult<T> = Result<T, NbtError>;

/// An NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtValue>),
    Compound(Vec<(String, NbtValue)>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Default for NbtValue {
    fn default() -> Self {
        NbtValue::Compound(Vec::new())
    }
}

impl NbtValue {
    pub fn tag_id(&self) -> u8 {
        match self {
            NbtValue::Byte(_) => TAG_BYTE,
            NbtValue::Short(_) => TAG_SHORT,
            NbtValue::Int(_) => TAG_INT,
            NbtValue::Long(_) => TAG_LONG,
            NbtValue::Float(_) => TAG_FLOAT,
            NbtValue::Double(_) => TAG_DOUBLE,
            NbtValue::ByteArray(_) => TAG_BYTE_ARRAY,
            NbtValue::String(_) => TAG_STRING,
            NbtValue::List(_) => TAG_LIST,
            NbtValue::Compound(_) => TAG_COMPOUND,
            NbtValue::IntArray(_) => TAG_INT_ARRAY,
            NbtValue::LongArray(_) => TAG_LONG_ARRAY,
        }
    }

    /// Look up a named entry of a compound.
    pub fn get(&self, name: &str) -> Option<&NbtValue> {
        match self {
            NbtValue::Compound(entries) => entries.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Write this value as a root tag in the little-endian network encoding:
    /// tag type, empty name, payload. Integers and lengths are zig-zag varints.
    pub fn write_root_network(&self, buf: &mut BytesMut) -> NbtResult<()> {
        buf.put_u8(self.tag_id());
        write_string("", buf);
        self.write_payload(buf)
    }

    /// Write just the payload (no tag type or name).
    pub fn write_payload(&self, buf: &mut BytesMut) -> NbtResult<()> {
        match self {
            NbtValue::Byte(v) => buf.put_i8(*v),
            NbtValue::Short(v) => buf.put_i16_le(*v),
            NbtValue::Int(v) => write_varint32(buf, *v),
            NbtValue::Long(v) => write_varint64(buf, *v),
            NbtValue::Float(v) => buf.put_f32_le(*v),
            NbtValue::Double(v) => buf.put_f64_le(*v),
            NbtValue::ByteArray(v) => {
                write_len(buf, v.len())?;
                for b in v {
                    buf.put_i8(*b);
                }
            }
            NbtValue::String(v) => write_string(v, buf),
            NbtValue::List(v) => {
                buf.put_u8(v.first().map_or(TAG_END, NbtValue::tag_id));
                write_len(buf, v.len())?;
                for item in v {
                    item.write_payload(buf)?;
                }
            }
            NbtValue::Compound(entries) => {
                for (name, value) in entries {
                    buf.put_u8(value.tag_id());
                    write_string(name, buf);
                    value.write_payload(buf)?;
                }
                buf.put_u8(TAG_END);
            }
            NbtValue::IntArray(v) => {
                write_len(buf, v.len())?;
                for i in v {
                    write_varint32(buf, *i);
                }
            }
            NbtValue::LongArray(v) => {
                write_len(buf, v.len())?;
                for l in v {
                    write_varint64(buf, *l);
                }
            }
        }
        Ok(())
    }

    /// Read a root compound in the little-endian network encoding.
    pub fn read_root_network(buf: &mut impl Buf) -> NbtResult<NbtValue> {
        let tag = read_u8(buf)?;
        if tag != TAG_COMPOUND {
            return Err(NbtError::RootNotCompound(tag));
        }
        let _name = read_string(buf)?;
        read_payload(buf, tag, 0)
    }
}

fn read_payload(buf: &mut impl Buf, tag: u8, depth: usize) -> NbtResult<NbtValue> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep);
    }
    Ok(match tag {
        TAG_BYTE => NbtValue::Byte(read_u8(buf)? as i8),
        TAG_SHORT => {
            need(buf, 2)?;
            NbtValue::Short(buf.get_i16_le())
        }
        TAG_INT => NbtValue::Int(read_varint32(buf)?),
        TAG_LONG => NbtValue::Long(read_varint64(buf)?),
        TAG_FLOAT => {
            need(buf, 4)?;
            NbtValue::Float(buf.get_f32_le())
        }
        TAG_DOUBLE => {
            need(buf, 8)?;
            NbtValue::Double(buf.get_f64_le())
        }
        TAG_BYTE_ARRAY => {
            let len = read_len(buf)?;
            need(buf, len)?;
            NbtValue::ByteArray((0..len).map(|_| buf.get_i8()).collect())
        }
        TAG_STRING => NbtValue::String(read_string(buf)?),
        TAG_LIST => {
            let elem = read_u8(buf)?;
            let len = read_len(buf)?;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_payload(buf, elem, depth + 1)?);
            }
            NbtValue::List(items)
        }
        TAG_COMPOUND => {
            let mut entries = Vec::new();
            loop {
                let t = read_u8(buf)?;
                if t == TAG_END {
                    break;
                }
                let name = read_string(buf)?;
                entries.push((name, read_payload(buf, t, depth + 1)?));
            }
            NbtValue::Compound(entries)
        }
        TAG_INT_ARRAY => {
            let len = read_len(buf)?;
            let mut v = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                v.push(read_varint32(buf)?);
            }
            NbtValue::IntArray(v)
        }
        TAG_LONG_ARRAY => {
            let len = read_len(buf)?;
            let mut v = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                v.push(read_varint64(buf)?);
            }
            NbtValue::LongArray(v)
        }
        other => return Err(NbtError::UnknownTag(other)),
    })
}

fn need(buf: &impl Buf, n: usize) -> NbtResult<()> {
    if buf.remaining() < n {
        return Err(NbtError::NotEnoughData);
    }
    Ok(())
}

fn read_u8(buf: &mut impl Buf) -> NbtResult<u8> {
    need(buf, 1)?;
    Ok(buf.get_u8())
}

fn read_len(buf: &mut impl Buf) -> NbtResult<usize> {
    let len = read_varint32(buf)?;
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

fn write_len(buf: &mut BytesMut, len: usize) -> NbtResult<()> {
    let len = i32::try_from(len).map_err(|_| NbtError::TooLong(len))?;
    write_varint32(buf, len);
    Ok(())
}

fn read_string(buf: &mut impl Buf) -> NbtResult<String> {
    let len = read_varuint(buf, 35)? as usize;
    need(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| NbtError::InvalidUtf8)
}

fn write_string(s: &str, buf: &mut BytesMut) {
    write_varuint(buf, s.len() as u64);
    buf.put_slice(s.as_bytes());
}

fn read_varuint(buf: &mut impl Buf, max_shift: u32) -> NbtResult<u64> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = read_u8(buf)?;
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= max_shift {
            return Err(NbtError::VarIntTooBig);
        }
    }
}

fn write_varuint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8(value as u8 | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

fn read_varint32(buf: &mut impl Buf) -> NbtResult<i32> {
    let ux = read_varuint(buf, 35)? as u32;
    Ok((ux >> 1) as i32 ^ -((ux & 1) as i32))
}

fn read_varint64(buf: &mut impl Buf) -> NbtResult<i64> {
    let ux = read_varuint(buf, 70)?;
    Ok((ux >> 1) as i64 ^ -((ux & 1) as i64))
}

fn write_varint32(buf: &mut BytesMut, v: i32) {
    write_varuint(buf, ((v << 1) ^ (v >> 31)) as u32 as u64);
}

fn write_varint64(buf: &mut BytesMut, v: i64) {
    write_varuint(buf, ((v << 1) ^ (v >> 63)) as u64);
}

/// Helper macro for building compound tags.
#[macro_export]
macro_rules! nbt_compound {
    ($($key:expr => $val:expr),* $(,)?) => {
        $crate::NbtValue::Compound(vec![
            $(($key.into(), $val)),*
        ])
    };
}

/// Helper macro for building list tags.
#[macro_export]
macro_rules! nbt_list {
    ($($val:expr),* $(,)?) => {
        $crate::NbtValue::List(vec![$($val),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_compound_roundtrip() {
        let nbt = nbt_compound! {
            "name" => NbtValue::String("minecraft:stone".into()),
            "version" => NbtValue::Int(18_090_528),
            "states" => nbt_compound! {
                "stone_type" => NbtValue::String("granite".into()),
            },
            "ticks" => NbtValue::Long(-3),
            "list" => nbt_list![NbtValue::Short(1), NbtValue::Short(2)],
        };
        let mut buf = BytesMut::new();
        nbt.write_root_network(&mut buf).unwrap();
        assert_eq!(buf[0], TAG_COMPOUND);
        // Root name is empty.
        assert_eq!(buf[1], 0);

        let mut slice = &buf[..];
        let back = NbtValue::read_root_network(&mut slice).unwrap();
        assert_eq!(back, nbt);
        assert!(slice.is_empty());
        assert_eq!(back.get("version"), Some(&NbtValue::Int(18_090_528)));
    }

    #[test]
    fn test_int_is_zigzag_varint() {
        let mut buf = BytesMut::new();
        NbtValue::Int(-1).write_payload(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01]);
    }

    #[test]
    fn test_truncated_compound() {
        let nbt = nbt_compound! { "a" => NbtValue::Double(1.5) };
        let mut buf = BytesMut::new();
        nbt.write_root_network(&mut buf).unwrap();
        let mut slice = &buf[..buf.len() - 3];
        assert!(matches!(
            NbtValue::read_root_network(&mut slice),
            Err(NbtError::NotEnoughData)
        ));
    }

    #[test]
    fn test_length_past_i32_is_rejected() {
        let mut buf = BytesMut::new();
        let len = i32::MAX as usize + 1;
        assert!(matches!(write_len(&mut buf, len), Err(NbtError::TooLong(l)) if l == len));
        assert!(buf.is_empty());

        write_len(&mut buf, 3).unwrap();
        let mut slice = &buf[..];
        assert_eq!(read_len(&mut slice).unwrap(), 3);
    }

    #[test]
    fn test_root_must_be_compound() {
        let mut slice: &[u8] = &[TAG_INT, 0, 2];
        assert!(matches!(
            NbtValue::read_root_network(&mut slice),
            Err(NbtError::RootNotCompound(TAG_INT))
        ));
    }
}
