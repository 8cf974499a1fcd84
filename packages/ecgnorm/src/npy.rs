//! NumPy `.npy` encoding and decoding.
//!
//! Files are written as format version 1.0, C order, little-endian, with the
//! header padded so the data starts on a 64-byte boundary. The reader accepts
//! versions 1.0 to 3.0 of 2-D arrays in either byte order and memory order.

use crate::error::{NormalizeError, Result};
use crate::types::{DType, Samples};
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use ndarray::{Array2, ShapeBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

const HEADER_ALIGN: usize = 64;

/// Preamble before the header dict: magic, version, u16 header length
const PREAMBLE_V1: usize = MAGIC.len() + 2 + 2;

fn descr(dtype: DType) -> &'static str {
    match dtype {
        DType::Int8 => "|i1",
        DType::Int16 => "<i2",
        DType::Int32 => "<i4",
        DType::Int64 => "<i8",
        DType::UInt8 => "|u1",
        DType::UInt16 => "<u2",
        DType::UInt32 => "<u4",
        DType::UInt64 => "<u8",
        DType::Float32 => "<f4",
        DType::Float64 => "<f8",
    }
}

/// Version 1.0 header bytes (preamble included) for a C-order 2-D array.
pub fn header(dtype: DType, dim: (usize, usize)) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
        descr(dtype),
        dim.0,
        dim.1
    );
    let unpadded = PREAMBLE_V1 + dict.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    let header_len = dict.len() + padding + 1;

    let mut out = Vec::with_capacity(PREAMBLE_V1 + header_len);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header_len as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.resize(out.len() + padding, b' ');
    out.push(b'\n');
    out
}

/// Encode `samples` as a complete `.npy` stream.
pub fn write_samples<W: Write>(writer: &mut W, samples: &Samples) -> std::io::Result<()> {
    writer.write_all(&header(samples.dtype(), samples.dim()))?;
    match samples {
        Samples::Int8(a) => a.iter().try_for_each(|&v| writer.write_i8(v)),
        Samples::Int16(a) => a.iter().try_for_each(|&v| writer.write_i16::<LittleEndian>(v)),
        Samples::Int32(a) => a.iter().try_for_each(|&v| writer.write_i32::<LittleEndian>(v)),
        Samples::Int64(a) => a.iter().try_for_each(|&v| writer.write_i64::<LittleEndian>(v)),
        Samples::UInt8(a) => a.iter().try_for_each(|&v| writer.write_u8(v)),
        Samples::UInt16(a) => a.iter().try_for_each(|&v| writer.write_u16::<LittleEndian>(v)),
        Samples::UInt32(a) => a.iter().try_for_each(|&v| writer.write_u32::<LittleEndian>(v)),
        Samples::UInt64(a) => a.iter().try_for_each(|&v| writer.write_u64::<LittleEndian>(v)),
        Samples::Float32(a) => a.iter().try_for_each(|&v| writer.write_f32::<LittleEndian>(v)),
        Samples::Float64(a) => a.iter().try_for_each(|&v| writer.write_f64::<LittleEndian>(v)),
    }
}

/// Write `samples` to `path`, replacing any existing file.
pub fn write_npy(path: &Path, samples: &Samples) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_samples(&mut writer, samples)?;
    writer.flush()?;
    Ok(())
}

/// Parsed header dict
#[derive(Debug, Clone, PartialEq, Eq)]
struct NpyHeader {
    descr: String,
    fortran_order: bool,
    shape: Vec<usize>,
}

fn npy_error(message: impl Into<String>) -> NormalizeError {
    NormalizeError::parse(".npy", message)
}

/// Value text following `'key':` in a header dict.
fn dict_value<'a>(dict: &'a str, key: &str) -> Result<&'a str> {
    let needle = format!("'{}':", key);
    let start = dict
        .find(&needle)
        .ok_or_else(|| npy_error(format!("header is missing '{}'", key)))?;
    Ok(dict[start + needle.len()..].trim_start())
}

fn parse_header(dict: &str) -> Result<NpyHeader> {
    let descr_text = dict_value(dict, "descr")?;
    let descr = descr_text
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| npy_error("malformed 'descr'"))?
        .to_string();

    let order_text = dict_value(dict, "fortran_order")?;
    let fortran_order = if order_text.starts_with("True") {
        true
    } else if order_text.starts_with("False") {
        false
    } else {
        return Err(npy_error("malformed 'fortran_order'"));
    };

    let shape_text = dict_value(dict, "shape")?;
    let inner = shape_text
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| npy_error("malformed 'shape'"))?;
    let shape = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| npy_error(format!("invalid dimension '{}'", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NpyHeader {
        descr,
        fortran_order,
        shape,
    })
}

/// Decode a complete `.npy` byte stream into a 2-D sample matrix.
pub fn decode(bytes: &[u8]) -> Result<Samples> {
    if bytes.len() < PREAMBLE_V1 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(npy_error("missing \\x93NUMPY magic"));
    }
    let major = bytes[MAGIC.len()];
    let (header_len, header_start) = match major {
        1 => (
            LittleEndian::read_u16(&bytes[8..10]) as usize,
            PREAMBLE_V1,
        ),
        2 | 3 if bytes.len() >= 12 => (LittleEndian::read_u32(&bytes[8..12]) as usize, 12),
        _ => return Err(npy_error(format!("unsupported format version {}", major))),
    };
    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err(npy_error("truncated header"));
    }
    let dict = std::str::from_utf8(&bytes[header_start..data_start])
        .map_err(|e| npy_error(format!("header is not text: {}", e)))?;
    let header = parse_header(dict)?;

    let (rows, cols) = match header.shape.as_slice() {
        [rows, cols] => (*rows, *cols),
        other => return Err(npy_error(format!("expected a 2-D array, got shape {:?}", other))),
    };

    let (big_endian, kind) = match header.descr.chars().next() {
        Some('>') => (true, &header.descr[1..]),
        Some('<' | '|' | '=') => (false, &header.descr[1..]),
        _ => (false, header.descr.as_str()),
    };
    let dtype = match kind {
        "i1" => DType::Int8,
        "i2" => DType::Int16,
        "i4" => DType::Int32,
        "i8" => DType::Int64,
        "u1" => DType::UInt8,
        "u2" => DType::UInt16,
        "u4" => DType::UInt32,
        "u8" => DType::UInt64,
        "f4" => DType::Float32,
        "f8" => DType::Float64,
        other => return Err(npy_error(format!("unsupported dtype '{}'", other))),
    };

    let data = &bytes[data_start..];
    let expected = rows
        .checked_mul(cols)
        .and_then(|count| count.checked_mul(dtype.size()))
        .ok_or_else(|| npy_error("shape too large"))?;
    if data.len() != expected {
        return Err(npy_error(format!(
            "expected {} bytes of data, got {}",
            expected,
            data.len()
        )));
    }

    let layout = Layout {
        rows,
        cols,
        fortran_order: header.fortran_order,
    };
    let samples = match dtype {
        DType::Int8 => Samples::Int8(layout.build(data.iter().map(|&b| b as i8).collect())?),
        DType::UInt8 => Samples::UInt8(layout.build(data.to_vec())?),
        DType::Int16 => Samples::Int16(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_i16_into(d, v) } else { LittleEndian::read_i16_into(d, v) }
        }))?),
        DType::Int32 => Samples::Int32(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_i32_into(d, v) } else { LittleEndian::read_i32_into(d, v) }
        }))?),
        DType::Int64 => Samples::Int64(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_i64_into(d, v) } else { LittleEndian::read_i64_into(d, v) }
        }))?),
        DType::UInt16 => Samples::UInt16(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_u16_into(d, v) } else { LittleEndian::read_u16_into(d, v) }
        }))?),
        DType::UInt32 => Samples::UInt32(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_u32_into(d, v) } else { LittleEndian::read_u32_into(d, v) }
        }))?),
        DType::UInt64 => Samples::UInt64(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_u64_into(d, v) } else { LittleEndian::read_u64_into(d, v) }
        }))?),
        DType::Float32 => Samples::Float32(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_f32_into(d, v) } else { LittleEndian::read_f32_into(d, v) }
        }))?),
        DType::Float64 => Samples::Float64(layout.build(read_into(data, big_endian, |o, d, v| {
            if o { BigEndian::read_f64_into(d, v) } else { LittleEndian::read_f64_into(d, v) }
        }))?),
    };
    Ok(samples)
}

fn read_into<T: Default + Clone>(
    data: &[u8],
    big_endian: bool,
    read: impl Fn(bool, &[u8], &mut [T]),
) -> Vec<T> {
    let mut values = vec![T::default(); data.len() / std::mem::size_of::<T>()];
    read(big_endian, data, &mut values);
    values
}

struct Layout {
    rows: usize,
    cols: usize,
    fortran_order: bool,
}

impl Layout {
    fn build<T>(&self, values: Vec<T>) -> Result<Array2<T>> {
        let result = if self.fortran_order {
            Array2::from_shape_vec((self.rows, self.cols).f(), values)
        } else {
            Array2::from_shape_vec((self.rows, self.cols), values)
        };
        result.map_err(|e| npy_error(e.to_string()))
    }
}

/// Read a `.npy` file written by this crate or by NumPy.
pub fn read_npy(path: &Path) -> Result<Samples> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}
