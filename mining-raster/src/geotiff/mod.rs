//! Minimal GeoTIFF reader/writer: strip-based, classic (32-bit) TIFF only,
//! supporting the uncompressed/LZW/Deflate compression schemes GDAL
//! commonly produces. This intentionally does not attempt to be a general
//! TIFF library (no tiles, no BigTIFF, no palette/RGB images) — only the
//! read/write contract the detection pipeline needs: read a float
//! multi-band stack, write a float single-band raster, and carry the
//! geo-referencing tags through unchanged.

mod tags;

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use mining_common::utils::{ByteOrderReader, Endianness};
use mining_common::Error;

use crate::raster::{GeoReference, RasterStack, SingleBandRaster};

use self::tags::*;

struct IfdEntry {
    field_type: u16,
    count: u32,
    raw: Vec<u8>,
}

impl IfdEntry {
    fn as_u32_vec(&self, is_le: bool) -> Vec<u32> {
        let n = self.count as usize;
        let mut out = Vec::with_capacity(n);
        match self.field_type {
            FIELD_TYPE_SHORT => {
                for i in 0..n {
                    out.push(read_u16(&self.raw[i * 2..i * 2 + 2], is_le) as u32);
                }
            }
            FIELD_TYPE_LONG => {
                for i in 0..n {
                    out.push(read_u32(&self.raw[i * 4..i * 4 + 4], is_le));
                }
            }
            FIELD_TYPE_BYTE => {
                for i in 0..n {
                    out.push(self.raw[i] as u32);
                }
            }
            _ => {}
        }
        out
    }

    fn as_f64_vec(&self, is_le: bool) -> Vec<f64> {
        let n = self.count as usize;
        let mut out = Vec::with_capacity(n);
        match self.field_type {
            FIELD_TYPE_DOUBLE => {
                for i in 0..n {
                    out.push(read_f64(&self.raw[i * 8..i * 8 + 8], is_le));
                }
            }
            FIELD_TYPE_FLOAT => {
                for i in 0..n {
                    out.push(read_f32(&self.raw[i * 4..i * 4 + 4], is_le) as f64);
                }
            }
            _ => {}
        }
        out
    }

    fn as_ascii(&self) -> String {
        let s = String::from_utf8_lossy(&self.raw).to_string();
        s.trim_end_matches('\0').to_string()
    }
}

fn read_u16(b: &[u8], is_le: bool) -> u16 {
    if is_le {
        u16::from_le_bytes([b[0], b[1]])
    } else {
        u16::from_be_bytes([b[0], b[1]])
    }
}

fn read_u32(b: &[u8], is_le: bool) -> u32 {
    if is_le {
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    } else {
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }
}

fn read_f32(b: &[u8], is_le: bool) -> f32 {
    if is_le {
        f32::from_le_bytes([b[0], b[1], b[2], b[3]])
    } else {
        f32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }
}

fn read_f64(b: &[u8], is_le: bool) -> f64 {
    let mut a = [0u8; 8];
    a.copy_from_slice(b);
    if is_le {
        f64::from_le_bytes(a)
    } else {
        f64::from_be_bytes(a)
    }
}

fn parse_ifd(
    buffer: &[u8],
    ifd_offset: u32,
    is_le: bool,
) -> Result<(HashMap<u16, IfdEntry>, u32), Error> {
    let mut reader = ByteOrderReader::new(
        Cursor::new(buffer.to_vec()),
        if is_le {
            Endianness::LittleEndian
        } else {
            Endianness::BigEndian
        },
    );
    reader.seek(ifd_offset as usize);
    let num_entries = reader.read_u16().map_err(Error::Io)?;
    let mut entries = HashMap::new();
    for _ in 0..num_entries {
        let tag = reader.read_u16().map_err(Error::Io)?;
        let field_type = reader.read_u16().map_err(Error::Io)?;
        let count = reader.read_u32().map_err(Error::Io)?;
        let value_size = field_type_size(field_type) * count as usize;
        let raw = if value_size <= 4 {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf).map_err(Error::Io)?;
            buf[..value_size].to_vec()
        } else {
            let offset = reader.read_u32().map_err(Error::Io)?;
            let start = offset as usize;
            buffer
                .get(start..start + value_size)
                .ok_or_else(|| Error::InvalidRaster("IFD entry points past end of file".into()))?
                .to_vec()
        };
        entries.insert(tag, IfdEntry { field_type, count, raw });
    }
    let next_ifd = reader.read_u32().map_err(Error::Io)?;
    Ok((entries, next_ifd))
}

fn decompress_strip(
    compressed: &[u8],
    compression: u16,
    expected_len: usize,
) -> Result<Vec<u8>, Error> {
    match compression {
        COMPRESSION_NONE => Ok(compressed.to_vec()),
        COMPRESSION_LZW => {
            let mut decoder = lzw::DecoderEarlyChange::new(lzw::MsbReader::new(), 8);
            let mut out = Vec::with_capacity(expected_len);
            let mut pos = 0usize;
            while pos < compressed.len() && out.len() < expected_len {
                let (consumed, chunk) = decoder
                    .decode_bytes(&compressed[pos..])
                    .map_err(|e| Error::InvalidRaster(format!("LZW decode error: {e:?}")))?;
                if consumed == 0 {
                    break;
                }
                out.extend_from_slice(chunk);
                pos += consumed;
            }
            Ok(out)
        }
        COMPRESSION_DEFLATE_ADOBE | COMPRESSION_DEFLATE_ZIP => {
            miniz_oxide::inflate::decompress_to_vec_zlib(compressed)
                .map_err(|e| Error::InvalidRaster(format!("deflate decode error: {e:?}")))
        }
        other => Err(Error::InvalidRaster(format!(
            "unsupported TIFF compression scheme: {other}"
        ))),
    }
}

fn decode_sample(bytes: &[u8], bytes_per_sample: usize, sample_format: u16, is_le: bool) -> f64 {
    match (bytes_per_sample, sample_format) {
        (8, SAMPLE_FORMAT_IEEE_FLOAT) => read_f64(bytes, is_le),
        (4, SAMPLE_FORMAT_IEEE_FLOAT) => read_f32(bytes, is_le) as f64,
        (1, _) => bytes[0] as f64,
        (2, SAMPLE_FORMAT_SIGNED_INT) => {
            let v = read_u16(bytes, is_le) as i16;
            v as f64
        }
        (2, _) => read_u16(bytes, is_le) as f64,
        (4, SAMPLE_FORMAT_SIGNED_INT) => {
            let v = read_u32(bytes, is_le) as i32;
            v as f64
        }
        (4, _) => read_u32(bytes, is_le) as f64,
        _ => f64::NAN,
    }
}

fn derive_geo_extent(geo: &mut GeoReference) {
    if geo.has_model_transformation {
        let m = &geo.model_transformation;
        // Row-major 4x4 affine: x = m[0]*i + m[1]*j + m[3]; y = m[4]*i + m[5]*j + m[7]
        // Only the axis-aligned (no rotation) case is supported.
        geo.resolution_x = m[0];
        geo.resolution_y = -m[5];
        geo.west = m[3];
        geo.north = m[7];
        geo.east = geo.west + geo.columns as f64 * geo.resolution_x;
        geo.south = geo.north - geo.rows as f64 * geo.resolution_y;
    } else if geo.model_pixel_scale != [0.0; 3] && geo.model_tiepoint.len() >= 6 {
        let sx = geo.model_pixel_scale[0];
        let sy = geo.model_pixel_scale[1];
        let (i, j, _k, x, y, _z) = (
            geo.model_tiepoint[0],
            geo.model_tiepoint[1],
            geo.model_tiepoint[2],
            geo.model_tiepoint[3],
            geo.model_tiepoint[4],
            geo.model_tiepoint[5],
        );
        geo.resolution_x = sx;
        geo.resolution_y = sy;
        geo.west = x - i * sx;
        geo.north = y + j * sy;
        geo.east = geo.west + geo.columns as f64 * sx;
        geo.south = geo.north - geo.rows as f64 * sy;
    }
}

fn extract_geo(
    entries: &HashMap<u16, IfdEntry>,
    is_le: bool,
    rows: usize,
    columns: usize,
) -> GeoReference {
    let mut geo = GeoReference {
        rows,
        columns,
        ..Default::default()
    };
    if let Some(e) = entries.get(&TAG_MODEL_PIXEL_SCALE) {
        let v = e.as_f64_vec(is_le);
        for (i, val) in v.into_iter().take(3).enumerate() {
            geo.model_pixel_scale[i] = val;
        }
    }
    if let Some(e) = entries.get(&TAG_MODEL_TIEPOINT) {
        geo.model_tiepoint = e.as_f64_vec(is_le);
    }
    if let Some(e) = entries.get(&TAG_MODEL_TRANSFORMATION) {
        let v = e.as_f64_vec(is_le);
        if v.len() == 16 {
            geo.model_transformation.copy_from_slice(&v);
            geo.has_model_transformation = true;
        }
    }
    if let Some(e) = entries.get(&TAG_GEO_KEY_DIRECTORY) {
        geo.geo_key_directory = e.as_u32_vec(is_le).into_iter().map(|v| v as u16).collect();
    }
    if let Some(e) = entries.get(&TAG_GEO_DOUBLE_PARAMS) {
        geo.geo_double_params = e.as_f64_vec(is_le);
    }
    if let Some(e) = entries.get(&TAG_GEO_ASCII_PARAMS) {
        geo.geo_ascii_params = e.as_ascii();
    }
    if let Some(e) = entries.get(&TAG_GDAL_NODATA) {
        if let Ok(v) = e.as_ascii().trim().parse::<f64>() {
            geo.nodata = v;
        }
    }
    derive_geo_extent(&mut geo);
    geo
}

/// Reads a multi-band GeoTIFF into memory as `f64`, band-major.
pub fn read_multiband(path: &Path) -> Result<RasterStack, Error> {
    let buffer = fs::read(path).map_err(|_| Error::InputNotFound(path.to_path_buf()))?;
    if buffer.len() < 8 {
        return Err(Error::InvalidRaster("file too small to be a TIFF".into()));
    }
    let is_le = match &buffer[0..2] {
        b"II" => true,
        b"MM" => false,
        _ => return Err(Error::InvalidRaster("not a TIFF file (bad byte order mark)".into())),
    };
    let magic = read_u16(&buffer[2..4], is_le);
    if magic != 42 {
        return Err(Error::InvalidRaster(
            "BigTIFF / non-classic TIFF is not supported".into(),
        ));
    }
    let first_ifd = read_u32(&buffer[4..8], is_le);
    let (entries, _next) = parse_ifd(&buffer, first_ifd, is_le)?;

    let columns = *entries
        .get(&TAG_IMAGE_WIDTH)
        .ok_or_else(|| Error::InvalidRaster("missing ImageWidth tag".into()))?
        .as_u32_vec(is_le)
        .get(0)
        .unwrap() as usize;
    let rows = *entries
        .get(&TAG_IMAGE_LENGTH)
        .ok_or_else(|| Error::InvalidRaster("missing ImageLength tag".into()))?
        .as_u32_vec(is_le)
        .get(0)
        .unwrap() as usize;
    let bands = entries
        .get(&TAG_SAMPLES_PER_PIXEL)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(1) as usize;
    let bits_per_sample = entries
        .get(&TAG_BITS_PER_SAMPLE)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(64) as usize;
    let bytes_per_sample = bits_per_sample / 8;
    let sample_format = entries
        .get(&TAG_SAMPLE_FORMAT)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(1) as u16;
    let compression = entries
        .get(&TAG_COMPRESSION)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(1) as u16;
    let planar_config = entries
        .get(&TAG_PLANAR_CONFIGURATION)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(1) as u16;
    let rows_per_strip = entries
        .get(&TAG_ROWS_PER_STRIP)
        .and_then(|e| e.as_u32_vec(is_le).get(0).copied())
        .unwrap_or(rows as u32) as usize;
    let strip_offsets = entries
        .get(&TAG_STRIP_OFFSETS)
        .ok_or_else(|| Error::InvalidRaster("missing StripOffsets tag".into()))?
        .as_u32_vec(is_le);
    let strip_byte_counts = entries
        .get(&TAG_STRIP_BYTE_COUNTS)
        .ok_or_else(|| Error::InvalidRaster("missing StripByteCounts tag".into()))?
        .as_u32_vec(is_le);

    if rows == 0 || columns == 0 || bands == 0 {
        return Err(Error::InvalidRaster("raster has a zero-length dimension".into()));
    }

    let geo = extract_geo(&entries, is_le, rows, columns);
    let mut stack = RasterStack::new(rows, columns, bands, geo);

    let strips_per_band = (rows + rows_per_strip - 1) / rows_per_strip;

    for strip_idx in 0..strip_offsets.len() {
        let offset = strip_offsets[strip_idx] as usize;
        let byte_count = strip_byte_counts[strip_idx] as usize;
        let compressed = buffer
            .get(offset..offset + byte_count)
            .ok_or_else(|| Error::InvalidRaster("strip points past end of file".into()))?;

        let (band_for_strip, strip_in_band) = if planar_config == PLANAR_PLANAR {
            (strip_idx / strips_per_band, strip_idx % strips_per_band)
        } else {
            (0, strip_idx)
        };
        let row_start = strip_in_band * rows_per_strip;
        let row_end = (row_start + rows_per_strip).min(rows);
        let strip_rows = row_end - row_start;
        let samples_per_strip_row = if planar_config == PLANAR_PLANAR {
            columns
        } else {
            columns * bands
        };
        let expected_len = strip_rows * samples_per_strip_row * bytes_per_sample;

        let decompressed = decompress_strip(compressed, compression, expected_len)?;

        if planar_config == PLANAR_PLANAR {
            for r in 0..strip_rows {
                for c in 0..columns {
                    let byte_off = (r * columns + c) * bytes_per_sample;
                    let val = decode_sample(
                        &decompressed[byte_off..byte_off + bytes_per_sample],
                        bytes_per_sample,
                        sample_format,
                        is_le,
                    );
                    stack.set(row_start + r, c, band_for_strip, val);
                }
            }
        } else {
            for r in 0..strip_rows {
                for c in 0..columns {
                    for b in 0..bands {
                        let sample_idx = (r * columns + c) * bands + b;
                        let byte_off = sample_idx * bytes_per_sample;
                        let val = decode_sample(
                            &decompressed[byte_off..byte_off + bytes_per_sample],
                            bytes_per_sample,
                            sample_format,
                            is_le,
                        );
                        stack.set(row_start + r, c, b, val);
                    }
                }
            }
        }
    }

    Ok(stack)
}

fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn push_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

enum EntryValue {
    Short(Vec<u16>),
    Long(Vec<u32>),
    Double(Vec<f64>),
    Ascii(String),
}

struct PendingEntry {
    tag: u16,
    value: EntryValue,
}

/// Writes a single-band raster as a classic, little-endian, LZW-compressed
/// GeoTIFF, carrying over the geo-referencing tags from `raster.geo` unchanged.
pub fn write_singleband(path: &Path, raster: &SingleBandRaster) -> Result<(), Error> {
    let rows = raster.rows;
    let columns = raster.columns;
    let geo = &raster.geo;
    let mut raw = Vec::with_capacity(rows * columns * 8);
    for row in 0..rows {
        for col in 0..columns {
            raw.extend_from_slice(&raster.get(row, col).to_le_bytes());
        }
    }

    // Mirrors the decoder's construction pattern (`DecoderEarlyChange::new`);
    // the encoder side of this crate was not directly observed in the corpus.
    let mut compressed = Vec::new();
    {
        let mut encoder = lzw::Encoder::new(lzw::MsbWriter::new(&mut compressed), 8)
            .map_err(|e| Error::ComputeError(format!("LZW encode failed: {e:?}")))?;
        encoder
            .encode_bytes(&raw)
            .map_err(|e| Error::ComputeError(format!("LZW encode failed: {e:?}")))?;
    }

    let mut entries: Vec<PendingEntry> = vec![
        PendingEntry { tag: TAG_IMAGE_WIDTH, value: EntryValue::Long(vec![columns as u32]) },
        PendingEntry { tag: TAG_IMAGE_LENGTH, value: EntryValue::Long(vec![rows as u32]) },
        PendingEntry { tag: TAG_BITS_PER_SAMPLE, value: EntryValue::Short(vec![64]) },
        PendingEntry { tag: TAG_COMPRESSION, value: EntryValue::Short(vec![COMPRESSION_LZW]) },
        PendingEntry { tag: TAG_PHOTOMETRIC_INTERPRETATION, value: EntryValue::Short(vec![1]) },
        PendingEntry { tag: TAG_STRIP_OFFSETS, value: EntryValue::Long(vec![0]) }, // patched below
        PendingEntry { tag: TAG_SAMPLES_PER_PIXEL, value: EntryValue::Short(vec![1]) },
        PendingEntry { tag: TAG_ROWS_PER_STRIP, value: EntryValue::Long(vec![rows as u32]) },
        PendingEntry { tag: TAG_STRIP_BYTE_COUNTS, value: EntryValue::Long(vec![compressed.len() as u32]) },
        PendingEntry { tag: TAG_PLANAR_CONFIGURATION, value: EntryValue::Short(vec![PLANAR_CHUNKY]) },
        PendingEntry { tag: TAG_SAMPLE_FORMAT, value: EntryValue::Short(vec![SAMPLE_FORMAT_IEEE_FLOAT]) },
    ];

    if geo.model_pixel_scale != [0.0; 3] {
        entries.push(PendingEntry {
            tag: TAG_MODEL_PIXEL_SCALE,
            value: EntryValue::Double(geo.model_pixel_scale.to_vec()),
        });
    }
    if !geo.model_tiepoint.is_empty() {
        entries.push(PendingEntry {
            tag: TAG_MODEL_TIEPOINT,
            value: EntryValue::Double(geo.model_tiepoint.clone()),
        });
    }
    if geo.has_model_transformation {
        entries.push(PendingEntry {
            tag: TAG_MODEL_TRANSFORMATION,
            value: EntryValue::Double(geo.model_transformation.to_vec()),
        });
    }
    if !geo.geo_key_directory.is_empty() {
        entries.push(PendingEntry {
            tag: TAG_GEO_KEY_DIRECTORY,
            value: EntryValue::Short(geo.geo_key_directory.clone()),
        });
    }
    if !geo.geo_double_params.is_empty() {
        entries.push(PendingEntry {
            tag: TAG_GEO_DOUBLE_PARAMS,
            value: EntryValue::Double(geo.geo_double_params.clone()),
        });
    }
    if !geo.geo_ascii_params.is_empty() {
        entries.push(PendingEntry {
            tag: TAG_GEO_ASCII_PARAMS,
            value: EntryValue::Ascii(geo.geo_ascii_params.clone()),
        });
    }
    if geo.nodata.is_finite() {
        entries.push(PendingEntry {
            tag: TAG_GDAL_NODATA,
            value: EntryValue::Ascii(format!("{}", geo.nodata)),
        });
    }

    entries.sort_by_key(|e| e.tag);

    let ifd_offset = 8usize + compressed.len() + (compressed.len() % 2);
    let ifd_size = 2 + entries.len() * 12 + 4;
    let mut extra_data: Vec<u8> = Vec::new();
    let extra_data_base = ifd_offset + ifd_size;

    let mut file = Vec::new();
    file.extend_from_slice(b"II");
    push_u16(&mut file, 42);
    push_u32(&mut file, ifd_offset as u32);
    file.extend_from_slice(&compressed);
    if compressed.len() % 2 == 1 {
        file.push(0);
    }

    push_u16(&mut file, entries.len() as u16);
    for entry in &entries {
        push_u16(&mut file, entry.tag);
        match &entry.value {
            EntryValue::Short(v) => {
                push_u16(&mut file, FIELD_TYPE_SHORT);
                push_u32(&mut file, v.len() as u32);
                let size = v.len() * 2;
                if entry.tag == TAG_STRIP_OFFSETS {
                    push_u32(&mut file, 8); // strip data always starts right after the header
                } else if size <= 4 {
                    let mut inline = Vec::new();
                    for x in v {
                        push_u16(&mut inline, *x);
                    }
                    inline.resize(4, 0);
                    file.extend_from_slice(&inline);
                } else {
                    push_u32(&mut file, (extra_data_base + extra_data.len()) as u32);
                    for x in v {
                        push_u16(&mut extra_data, *x);
                    }
                    if extra_data.len() % 2 == 1 {
                        extra_data.push(0);
                    }
                }
            }
            EntryValue::Long(v) => {
                push_u16(&mut file, FIELD_TYPE_LONG);
                push_u32(&mut file, v.len() as u32);
                if entry.tag == TAG_STRIP_OFFSETS {
                    push_u32(&mut file, 8);
                } else if v.len() == 1 {
                    push_u32(&mut file, v[0]);
                } else {
                    push_u32(&mut file, (extra_data_base + extra_data.len()) as u32);
                    for x in v {
                        push_u32(&mut extra_data, *x);
                    }
                }
            }
            EntryValue::Double(v) => {
                push_u16(&mut file, FIELD_TYPE_DOUBLE);
                push_u32(&mut file, v.len() as u32);
                push_u32(&mut file, (extra_data_base + extra_data.len()) as u32);
                for x in v {
                    push_f64(&mut extra_data, *x);
                }
            }
            EntryValue::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                push_u16(&mut file, FIELD_TYPE_ASCII);
                push_u32(&mut file, bytes.len() as u32);
                if bytes.len() <= 4 {
                    let mut inline = bytes.clone();
                    inline.resize(4, 0);
                    file.extend_from_slice(&inline);
                } else {
                    push_u32(&mut file, (extra_data_base + extra_data.len()) as u32);
                    extra_data.extend_from_slice(&bytes);
                    if extra_data.len() % 2 == 1 {
                        extra_data.push(0);
                    }
                }
            }
        }
    }
    push_u32(&mut file, 0); // no next IFD

    file.extend_from_slice(&extra_data);

    fs::write(path, file).map_err(Error::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SingleBandRaster;

    #[test]
    fn write_then_read_roundtrips_pixel_values() {
        let mut geo = GeoReference {
            rows: 2,
            columns: 3,
            nodata: -9999.0,
            model_pixel_scale: [30.0, 30.0, 0.0],
            model_tiepoint: vec![0.0, 0.0, 0.0, 500000.0, 4000000.0, 0.0],
            ..Default::default()
        };
        geo.resolution_x = 30.0;
        geo.resolution_y = 30.0;
        geo.west = 500000.0;
        geo.north = 4000000.0;
        geo.east = geo.west + 3.0 * 30.0;
        geo.south = geo.north - 2.0 * 30.0;

        let mut raster = SingleBandRaster::new(2, 3, -9999.0, geo);
        raster.set(0, 0, 0.12);
        raster.set(0, 1, 1.5);
        raster.set(0, 2, -1.0);
        raster.set(1, 0, 2020.0);
        raster.set(1, 1, -9999.0);
        raster.set(1, 2, 3.75);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tif");
        write_singleband(&path, &raster).unwrap();

        let stack = read_multiband(&path).unwrap();
        assert_eq!(stack.rows, 2);
        assert_eq!(stack.columns, 3);
        assert_eq!(stack.bands, 1);
        for row in 0..2 {
            for col in 0..3 {
                assert!((stack.get(row, col, 0) - raster.get(row, col)).abs() < 1e-9);
            }
        }
        assert_eq!(stack.geo.model_pixel_scale[0], 30.0);
        assert_eq!(stack.geo.model_tiepoint.len(), 6);
    }

    #[test]
    fn rejects_non_tiff_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_tiff.tif");
        fs::write(&path, b"not a tiff at all").unwrap();
        assert!(read_multiband(&path).is_err());
    }

    #[test]
    fn missing_file_reports_input_not_found() {
        let result = read_multiband(Path::new("/nonexistent/path/does_not_exist.tif"));
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }
}
