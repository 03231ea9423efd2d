//! TIFF/GeoTIFF tag and field-type identifiers used by the reader and writer.
//! Names and numeric values follow the TIFF 6.0 and GeoTIFF 1.0 specs.

pub const TAG_IMAGE_WIDTH: u16 = 256;
pub const TAG_IMAGE_LENGTH: u16 = 257;
pub const TAG_BITS_PER_SAMPLE: u16 = 258;
pub const TAG_COMPRESSION: u16 = 259;
pub const TAG_PHOTOMETRIC_INTERPRETATION: u16 = 262;
pub const TAG_STRIP_OFFSETS: u16 = 273;
pub const TAG_SAMPLES_PER_PIXEL: u16 = 277;
pub const TAG_ROWS_PER_STRIP: u16 = 278;
pub const TAG_STRIP_BYTE_COUNTS: u16 = 279;
pub const TAG_PLANAR_CONFIGURATION: u16 = 284;
pub const TAG_SAMPLE_FORMAT: u16 = 339;

pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
pub const TAG_MODEL_TRANSFORMATION: u16 = 34264;
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
pub const TAG_GEO_DOUBLE_PARAMS: u16 = 34736;
pub const TAG_GEO_ASCII_PARAMS: u16 = 34737;
pub const TAG_GDAL_NODATA: u16 = 42113;

pub const COMPRESSION_NONE: u16 = 1;
pub const COMPRESSION_LZW: u16 = 5;
pub const COMPRESSION_PACKBITS: u16 = 32773;
pub const COMPRESSION_DEFLATE_ADOBE: u16 = 8;
pub const COMPRESSION_DEFLATE_ZIP: u16 = 32946;

pub const SAMPLE_FORMAT_UNSIGNED_INT: u16 = 1;
pub const SAMPLE_FORMAT_SIGNED_INT: u16 = 2;
pub const SAMPLE_FORMAT_IEEE_FLOAT: u16 = 3;

pub const PLANAR_CHUNKY: u16 = 1;
pub const PLANAR_PLANAR: u16 = 2;

pub const FIELD_TYPE_BYTE: u16 = 1;
pub const FIELD_TYPE_ASCII: u16 = 2;
pub const FIELD_TYPE_SHORT: u16 = 3;
pub const FIELD_TYPE_LONG: u16 = 4;
pub const FIELD_TYPE_RATIONAL: u16 = 5;
pub const FIELD_TYPE_SBYTE: u16 = 6;
pub const FIELD_TYPE_UNDEFINED: u16 = 7;
pub const FIELD_TYPE_SSHORT: u16 = 8;
pub const FIELD_TYPE_SLONG: u16 = 9;
pub const FIELD_TYPE_SRATIONAL: u16 = 10;
pub const FIELD_TYPE_FLOAT: u16 = 11;
pub const FIELD_TYPE_DOUBLE: u16 = 12;

/// Size, in bytes, of a single value of the given TIFF field type.
pub fn field_type_size(field_type: u16) -> usize {
    match field_type {
        FIELD_TYPE_BYTE | FIELD_TYPE_ASCII | FIELD_TYPE_SBYTE | FIELD_TYPE_UNDEFINED => 1,
        FIELD_TYPE_SHORT | FIELD_TYPE_SSHORT => 2,
        FIELD_TYPE_LONG | FIELD_TYPE_SLONG | FIELD_TYPE_FLOAT => 4,
        FIELD_TYPE_RATIONAL | FIELD_TYPE_SRATIONAL | FIELD_TYPE_DOUBLE => 8,
        _ => 1,
    }
}
