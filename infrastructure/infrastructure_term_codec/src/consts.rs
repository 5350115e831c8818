//! Wire tag constants for the external term format.

/// First byte of a complete payload.
pub const VERSION_MAGIC: u8 = 131;

/// Marks a compressed payload section right after the version byte.
pub const TAG_COMPRESSED: u8 = 80;

pub const TAG_NEW_FLOAT_EXT: u8 = 70;
pub const TAG_BIT_BINARY_EXT: u8 = 77;
pub const TAG_NEW_PID_EXT: u8 = 88;
pub const TAG_NEWER_REF_EXT: u8 = 90;
pub const TAG_SMALL_INTEGER_EXT: u8 = 97;
pub const TAG_INTEGER_EXT: u8 = 98;
pub const TAG_FLOAT_EXT: u8 = 99;
pub const TAG_ATOM_EXT: u8 = 100;
pub const TAG_REF_EXT: u8 = 101;
pub const TAG_PID_EXT: u8 = 103;
pub const TAG_SMALL_TUPLE_EXT: u8 = 104;
pub const TAG_LARGE_TUPLE_EXT: u8 = 105;
pub const TAG_NIL_EXT: u8 = 106;
pub const TAG_STRING_EXT: u8 = 107;
pub const TAG_LIST_EXT: u8 = 108;
pub const TAG_BINARY_EXT: u8 = 109;
pub const TAG_SMALL_BIG_EXT: u8 = 110;
pub const TAG_LARGE_BIG_EXT: u8 = 111;
pub const TAG_NEW_FUN_EXT: u8 = 112;
pub const TAG_NEW_REF_EXT: u8 = 114;
pub const TAG_SMALL_ATOM_EXT: u8 = 115;
pub const TAG_MAP_EXT: u8 = 116;
pub const TAG_FUN_EXT: u8 = 117;
pub const TAG_ATOM_UTF8_EXT: u8 = 118;
pub const TAG_SMALL_ATOM_UTF8_EXT: u8 = 119;
