pub(crate) mod scanline;
pub(crate) mod text;
