mod encoder;
mod galois;
mod poly;

pub use encoder::ecc;
