pub mod reader;
pub mod writer;

pub use reader::{unpack, BitReader};
pub use writer::{padding_for, BitWriter};
