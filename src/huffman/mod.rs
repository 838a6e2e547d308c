pub mod codes;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod tree;

pub use codes::{Code, CodeTable};
pub use decoder::HuffmanDecoder;
pub use encoder::{EncodedText, HuffmanEncoder};
pub use frequency::FrequencyTable;
pub use tree::{HuffmanTree, Node, NodeId};
