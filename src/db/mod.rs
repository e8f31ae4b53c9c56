pub mod column;
pub mod null_bitmap;
pub mod table;
