pub mod concat;
pub mod eval;
pub mod invert;
pub mod localize;
pub mod merge;
pub mod parse;
pub mod reference;
pub mod simplify;
pub mod unique_value;
