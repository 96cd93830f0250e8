pub(crate) mod assemble;
pub(crate) mod lexicon;
pub(crate) mod normalize;
