pub(crate) mod tags;
pub(crate) mod tokenizer;
