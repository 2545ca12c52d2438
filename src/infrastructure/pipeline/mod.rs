pub mod lexicon;
pub mod local;

pub use lexicon::LexiconModel;
pub use local::LocalPipeline;
