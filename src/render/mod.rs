mod core;

pub use self::core::{PreviewRenderer, PreviewSettings};
