//! Generation services: asset discovery, background, placement, output.

pub mod background;
pub mod batch;
pub mod catalog;
pub mod compose;
pub mod font;
pub mod palette;
pub mod placement;
pub mod watermark;

pub use batch::{BatchReport, BatchRunner};
pub use catalog::{Catalog, CategoryPool, ImageAsset};
pub use compose::{Composer, Composition, GenerateError};
pub use font::{FontError, FontLibrary, FontSelection};
pub use palette::{JsonPaletteRepository, PaletteError, PaletteRepository};
