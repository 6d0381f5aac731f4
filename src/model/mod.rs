pub mod appearance;
pub mod label;
pub mod server;
pub mod space;

pub use label::{ActiveSpaceLabel, LabelError};
pub use space::{DisplaySpaces, Space, SpaceId, SpaceKind, SpaceSnapshot};
