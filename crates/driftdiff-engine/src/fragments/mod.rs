//! The fragment stream: assembly from the block model, unchanged-region
//! clipping, and projections back onto the inputs.

pub mod assemble;
pub mod clip;
pub mod project;
pub mod types;

pub use assemble::assemble;
pub use clip::clip;
pub use project::{project_new, project_old};
pub use types::{Fragment, FragmentKind};
