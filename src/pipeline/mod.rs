pub mod compress;
pub mod encode;
pub mod window;

pub use compress::*;
pub use encode::*;
pub use window::*;
