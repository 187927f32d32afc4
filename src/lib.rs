pub mod generation;
pub mod html;
pub mod text;
pub mod util;
