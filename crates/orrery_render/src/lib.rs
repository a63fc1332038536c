pub mod audio;
pub mod camera;
pub mod plugin;
pub mod shapes;
pub mod ui;

pub use plugin::OrreryRenderPlugin;
