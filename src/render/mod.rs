pub mod canvas;
pub mod scene;
pub mod screenshot;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

pub use canvas::{Canvas, Rect};
pub use scene::{SceneCamera, Wireframe};
pub use skeleton::HAND_CONNECTIONS;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
