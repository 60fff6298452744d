pub mod user;
pub mod video;

pub use user::User;
pub use video::{Direction, NewVideoRecord, VideoPatch, VideoRecord};
