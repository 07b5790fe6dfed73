pub mod constants;
pub mod face_box;
pub mod gray_image;
pub mod raw_frame;
pub mod snapshot;
