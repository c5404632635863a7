#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use raspix_image as image;

#[doc(inline)]
pub use raspix_imgproc as imgproc;

#[doc(inline)]
pub use raspix_io as io;
