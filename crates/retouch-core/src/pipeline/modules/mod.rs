mod blur;
mod brightness_contrast;
mod filter;
mod normalize;
mod saturation;

pub use blur::Blur;
pub use brightness_contrast::BrightnessContrast;
pub use filter::StyleFilter;
pub use normalize::Normalize;
pub use saturation::Saturation;
