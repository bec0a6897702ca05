use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stylistic filter applied after all numeric adjustments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Posterize,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::None,
        Filter::Grayscale,
        Filter::Sepia,
        Filter::Invert,
        Filter::Posterize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Invert => "invert",
            Self::Posterize => "posterize",
        }
    }
}

/// Upper bound of the blur radius.
const BLUR_MAX: f32 = 20.0;

/// Names the five adjustable fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentField {
    Brightness,
    Contrast,
    Saturation,
    Blur,
    Filter,
}

impl AdjustmentField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Blur => "blur",
            Self::Filter => "filter",
        }
    }

    /// Slider range and granularity for numeric fields. `None` for the filter choice.
    pub fn spec(self) -> Option<FieldSpec> {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation => Some(FieldSpec {
                min: 0.0,
                max: 200.0,
                step: 1.0,
                neutral: 100.0,
            }),
            Self::Blur => Some(FieldSpec {
                min: 0.0,
                max: BLUR_MAX,
                step: 0.5,
                neutral: 0.0,
            }),
            Self::Filter => None,
        }
    }
}

impl std::fmt::Display for AdjustmentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared domain of a numeric adjustment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub neutral: f32,
}

/// A single-field change, applied by copying the full parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum Adjustment {
    Brightness(i32),
    Contrast(i32),
    Saturation(i32),
    Blur(f32),
    Filter(Filter),
}

impl Adjustment {
    pub fn field(&self) -> AdjustmentField {
        match self {
            Self::Brightness(_) => AdjustmentField::Brightness,
            Self::Contrast(_) => AdjustmentField::Contrast,
            Self::Saturation(_) => AdjustmentField::Saturation,
            Self::Blur(_) => AdjustmentField::Blur,
            Self::Filter(_) => AdjustmentField::Filter,
        }
    }
}

/// Everything one render needs to know. Always fully populated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParams {
    /// 0..=200, neutral 100.
    pub brightness: i32,
    /// 0..=200, neutral 100.
    pub contrast: i32,
    /// 0..=200, neutral 100.
    pub saturation: i32,
    /// 0.0..=20.0, neutral 0.0. Floored when converted to a kernel size.
    pub blur: f32,
    pub filter: Filter,
}

impl AdjustmentParams {
    pub const NEUTRAL: Self = Self {
        brightness: 100,
        contrast: 100,
        saturation: 100,
        blur: 0.0,
        filter: Filter::None,
    };

    /// Copy of `self` with one field replaced.
    ///
    /// The replacement value is checked against its field's domain; on error
    /// `self` is still the caller's to keep.
    pub fn with(&self, adjustment: Adjustment) -> Result<Self, DomainError> {
        let mut next = *self;
        match adjustment {
            Adjustment::Brightness(v) => {
                check_int(AdjustmentField::Brightness, v)?;
                next.brightness = v;
            }
            Adjustment::Contrast(v) => {
                check_int(AdjustmentField::Contrast, v)?;
                next.contrast = v;
            }
            Adjustment::Saturation(v) => {
                check_int(AdjustmentField::Saturation, v)?;
                next.saturation = v;
            }
            Adjustment::Blur(v) => {
                check_blur(v)?;
                next.blur = v;
            }
            Adjustment::Filter(f) => next.filter = f,
        }
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_int(AdjustmentField::Brightness, self.brightness)?;
        check_int(AdjustmentField::Contrast, self.contrast)?;
        check_int(AdjustmentField::Saturation, self.saturation)?;
        check_blur(self.blur)
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Gaussian window width: `floor(blur) * 2 + 1`. Always odd, 1 means no blur.
    ///
    /// Values outside the domain are clamped (NaN counts as 0), so hand-built
    /// params never produce a window wider than 41.
    pub fn blur_kernel_size(&self) -> u32 {
        let whole = self.blur.clamp(0.0, BLUR_MAX).floor() as u32;
        whole * 2 + 1
    }
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn check_int(field: AdjustmentField, value: i32) -> Result<(), DomainError> {
    check_range(field, value as f32)
}

fn check_blur(value: f32) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NonFinite(AdjustmentField::Blur));
    }
    check_range(AdjustmentField::Blur, value)
}

fn check_range(field: AdjustmentField, value: f32) -> Result<(), DomainError> {
    let Some(spec) = field.spec() else {
        return Ok(());
    };
    if value < spec.min || value > spec.max {
        return Err(DomainError::OutOfRange {
            field,
            value: value as f64,
            min: spec.min as f64,
            max: spec.max as f64,
        });
    }
    Ok(())
}
