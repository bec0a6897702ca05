//! 8-bit color conversions shared by the CPU engine.
//!
//! HSV follows the compact 8-bit convention: H is stored halved in [0, 180),
//! S and V in [0, 255].

/// Fixed-point precision of the HSV division tables.
const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);

/// Hue range of the 8-bit representation (degrees / 2).
pub const HUE_RANGE: i32 = 180;

/// Rec. 601 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Classic sepia tone matrix. Rows produce output R, G, B from input (R, G, B).
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Round to nearest and saturate into the u8 range.
#[inline]
pub fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Reciprocal tables that turn the per-pixel divisions of RGB -> HSV into
/// a multiply and a shift.
pub struct HsvTables {
    sdiv: [i32; 256],
    hdiv: [i32; 256],
}

impl HsvTables {
    pub fn new() -> Self {
        let mut sdiv = [0i32; 256];
        let mut hdiv = [0i32; 256];
        for i in 1..256 {
            sdiv[i] = ((255 << HSV_SHIFT) as f64 / i as f64).round() as i32;
            hdiv[i] = (((HUE_RANGE as i64) << HSV_SHIFT) as f64 / (6.0 * i as f64)).round() as i32;
        }
        Self { sdiv, hdiv }
    }

    pub fn rgb_to_hsv(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let (r, g, b) = (r as i32, g as i32, b as i32);
        let v = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = v - min;

        let s = (diff * self.sdiv[v as usize] + HSV_ROUND) >> HSV_SHIFT;

        let h = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let mut h = (h * self.hdiv[diff as usize] + HSV_ROUND) >> HSV_SHIFT;
        if h < 0 {
            h += HUE_RANGE;
        }
        if h >= HUE_RANGE {
            h -= HUE_RANGE;
        }

        [h as u8, s.clamp(0, 255) as u8, v as u8]
    }
}

impl Default for HsvTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Inverse of [`HsvTables::rgb_to_hsv`].
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> [u8; 3] {
    let v = v as f32 / 255.0;
    if s == 0 {
        let gray = saturate_u8(v * 255.0);
        return [gray, gray, gray];
    }
    let s = s as f32 / 255.0;

    let mut h = h as f32 * (6.0 / HUE_RANGE as f32);
    if h < 0.0 {
        h += 6.0;
    }
    if h >= 6.0 {
        h -= 6.0;
    }
    let mut sector = h.floor() as usize;
    h -= sector as f32;
    if sector >= 6 {
        sector = 0;
        h = 0.0;
    }

    let tab = [v, v * (1.0 - s), v * (1.0 - s * h), v * (1.0 - s * (1.0 - h))];
    // (R, G, B) indices into `tab` per 60-degree sector
    const SECTORS: [[usize; 3]; 6] = [
        [0, 3, 1],
        [2, 0, 1],
        [1, 0, 3],
        [1, 2, 0],
        [3, 1, 0],
        [0, 1, 2],
    ];
    let [ri, gi, bi] = SECTORS[sector];
    [
        saturate_u8(tab[ri] * 255.0),
        saturate_u8(tab[gi] * 255.0),
        saturate_u8(tab[bi] * 255.0),
    ]
}

/// Rec. 601 luma of an 8-bit RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    saturate_u8(
        LUMA_WEIGHTS[0] * r as f32 + LUMA_WEIGHTS[1] * g as f32 + LUMA_WEIGHTS[2] * b as f32,
    )
}
