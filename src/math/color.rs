/// Converts a 0xRRGGBB literal into linear RGB
///
/// Surfaces are sRGB, so colors written as hex are decoded to linear
/// before they reach the shader.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let [r, g, b] = hex_to_srgb(hex);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}

/// Splits a 0xRRGGBB literal into sRGB channels in [0, 1]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_red() {
        let rgb = hex_to_linear(0xff0000);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_hex_white() {
        let rgb = hex_to_linear(0xffffff);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!((rgb[1] - 1.0).abs() < 0.01);
        assert!((rgb[2] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_hex_black() {
        let rgb = hex_to_linear(0x000000);
        assert!(rgb[0].abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_mid_gray_is_darker_in_linear() {
        let srgb = hex_to_srgb(0x888888);
        let linear = hex_to_linear(0x888888);
        assert!(linear[0] < srgb[0]);
        assert!((srgb[0] - 0x88 as f32 / 255.0).abs() < 1e-6);
    }
}
