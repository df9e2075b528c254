//! Validity masking from the scene classification layer
//!
//! Sentinel-2 L2A ships a per-pixel scene classification (SCL). Pixels the
//! classifier flags as cloudy, shadowed, snowy or unusable are masked out
//! before the index computation.

/// Sentinel-2 L2A scene classification codes
pub mod scl {
    pub const NO_DATA: u8 = 0;
    pub const SATURATED_DEFECTIVE: u8 = 1;
    pub const DARK_AREA: u8 = 2;
    pub const CLOUD_SHADOW: u8 = 3;
    pub const VEGETATION: u8 = 4;
    pub const NOT_VEGETATED: u8 = 5;
    pub const WATER: u8 = 6;
    pub const UNCLASSIFIED: u8 = 7;
    pub const CLOUD_MEDIUM_PROBABILITY: u8 = 8;
    pub const CLOUD_HIGH_PROBABILITY: u8 = 9;
    pub const THIN_CIRRUS: u8 = 10;
    pub const SNOW_ICE: u8 = 11;
}

/// Returns whether a classification code is usable for index computation
pub fn is_clear(class: u8) -> bool {
    !matches!(
        class,
        scl::NO_DATA
            | scl::SATURATED_DEFECTIVE
            | scl::CLOUD_SHADOW
            | scl::UNCLASSIFIED
            | scl::CLOUD_MEDIUM_PROBABILITY
            | scl::CLOUD_HIGH_PROBABILITY
            | scl::THIN_CIRRUS
            | scl::SNOW_ICE
    )
}

/// Derives a validity mask from the classification layer and the acquisition
/// data mask. Both layers arrive as float bands from the scene decode; SCL
/// codes are rounded before classification.
pub fn validity_mask(scl_band: &[f32], data_mask: &[f32]) -> Vec<bool> {
    scl_band
        .iter()
        .zip(data_mask.iter())
        .map(|(&class, &data)| data >= 0.5 && is_clear(class.round() as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_classes() {
        assert!(is_clear(scl::VEGETATION));
        assert!(is_clear(scl::NOT_VEGETATED));
        assert!(is_clear(scl::WATER));
        assert!(is_clear(scl::DARK_AREA));
    }

    #[test]
    fn test_unusable_classes() {
        assert!(!is_clear(scl::NO_DATA));
        assert!(!is_clear(scl::SATURATED_DEFECTIVE));
        assert!(!is_clear(scl::CLOUD_SHADOW));
        assert!(!is_clear(scl::CLOUD_MEDIUM_PROBABILITY));
        assert!(!is_clear(scl::CLOUD_HIGH_PROBABILITY));
        assert!(!is_clear(scl::THIN_CIRRUS));
        assert!(!is_clear(scl::SNOW_ICE));
    }

    #[test]
    fn test_validity_mask() {
        let scl_band = [4.0, 9.0, 4.0, 11.0];
        let data_mask = [1.0, 1.0, 0.0, 1.0];
        assert_eq!(
            validity_mask(&scl_band, &data_mask),
            vec![true, false, false, false]
        );
    }

    #[test]
    fn test_validity_mask_rounds_codes() {
        // float transport can wobble the class codes slightly
        let scl_band = [3.9999, 4.0001];
        let data_mask = [1.0, 1.0];
        assert_eq!(validity_mask(&scl_band, &data_mask), vec![true, true]);
    }
}
