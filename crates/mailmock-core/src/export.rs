//! Export artifact naming and supersampling math.

use crate::crop::Dimensions;

/// Supersampling factor applied to the captured subtree: the output
/// bitmap is this many times the rendered size in each dimension.
pub const EXPORT_SCALE: u32 = 3;

/// File-name prefix for exported images.
pub const EXPORT_FILE_PREFIX: &str = "email";

/// Derive the download file name from an export timestamp.
#[must_use]
pub fn export_filename(unix_millis: u64) -> String {
    format!("{EXPORT_FILE_PREFIX}-{unix_millis}.png")
}

/// Target bitmap dimensions for a subtree rendered at `dimensions`.
///
/// Saturates rather than overflowing for absurdly large subtrees.
#[must_use]
pub const fn supersampled(dimensions: Dimensions, scale: u32) -> Dimensions {
    Dimensions {
        width: dimensions.width.saturating_mul(scale),
        height: dimensions.height.saturating_mul(scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_embeds_prefix_and_timestamp() {
        assert_eq!(export_filename(1_700_000_000_123), "email-1700000000123.png");
    }

    #[test]
    fn supersample_triples_each_dimension() {
        let out = supersampled(
            Dimensions {
                width: 384,
                height: 800,
            },
            EXPORT_SCALE,
        );
        assert_eq!(
            out,
            Dimensions {
                width: 1152,
                height: 2400
            }
        );
    }

    #[test]
    fn supersample_saturates() {
        let out = supersampled(
            Dimensions {
                width: u32::MAX,
                height: 2,
            },
            EXPORT_SCALE,
        );
        assert_eq!(out.width, u32::MAX);
        assert_eq!(out.height, 6);
    }
}
