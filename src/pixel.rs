/// A color that can be transmitted with this driver.
pub trait Pixel {
    /// Returns the raw bytes in wire order.
    ///
    /// IMPORTANT: The strips this driver targets latch red, green, blue.
    /// WS2812 strips are GRB encoded and need their components swapped by
    /// the caller.
    fn get_ws2811_bytes(&self) -> [u8; 3];
}

/// Raw RGB data.
impl Pixel for [u8; 3] {
    fn get_ws2811_bytes(&self) -> [u8; 3] {
        *self
    }
}

/// RGB data as used by the `smart-leds` ecosystem.
impl Pixel for smart_leds_trait::RGB8 {
    fn get_ws2811_bytes(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// 8-bit Linear sRGB, which is the color space
/// most addressable strips are in.
///
/// Be aware that this differs from normal,
/// gamma-corrected sRGB. A conversion has to take place.
///
/// More info can be found in the documentation of the
/// [palette] crate.
impl Pixel for palette::LinSrgb<u8> {
    fn get_ws2811_bytes(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}
