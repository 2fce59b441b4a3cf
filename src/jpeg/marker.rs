//! JPEG marker byte decoding (ITU T.81 Table B.1), restricted to the
//! markers this codec recognises plus enough of the others to produce
//! an accurate `UnsupportedFeature` rather than a generic parse failure.

/// A decoded JPEG marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Soi,
    Eoi,
    App0,
    /// Any other APPn segment (n = 1..=15); preserved only for
    /// diagnostics, never round-tripped.
    AppN(u8),
    Dqt,
    /// Baseline DCT, the only supported frame type.
    Sof0,
    /// A recognised-but-unsupported start-of-frame variant, carrying
    /// its SOFn index (1..=15, excluding 0).
    UnsupportedSof(u8),
    Dht,
    Dac,
    Sos,
    Dri,
    Rst(u8),
    Com,
    Tem,
    /// Anything else in the marker range; always fatal.
    Other(u8),
}

impl Marker {
    /// Does this marker have a two-byte length field following it?
    pub fn has_length(self) -> bool {
        !matches!(self, Marker::Soi | Marker::Eoi | Marker::Tem | Marker::Rst(_))
    }

    /// Decode the byte following the 0xFF marker prefix.
    pub fn from_u8(n: u8) -> Option<Marker> {
        use Marker::*;
        match n {
            0x00 | 0xFF => None,
            0x01 => Some(Tem),
            0xC0 => Some(Sof0),
            0xC1..=0xC3 => Some(UnsupportedSof(n - 0xC0)),
            0xC4 => Some(Dht),
            0xC5..=0xC7 => Some(UnsupportedSof(n - 0xC0)),
            0xC8 => Some(Other(n)),
            0xC9..=0xCB => Some(UnsupportedSof(n - 0xC0)),
            0xCC => Some(Dac),
            0xCD..=0xCF => Some(UnsupportedSof(n - 0xC0)),
            0xD0..=0xD7 => Some(Rst(n - 0xD0)),
            0xD8 => Some(Soi),
            0xD9 => Some(Eoi),
            0xDA => Some(Sos),
            0xDB => Some(Dqt),
            0xDD => Some(Dri),
            0xE0 => Some(App0),
            0xE1..=0xEF => Some(AppN(n - 0xE0)),
            0xFE => Some(Com),
            _ => Some(Other(n)),
        }
    }
}
