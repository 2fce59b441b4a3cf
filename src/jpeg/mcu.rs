//! The MCU / channel data model shared by the entropy decoder, the
//! coefficient walker, the JSteg engine and the entropy encoder.

/// Which class of channel a coefficient belongs to, used by the
/// coefficient walker's traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelClass {
    Luma,
    Chroma,
}

/// One 8x8 block of quantised coefficients in zig-zag order.
#[derive(Debug, Clone)]
pub struct Channel {
    pub dc: i32,
    pub ac: [i32; 63],
}

impl Channel {
    pub fn new() -> Self {
        Channel { dc: 0, ac: [0; 63] }
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

/// One Minimum Coded Unit: the luma blocks dictated by the luma
/// sampling factors, plus (for colour images) one Cb and one Cr block.
#[derive(Debug, Clone)]
pub struct Mcu {
    pub luma: Vec<Channel>,
    pub chroma: Vec<Channel>,
}

impl Mcu {
    pub fn new(luma_count: usize, chroma_count: usize) -> Self {
        Mcu {
            luma: (0..luma_count).map(|_| Channel::new()).collect(),
            chroma: (0..chroma_count).map(|_| Channel::new()).collect(),
        }
    }
}
