// ABOUTME: Color channel identifiers for packed RGB24 pixels.
// ABOUTME: Provides per-channel byte offsets and an Rgb triple container.

use std::ops::{Index, IndexMut};

/// One of the three interleaved channels of an RGB24 pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Channels in packed byte order
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Bytes per packed pixel
    pub const COUNT: usize = 3;

    /// Byte offset of this channel inside a packed pixel
    pub const fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Option-name suffix (`fade_r`, `gain_g`, ...)
    pub fn suffix(&self) -> &'static str {
        match self {
            Channel::Red => "r",
            Channel::Green => "g",
            Channel::Blue => "b",
        }
    }
}

/// A value for each color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

impl<T> Rgb<T> {
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }

    /// Build a triple by evaluating `f` once per channel, in packed order
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            r: f(Channel::Red),
            g: f(Channel::Green),
            b: f(Channel::Blue),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Rgb<U> {
        Rgb {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    /// Iterate `(channel, value)` pairs in packed order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().map(move |ch| (ch, &self[ch]))
    }
}

impl<T: Copy> Rgb<T> {
    pub const fn splat(value: T) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
        }
    }
}

impl<T> Index<Channel> for Rgb<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        match channel {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }
}

impl<T> IndexMut<Channel> for Rgb<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_packed_order() {
        let offsets: Vec<usize> = Channel::ALL.iter().map(|c| c.offset()).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    #[test]
    fn rgb_indexing_matches_fields() {
        let mut rgb = Rgb::new(1, 2, 3);
        assert_eq!(rgb[Channel::Green], 2);
        rgb[Channel::Blue] = 9;
        assert_eq!(rgb.b, 9);
        let collected: Vec<_> = rgb.iter().map(|(ch, v)| (ch.suffix(), *v)).collect();
        assert_eq!(collected, vec![("r", 1), ("g", 2), ("b", 9)]);
    }
}
