//! RGB image frames

/// An RGB colour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
}

/// A packed RGB24 image in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    /// `width * height * 3` bytes
    pub rgb: Vec<u8>,
}

impl Frame {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: vec![0; width * height * 3],
        }
    }

    /// Fill the whole frame with a single colour.
    pub fn filled(width: usize, height: usize, colour: Rgb) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill_rect(0, 0, width, height, colour);
        frame
    }

    /// The colour of the pixel at column `x` and row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some(Rgb(self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]))
    }

    /// Fill a rectangle, clipped to the frame bounds.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, colour: Rgb) {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for row in y.min(y_end)..y_end {
            for col in x.min(x_end)..x_end {
                let i = (row * self.width + col) * 3;
                self.rgb[i] = colour.0;
                self.rgb[i + 1] = colour.1;
                self.rgb[i + 2] = colour.2;
            }
        }
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.rgb.chunks_exact(3).map(|p| Rgb(p[0], p[1], p[2]))
    }
}
