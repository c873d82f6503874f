//! Uncompressed YUV4MPEG2 video writer
use super::{FrameWriter, VideoError};
use crate::envs::Frame;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes uncompressed YUV4MPEG2 (`.y4m`) video with full 4:4:4 chroma.
///
/// Colours are converted from RGB with full-range BT.601 coefficients.
/// Existing files are never overwritten.
#[derive(Debug)]
pub struct Y4mWriter {
    /// Frames per second
    pub fps: u32,
    current: Option<Video>,
}

#[derive(Debug)]
struct Video {
    path: PathBuf,
    out: BufWriter<File>,
    width: usize,
    height: usize,
    planes: Vec<u8>,
}

impl Y4mWriter {
    pub const fn new(fps: u32) -> Self {
        Self { fps, current: None }
    }
}

impl Default for Y4mWriter {
    fn default() -> Self {
        Self::new(30)
    }
}

impl FrameWriter for Y4mWriter {
    fn extension(&self) -> &str {
        "y4m"
    }

    fn begin(&mut self, path: &Path, width: usize, height: usize) -> Result<(), VideoError> {
        if let Some(video) = &self.current {
            return Err(VideoError::AlreadyStarted(video.path.clone()));
        }
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut out = BufWriter::new(file);
        writeln!(
            out,
            "YUV4MPEG2 W{} H{} F{}:1 Ip A1:1 C444 XCOLORRANGE=FULL",
            width, height, self.fps
        )?;
        self.current = Some(Video {
            path: path.to_path_buf(),
            out,
            width,
            height,
            planes: vec![0; width * height * 3],
        });
        Ok(())
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError> {
        let video = self.current.as_mut().ok_or(VideoError::NotStarted)?;
        if (frame.width, frame.height) != (video.width, video.height) {
            return Err(VideoError::FrameSize {
                expected: (video.width, video.height),
                actual: (frame.width, frame.height),
            });
        }
        let plane_size = video.width * video.height;
        if frame.rgb.len() != plane_size * 3 {
            return Err(VideoError::FrameBuffer {
                expected: plane_size * 3,
                actual: frame.rgb.len(),
            });
        }

        let (y_plane, chroma) = video.planes.split_at_mut(plane_size);
        let (u_plane, v_plane) = chroma.split_at_mut(plane_size);
        for (i, pixel) in frame.pixels().enumerate() {
            let (y, u, v) = rgb_to_yuv(pixel.0, pixel.1, pixel.2);
            y_plane[i] = y;
            u_plane[i] = u;
            v_plane[i] = v;
        }
        video.out.write_all(b"FRAME\n")?;
        video.out.write_all(&video.planes)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        let video = self.current.take().ok_or(VideoError::NotStarted)?;
        let file = video.out.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }
}

/// Full-range BT.601 RGB to YCbCr.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let v = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    let quantize = |x: f64| x.round().clamp(0.0, 255.0) as u8;
    (quantize(y), quantize(u), quantize(v))
}
