//! WAV decoding and encoding for the command-line front end.
//!
//! The engine itself never touches files; this module only converts between
//! WAV containers and planar [`AudioBuffer`]s.

use std::io::{Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::types::AudioBuffer;
use crate::error::StretchError;

/// Sample encoding used when writing a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavEncoding {
    /// 16-bit signed integer PCM.
    #[default]
    Pcm16,
    /// 24-bit signed integer PCM.
    Pcm24,
    /// 32-bit IEEE float.
    Float32,
}

impl WavEncoding {
    fn spec(self, channels: u16, sample_rate: u32) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            WavEncoding::Pcm16 => (16, SampleFormat::Int),
            WavEncoding::Pcm24 => (24, SampleFormat::Int),
            WavEncoding::Float32 => (32, SampleFormat::Float),
        };
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Reads a WAV file into a planar buffer.
pub fn read_wav_file<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, StretchError> {
    read_wav(WavReader::open(path)?)
}

/// Reads WAV data from any reader.
///
/// Integer PCM of 8 to 32 bits is scaled to `[-1.0, 1.0)`; 32-bit float is
/// passed through.
pub fn read_wav<R: Read>(reader: WavReader<R>) -> Result<AudioBuffer, StretchError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(StretchError::InvalidFormat(
            "WAV header declares zero channels".to_string(),
        ));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let full_scale = (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (format, bits) => {
            return Err(StretchError::InvalidFormat(format!(
                "unsupported sample format: {:?} at {} bits",
                format, bits
            )))
        }
    };

    AudioBuffer::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate)
}

/// Writes a buffer to a WAV file.
pub fn write_wav_file<P: AsRef<Path>>(
    path: P,
    buffer: &AudioBuffer,
    encoding: WavEncoding,
) -> Result<(), StretchError> {
    let spec = encoding.spec(channel_count(buffer)?, buffer.sample_rate);
    let writer = WavWriter::create(path, spec)?;
    write_samples(writer, buffer, encoding)
}

/// Writes a buffer as WAV to any seekable writer.
pub fn write_wav<W: Write + Seek>(
    writer: W,
    buffer: &AudioBuffer,
    encoding: WavEncoding,
) -> Result<(), StretchError> {
    let spec = encoding.spec(channel_count(buffer)?, buffer.sample_rate);
    write_samples(WavWriter::new(writer, spec)?, buffer, encoding)
}

fn channel_count(buffer: &AudioBuffer) -> Result<u16, StretchError> {
    u16::try_from(buffer.num_channels())
        .map_err(|_| StretchError::InvalidChannels(buffer.num_channels()))
}

/// Integer samples are clipped to `[-1.0, 1.0]` and scaled by the largest
/// positive code (`32767` for 16-bit), so full scale never wraps.
fn write_samples<W: Write + Seek>(
    mut writer: WavWriter<W>,
    buffer: &AudioBuffer,
    encoding: WavEncoding,
) -> Result<(), StretchError> {
    let interleaved = buffer.to_interleaved();
    match encoding {
        WavEncoding::Float32 => {
            for &s in &interleaved {
                writer.write_sample(s)?;
            }
        }
        WavEncoding::Pcm16 => {
            for &s in &interleaved {
                writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
            }
        }
        WavEncoding::Pcm24 => {
            let max = ((1 << 23) - 1) as f32;
            for &s in &interleaved {
                writer.write_sample((s.clamp(-1.0, 1.0) * max) as i32)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}
