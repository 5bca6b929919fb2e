use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::error::AudioError;

/// Default output device connection. The callback drains the ring buffer and
/// writes silence on underrun; the render worker owns the producer side.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    pub config: cpal::StreamConfig,
}

impl AudioOutput {
    pub fn start(latency_ms: f32) -> Result<(Self, HeapProd<f32>), AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = (sample_rate as f32 * latency_ms / 1000.0) as usize;
        let rb = HeapRb::<f32>::new(capacity.max(256) * channels as usize * 4);
        let (prod, mut cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let n_frames = data.len() / channels as usize;
                for frame in 0..n_frames {
                    // Mono voice: duplicate the sample across all channels.
                    let s = cons.try_pop().unwrap_or(0.0);
                    for ch in 0..channels as usize {
                        data[frame * channels as usize + ch] = s;
                    }
                }
            },
            |err| tracing::warn!("output stream error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok((
            Self {
                stream: Some(stream),
                config,
            },
            prod,
        ))
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Push a rendered block, sleeping briefly whenever the buffer is full so
    /// the render worker is paced by the device clock.
    pub fn push_samples(prod: &mut HeapProd<f32>, samples: &[f32]) {
        let mut offset = 0;
        while offset < samples.len() {
            let written = prod.push_slice(&samples[offset..]);
            offset += written;

            if offset < samples.len() {
                std::thread::sleep(std::time::Duration::from_micros(200));
            }
        }
    }

    pub fn stop(&mut self) {
        self.stream.take();
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stream.take();
    }
}
