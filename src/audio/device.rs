//! Output stream on the default device, pulling blocks from a [`Mixer`].

use crate::audio::mixer::{lock, Mixer, MixerBackend, SharedMixer};
use crate::audio::{AudioBackend, AudioDriver};
use crate::error::{StudioError, StudioResult};
use crate::wave::WaveId;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};

pub struct DeviceBackend {
    mixer: MixerBackend,
    _stream: cpal::Stream,
}

impl DeviceBackend {
    /// Opens the default output device, at `preferred_rate` when the device
    /// supports it and at its default rate otherwise.
    pub fn open(preferred_rate: f64) -> StudioResult<Self> {
        let host = cpal::default_host();
        info!("Audio host: {:?}", host.id());

        let device = host
            .default_output_device()
            .ok_or_else(|| StudioError::audio("no output device found"))?;
        info!("Audio device: {}", device.name().map_err(StudioError::audio)?);

        let config = match preferred_config(&device, preferred_rate) {
            Some(config) => config,
            None => {
                warn!("Device does not offer {preferred_rate} Hz, using its default rate");
                device
                    .default_output_config()
                    .map_err(StudioError::audio)?
            }
        };
        info!("Audio config: {:?}", config);

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;
        let mixer = MixerBackend::new(sample_rate);
        let shared = mixer.mixer().clone();

        let format = config.sample_format();
        let config: cpal::StreamConfig = config.into();
        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, shared, channels),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, shared, channels),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, shared, channels),
            _ => {
                return Err(StudioError::audio(format!(
                    "unsupported sample format {format:?}"
                )))
            }
        }?;

        stream.play().map_err(StudioError::audio)?;
        info!("Audio stream started at {} Hz", sample_rate);

        Ok(DeviceBackend {
            mixer,
            _stream: stream,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.mixer.sample_rate()
    }
}

impl AudioBackend for DeviceBackend {
    fn create_driver(&self, id: WaveId) -> Box<dyn AudioDriver> {
        self.mixer.create_driver(id)
    }
}

fn preferred_config(device: &cpal::Device, rate: f64) -> Option<cpal::SupportedStreamConfig> {
    let rate = cpal::SampleRate(rate.round() as u32);
    device
        .supported_output_configs()
        .ok()?
        .find(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .map(|range| range.with_sample_rate(rate))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: SharedMixer,
    channels: usize,
) -> StudioResult<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut mono = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                write_frames(&mut lock(&mixer), &mut mono, data, channels);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(StudioError::audio)
}

// Renders one mono block and copies it to every channel of each frame.
fn write_frames<T>(mixer: &mut Mixer, mono: &mut Vec<f32>, data: &mut [T], channels: usize)
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = channels.max(1);
    mono.resize(data.len() / channels, 0.0);
    mixer.render(mono);
    for (frame, value) in data.chunks_mut(channels).zip(mono.iter()) {
        for sample in frame.iter_mut() {
            *sample = T::from_sample(*value);
        }
    }
}
