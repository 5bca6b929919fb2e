use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use ringbuf::HeapProd;

use super::fm::FmVoice;
use super::output::AudioOutput;

pub const RENDER_HOP: usize = 256;

/// Render the voice in hop-sized blocks on a dedicated thread.
///
/// With a live output attached the ring buffer paces the loop (push sleeps
/// while full); without one, a wall-clock deadline does, so WAV capture still
/// tracks the performance timeline.
pub fn spawn_render_worker(
    mut voice: FmVoice,
    mut prod: Option<HeapProd<f32>>,
    wav_tx: Option<Sender<Vec<f32>>>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("render".into())
        .spawn(move || {
            let hop_duration = Duration::from_secs_f32(RENDER_HOP as f32 / voice.sample_rate());
            let mut block = vec![0.0f32; RENDER_HOP];
            let mut next_deadline = Instant::now();

            loop {
                if stop.load(Ordering::SeqCst) {
                    tracing::debug!("stopping render thread");
                    break;
                }

                voice.render(&mut block);

                if let Some(prod) = prod.as_mut() {
                    AudioOutput::push_samples(prod, &block);
                } else {
                    next_deadline += hop_duration;
                    let now = Instant::now();
                    if next_deadline > now {
                        thread::sleep(next_deadline - now);
                    }
                }

                if let Some(tx) = wav_tx.as_ref() {
                    if tx.send(block.clone()).is_err() {
                        break;
                    }
                }
            }
        })
        .expect("spawn render thread")
}
