// Entry point: loads config, wires the audio threads, runs the control loop.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;
use tracing::info;

use physiboard::audio::render::spawn_render_worker;
use physiboard::audio::writer::WavOutput;
use physiboard::audio::{AudioOutput, FmVoice, SynthControl, SynthHandle, SynthParams};
use physiboard::cli::Args;
use physiboard::config::AppConfig;
use physiboard::driver::Driver;
use physiboard::input::{ButtonId, InputEvent};
use physiboard::mapper::ParameterMapper;
use physiboard::sandbox::{PhysicsSandbox, Vec2};
use physiboard::score::{Score, TimedEvent};
use physiboard::timebase::Timebase;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let cfg = AppConfig::load_or_default(&args.config);

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let params = SynthParams::new();
    let handle = SynthHandle::new(params.clone());

    // Audio
    let (audio, prod) = if args.play {
        let (out, prod) = AudioOutput::start(cfg.audio.latency_ms)?;
        (Some(out), Some(prod))
    } else {
        (None, None)
    };
    let fs = audio
        .as_ref()
        .map(AudioOutput::sample_rate)
        .unwrap_or(cfg.audio.sample_rate);

    // WAV tee
    let (wav_handle, wav_tx) = if let Some(path) = args.wav.clone() {
        let (tx, rx) = crossbeam_channel::bounded::<Vec<f32>>(16);
        (Some(WavOutput::run(rx, path, fs)), Some(tx))
    } else {
        (None, None)
    };

    let voice = FmVoice::new(fs as f32, params);
    let render_handle = spawn_render_worker(voice, prod, wav_tx, stop_flag.clone());

    handle.set_output_volume(cfg.control.output_volume, 0.1);

    let timebase = Timebase {
        frame_hz: cfg.control.frame_hz,
    };
    let sandbox = PhysicsSandbox::new(&cfg.sandbox, cfg.control.frame_hz);
    let mapper = ParameterMapper::new(cfg.mapping.clone(), cfg.sandbox.default_restitution);
    let mut driver = Driver::new(timebase, sandbox, mapper, Box::new(handle));

    let mut score = match args.score.as_deref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Score::from_toml_str(&text)?
        }
        None => demo_score(&driver),
    };
    info!(
        "performing {} events over {:.1} s",
        score.remaining_events(),
        score.total_duration()
    );

    let duration = args.duration.unwrap_or(score.total_duration() + 2.0);
    driver.run(&mut score, &stop_flag, Some(duration));

    stop_flag.store(true, Ordering::SeqCst);
    let _ = render_handle.join();
    if let Some(handle) = wav_handle {
        let _ = handle.join();
    }
    if let Some(mut audio) = audio {
        audio.stop();
    }
    info!("done after {:.1} s", driver.now_sec());
    Ok(())
}

/// Built-in demo: swell the volume body, brighten the tone, widen and spin
/// the vibrato wheel, then let the note ring out.
fn demo_score(driver: &Driver) -> Score {
    let roles = driver.sandbox().roles();
    let anchor = driver.sandbox().anchor_id();
    let bounds = driver.sandbox().bounds();
    let wheel = driver.sandbox().state(roles.vibrato).position;

    let mut events = vec![TimedEvent {
        time: 0.5,
        order: 0,
        event: InputEvent::KeyDown { key: 0 },
    }];

    // Lift the volume body in a slow drag, then throw it upward.
    let vol_x = driver.sandbox().state(roles.volume).position.x;
    events.push(TimedEvent {
        time: 1.0,
        order: 0,
        event: InputEvent::DragStart {
            body: roles.volume,
            point: Vec2::new(vol_x, 0.0),
        },
    });
    for i in 1..=30 {
        let t = 1.0 + i as f32 / 30.0;
        let y = i as f32 / 30.0 * bounds.half_h * 0.8;
        events.push(TimedEvent {
            time: t,
            order: i,
            event: InputEvent::DragMove {
                body: roles.volume,
                point: Vec2::new(vol_x, y),
            },
        });
    }
    events.push(TimedEvent {
        time: 2.1,
        order: 0,
        event: InputEvent::DragEnd {
            body: roles.volume,
            point: Vec2::new(vol_x, bounds.half_h * 0.8),
        },
    });

    // Brighter timbre, two multiplier steps up.
    events.push(TimedEvent {
        time: 2.5,
        order: 0,
        event: InputEvent::ButtonPress {
            button: ButtonId::MultiplierUp,
        },
    });
    events.push(TimedEvent {
        time: 3.0,
        order: 0,
        event: InputEvent::ButtonPress {
            button: ButtonId::MultiplierUp,
        },
    });

    // Widen the vibrato and give the wheel a spin.
    events.push(TimedEvent {
        time: 3.5,
        order: 0,
        event: InputEvent::DragStart {
            body: anchor,
            point: wheel,
        },
    });
    events.push(TimedEvent {
        time: 3.6,
        order: 0,
        event: InputEvent::DragMove {
            body: anchor,
            point: wheel + Vec2::new(40.0, 0.0),
        },
    });
    events.push(TimedEvent {
        time: 3.7,
        order: 0,
        event: InputEvent::DragEnd {
            body: anchor,
            point: wheel + Vec2::new(40.0, 0.0),
        },
    });
    events.push(TimedEvent {
        time: 4.0,
        order: 0,
        event: InputEvent::DragStart {
            body: roles.vibrato,
            point: wheel + Vec2::new(48.0, 0.0),
        },
    });
    events.push(TimedEvent {
        time: 4.02,
        order: 0,
        event: InputEvent::DragMove {
            body: roles.vibrato,
            point: wheel + Vec2::new(34.0, 34.0),
        },
    });
    events.push(TimedEvent {
        time: 4.04,
        order: 0,
        event: InputEvent::DragEnd {
            body: roles.vibrato,
            point: wheel + Vec2::new(0.0, 48.0),
        },
    });

    // A new note wins over the held one, then everything releases.
    events.push(TimedEvent {
        time: 5.0,
        order: 0,
        event: InputEvent::KeyDown { key: 7 },
    });
    events.push(TimedEvent {
        time: 6.0,
        order: 0,
        event: InputEvent::KeyUp { key: 7 },
    });
    events.push(TimedEvent {
        time: 6.0,
        order: 1,
        event: InputEvent::KeyUp { key: 0 },
    });

    Score::from_events(events)
}
