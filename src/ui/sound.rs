/// Procedural arcade sound effects via rodio.
///
/// Every effect is synthesized into an in-memory WAV buffer once, at init
/// time; playback is fire-and-forget through a detached Sink. Building
/// without the "sound" feature swaps in a stub engine that does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_bounce: Arc<Vec<u8>>,
        sfx_brick: Arc<Vec<u8>>,
        sfx_shatter: Arc<Vec<u8>>,
        sfx_ball_lost: Arc<Vec<u8>>,
        sfx_level_clear: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_bounce: Arc::new(make_wav(&gen_bounce())),
                sfx_brick: Arc::new(make_wav(&gen_brick_hit())),
                sfx_shatter: Arc::new(make_wav(&gen_shatter())),
                sfx_ball_lost: Arc::new(make_wav(&gen_ball_lost())),
                sfx_level_clear: Arc::new(make_wav(&gen_level_clear())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_bounce(&self) { self.play(&self.sfx_bounce); }
        pub fn play_brick(&self) { self.play(&self.sfx_brick); }
        pub fn play_shatter(&self) { self.play(&self.sfx_shatter); }
        pub fn play_ball_lost(&self) { self.play(&self.sfx_ball_lost); }
        pub fn play_level_clear(&self) { self.play(&self.sfx_level_clear); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ── Waveform generators: mono f32 samples ──

    fn tone(freq: f32, duration: f32, volume: f32, samples: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Paddle or wall bounce: one short blip.
    fn gen_bounce() -> Vec<f32> {
        let mut s = Vec::new();
        tone(660.0, 0.04, 0.22, &mut s);
        s
    }

    /// Brick hit (not destroyed): a duller, lower blip.
    fn gen_brick_hit() -> Vec<f32> {
        let mut s = Vec::new();
        tone(330.0, 0.05, 0.25, &mut s);
        s
    }

    /// Brick destroyed: blip plus a short noise burst.
    fn gen_shatter() -> Vec<f32> {
        let mut s = Vec::new();
        tone(392.0, 0.03, 0.2, &mut s);
        let n = (SAMPLE_RATE as f32 * 0.08) as usize;
        let mut rng: u32 = 0x2545F49;
        for i in 0..n {
            let t = i as f32 / n as f32;
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
            s.push(noise * (1.0 - t).powf(0.8) * 0.18);
        }
        s
    }

    /// Ball lost: descending whistle.
    fn gen_ball_lost() -> Vec<f32> {
        let duration = 0.25;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 700.0 - t * 500.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t).powf(0.6) * 0.25
            })
            .collect()
    }

    /// Level cleared: ascending fanfare C5 E5 G5 C6.
    fn gen_level_clear() -> Vec<f32> {
        let mut s = Vec::new();
        for &freq in &[523.0_f32, 659.0, 784.0, 1047.0] {
            tone(freq, 0.09, 0.28, &mut s);
        }
        tone(1047.0, 0.22, 0.28, &mut s);
        s
    }

    /// All lives gone: slow descending line.
    fn gen_game_over() -> Vec<f32> {
        let mut s = Vec::new();
        for &freq in &[440.0_f32, 370.0, 311.0, 262.0] {
            tone(freq, 0.16, 0.28, &mut s);
        }
        s
    }

    // ── WAV encoder: 16-bit mono PCM ──

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (bits_per_sample as u32) / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes()); // block align
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_bounce(&self) {}
    pub fn play_brick(&self) {}
    pub fn play_shatter(&self) {}
    pub fn play_ball_lost(&self) {}
    pub fn play_level_clear(&self) {}
    pub fn play_game_over(&self) {}
}
