//! Handle-based front end with lenient failure conventions
//!
//! Hosts that cannot carry Rust ownership across their boundary work with
//! opaque handles instead. A [`SpectralSession`] owns every buffer it hands a
//! handle for; each handle is released at most once, and any use after
//! release yields a sentinel rather than a fault:
//!
//! - construction failure returns `None` (nothing created)
//! - counts, flags, magnitude and phase on a released handle return `-1`
//! - the peak query on a released handle returns `(1.0, -1)`

use crate::audio::{self, FormatTag, SampleBuffer};
use crate::spectrum::{self, AnalyzerConfig, SpectralBuffer, SpectrumAnalyzer};

/// Slot position plus the generation it was issued under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SlotKey {
    index: usize,
    generation: u32,
}

/// Handle to a sample buffer owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleHandle(SlotKey);

/// Handle to a spectral buffer owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpectrumHandle(SlotKey);

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

/// Generational slot storage
///
/// Released slots are reused, so storage is bounded by the peak number of
/// live buffers. Reuse bumps the slot generation, which keeps every handle
/// issued before the release stale.
#[derive(Debug)]
struct Slots<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Slots<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, item: T) -> SlotKey {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.item = Some(item);
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        SlotKey {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }

        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        Some(item)
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Owner of sample and spectral buffers plus the analyzer that transforms them
///
/// The transform backend is chosen once, when the session is built.
pub struct SpectralSession {
    analyzer: SpectrumAnalyzer,
    samples: Slots<SampleBuffer>,
    spectra: Slots<SpectralBuffer>,
}

impl SpectralSession {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_analyzer(SpectrumAnalyzer::new(config))
    }

    pub fn with_analyzer(analyzer: SpectrumAnalyzer) -> Self {
        Self {
            analyzer,
            samples: Slots::new(),
            spectra: Slots::new(),
        }
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    // ---- sample buffers ----

    /// Take ownership of decoded samples
    pub fn load_samples(&mut self, samples: Vec<i16>, sample_rate: u32, format: FormatTag) -> Option<SampleHandle> {
        match SampleBuffer::new(samples, sample_rate, format) {
            Ok(buf) => Some(SampleHandle(self.samples.insert(buf))),
            Err(e) => {
                log::warn!("Sample buffer not created: {}", e);
                None
            }
        }
    }

    /// Copy raw 16-bit PCM bytes into a new sample buffer
    pub fn load_pcm_bytes(&mut self, bytes: &[u8], sample_rate: u32, format: FormatTag) -> Option<SampleHandle> {
        match SampleBuffer::from_pcm_bytes(bytes, sample_rate, format) {
            Ok(buf) => Some(SampleHandle(self.samples.insert(buf))),
            Err(e) => {
                log::warn!("Sample buffer not created: {}", e);
                None
            }
        }
    }

    /// Release a sample buffer; `false` if it was already released
    pub fn free_samples(&mut self, handle: SampleHandle) -> bool {
        self.samples.remove(handle.0).is_some()
    }

    /// Borrow a live sample buffer
    pub fn samples(&self, handle: SampleHandle) -> Option<&SampleBuffer> {
        self.samples.get(handle.0)
    }

    /// Write a synthetic tone or constant into a sample range
    ///
    /// No-op on a released handle.
    pub fn synthesize(&mut self, handle: SampleHandle, freq_hz: f32, amplitude: i32, start: i64, end: i64) {
        match self.samples.get_mut(handle.0) {
            Some(buf) => buf.synthesize(freq_hz, amplitude, start, end),
            None => log::warn!("synthesize on released sample handle {:?}", handle),
        }
    }

    /// Sample value, `0` outside the buffer, `-1` on a released handle
    pub fn sample(&self, handle: SampleHandle, idx: i64) -> i32 {
        self.samples
            .get(handle.0)
            .map_or(-1, |buf| buf.sample(idx) as i32)
    }

    /// Sample count, `-1` on a released handle
    pub fn sample_count(&self, handle: SampleHandle) -> i64 {
        self.samples.get(handle.0).map_or(-1, |buf| buf.len() as i64)
    }

    /// Sampling frequency, `-1` on a released handle
    pub fn sample_rate(&self, handle: SampleHandle) -> i64 {
        self.samples
            .get(handle.0)
            .map_or(-1, |buf| buf.sample_rate() as i64)
    }

    /// Variance of a sample range; nothing on a released handle
    pub fn signal_energy(&self, handle: SampleHandle, start: i64, end: i64) -> Option<f32> {
        self.samples
            .get(handle.0)
            .map(|buf| audio::signal_energy(buf, start, end))
    }

    // ---- spectral buffers ----

    /// Copy a sample range into a new spectral buffer
    pub fn create_spectrum(&mut self, source: SampleHandle, start: i64, end: i64) -> Option<SpectrumHandle> {
        let Some(samples) = self.samples.get(source.0) else {
            log::warn!("Spectral buffer not created: sample handle {:?} released", source);
            return None;
        };

        match SpectralBuffer::from_samples(samples, start, end) {
            Ok(buf) => Some(SpectrumHandle(self.spectra.insert(buf))),
            Err(e) => {
                log::warn!("Spectral buffer not created: {}", e);
                None
            }
        }
    }

    /// Release a spectral buffer; `false` if it was already released
    pub fn free_spectrum(&mut self, handle: SpectrumHandle) -> bool {
        self.spectra.remove(handle.0).is_some()
    }

    /// Borrow a live spectral buffer
    pub fn spectrum(&self, handle: SpectrumHandle) -> Option<&SpectralBuffer> {
        self.spectra.get(handle.0)
    }

    /// Run the transform pipeline; `false` on a released handle
    pub fn run_fft(&mut self, handle: SpectrumHandle) -> bool {
        match self.spectra.get_mut(handle.0) {
            Some(buf) => {
                self.analyzer.run(buf);
                true
            }
            None => {
                log::warn!("run_fft on released spectrum handle {:?}", handle);
                false
            }
        }
    }

    /// Bin magnitude with periodic indexing, `-1` on a released handle
    pub fn magnitude(&self, handle: SpectrumHandle, idx: i64) -> f32 {
        self.spectra
            .get(handle.0)
            .map_or(spectrum::analysis::INVALID, |buf| spectrum::magnitude(buf, idx))
    }

    /// Bin phase with periodic indexing, `-1` on a released handle
    pub fn phase(&self, handle: SpectrumHandle, idx: i64) -> f32 {
        self.spectra
            .get(handle.0)
            .map_or(spectrum::analysis::INVALID, |buf| spectrum::phase(buf, idx))
    }

    /// Current bin count, `-1` on a released handle
    pub fn length(&self, handle: SpectrumHandle) -> i64 {
        self.spectra.get(handle.0).map_or(-1, |buf| buf.len() as i64)
    }

    /// `0` for time domain, `1` for frequency domain, `-1` on a released handle
    pub fn domain_flag(&self, handle: SpectrumHandle) -> i32 {
        self.spectra.get(handle.0).map_or(-1, |buf| buf.domain().flag())
    }

    /// `(magnitude, bin)` of the strongest bin, `(1.0, -1)` on a released handle
    pub fn peak_magnitude(&self, handle: SpectrumHandle, start: i64, end: i64) -> (f32, i64) {
        match self.spectra.get(handle.0) {
            Some(buf) => {
                let peak = spectrum::peak_magnitude(buf, start, end);
                (peak.magnitude, peak.bin as i64)
            }
            None => (1.0, -1),
        }
    }

    /// Number of live (unreleased) sample and spectral buffers
    pub fn live_buffers(&self) -> (usize, usize) {
        (self.samples.live(), self.spectra.live())
    }

    /// Number of allocated sample and spectral slots, live or free
    pub fn slot_capacity(&self) -> (usize, usize) {
        (self.samples.capacity(), self.spectra.capacity())
    }
}

impl Default for SpectralSession {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
